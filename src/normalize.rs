//! Conversion of extracted angle fields into signed decimal degrees.

use crate::types::{
    Advisories, AngleField, CentroidMode, Direction, ExtractedBBoxFields, NormalizedBox,
    NormalizedCoordinate,
};
use tracing::debug;

/// `degree + minute/60 + second/3600`.
pub fn dms_to_decimal(degree: f64, minute: f64, second: f64) -> f64 {
    degree + minute / 60.0 + second / 3600.0
}

impl AngleField {
    /// Unsigned decimal degrees; absent minutes and seconds count as zero.
    pub fn decimal(&self) -> f64 {
        dms_to_decimal(
            self.degree,
            self.minute.unwrap_or(0.0),
            self.second.unwrap_or(0.0),
        )
    }
}

/// Fills a missing direction from the sibling value of the same pair.
fn resolve_pair(
    first: Option<Direction>,
    second: Option<Direction>,
) -> (Option<Direction>, Option<Direction>) {
    (first.or(second), second.or(first))
}

fn apply_sign(magnitude: f64, direction: Option<Direction>, negative: Direction) -> f64 {
    // Exactly zero stays +0.0 so "0°00′S" never prints as -0.
    if direction == Some(negative) && magnitude != 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

pub fn crosses_antimeridian(lon1: f64, lon2: f64) -> bool {
    (lon1 - lon2).abs() > 180.0
}

fn centroid_longitude(lon1: f64, lon2: f64, mode: CentroidMode) -> f64 {
    match mode {
        CentroidMode::AntimeridianAware if crosses_antimeridian(lon1, lon2) => {
            let shift = |lon: f64| if lon < 0.0 { lon + 360.0 } else { lon };
            let mean = (shift(lon1) + shift(lon2)) / 2.0;
            if mean > 180.0 { mean - 360.0 } else { mean }
        }
        _ => (lon1 + lon2) / 2.0,
    }
}

/// Normalizes with the plain arithmetic centroid.
pub fn normalize(fields: &ExtractedBBoxFields) -> NormalizedBox {
    normalize_with(fields, CentroidMode::Arithmetic)
}

pub fn normalize_with(fields: &ExtractedBBoxFields, mode: CentroidMode) -> NormalizedBox {
    let (lat1_dir, lat2_dir) = resolve_pair(fields.lat1.direction, fields.lat2.direction);
    let (lon1_dir, lon2_dir) = resolve_pair(fields.lon1.direction, fields.lon2.direction);

    let lat1 = apply_sign(fields.lat1.decimal(), lat1_dir, Direction::S);
    let lat2 = apply_sign(fields.lat2.decimal(), lat2_dir, Direction::S);
    let lon1 = apply_sign(fields.lon1.decimal(), lon1_dir, Direction::W);
    let lon2 = apply_sign(fields.lon2.decimal(), lon2_dir, Direction::W);

    let advisories = Advisories {
        latitude_undirected: lat1_dir.is_none(),
        longitude_undirected: lon1_dir.is_none(),
        antimeridian_crossing: crosses_antimeridian(lon1, lon2),
    };
    if advisories.any() {
        debug!(
            layout = %fields.layout,
            advisories = %advisories,
            "bounding box normalized with advisories"
        );
    }

    NormalizedBox {
        coordinate: NormalizedCoordinate {
            centroid_lat: (lat1 + lat2) / 2.0,
            centroid_lon: centroid_longitude(lon1, lon2, mode),
            lat1,
            lat2,
            lon1,
            lon2,
        },
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate_parser::parse_bbox;
    use crate::types::Layout;

    const TOLERANCE: f64 = 1e-3;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {} got {}",
            expected,
            actual
        );
    }

    fn fields(lat1: AngleField, lat2: AngleField, lon1: AngleField, lon2: AngleField) -> ExtractedBBoxFields {
        ExtractedBBoxFields {
            layout: Layout::A,
            lat1,
            lat2,
            lon1,
            lon2,
        }
    }

    fn normalize_text(text: &str) -> NormalizedBox {
        normalize(&parse_bbox(text).unwrap())
    }

    #[test]
    fn test_dms_to_decimal() {
        for (d, m, s) in [(0.0, 0.0, 0.0), (36.0, 31.0, 0.0), (109.0, 26.0, 59.999), (89.0, 59.5, 12.25)] {
            let expected = d + m / 60.0 + s / 3600.0;
            assert!((dms_to_decimal(d, m, s) - expected).abs() < 1e-9);
        }
        let angle = AngleField::degrees(45.0).with_minute(30.0).with_second(36.0);
        assert!((angle.decimal() - 45.51).abs() < 1e-9);
        assert_eq!(AngleField::degrees(12.5).decimal(), 12.5);
    }

    #[test]
    fn test_reference_box_north_east() {
        let result = normalize_text("36°31′ to 37°20′N, 108°52′ to 109°26′E");
        let c = result.coordinate;
        assert_close(c.lat1, 36.5167);
        assert_close(c.lat2, 37.3333);
        assert_close(c.lon1, 108.8667);
        assert_close(c.lon2, 109.4333);
        assert_close(c.centroid_lat, 36.925);
        assert_close(c.centroid_lon, 109.15);
        assert!(!result.advisories.any());
    }

    #[test]
    fn test_western_longitudes_are_negative() {
        let c = normalize_text("40°41′–40°46′N, 98°29′–98°50′W").coordinate;
        assert!(c.lon1 < 0.0 && c.lon2 < 0.0);
        assert!(c.lat1 > 0.0 && c.lat2 > 0.0);
        assert_close(c.centroid_lon, -98.6583);
    }

    #[test]
    fn test_southern_zero_latitude_stays_positive_zero() {
        let c = normalize_text("0°00′–0°40′S, 110°30′–111°30′E").coordinate;
        assert_eq!(c.lat1, 0.0);
        assert!(c.lat1.is_sign_positive());
        assert_close(c.lat2, -0.6667);
        assert_close(c.lon1, 110.5);
        assert_close(c.lon2, 111.5);
    }

    #[test]
    fn test_direction_fallback_is_symmetric() {
        let lon = AngleField::degrees(100.0).with_direction(Direction::E);
        let first_only = normalize(&fields(
            AngleField::degrees(36.0).with_direction(Direction::S),
            AngleField::degrees(37.0),
            lon,
            lon,
        ));
        let second_only = normalize(&fields(
            AngleField::degrees(36.0),
            AngleField::degrees(37.0).with_direction(Direction::S),
            lon,
            lon,
        ));

        assert_eq!(first_only.coordinate, second_only.coordinate);
        assert_eq!(first_only.coordinate.lat1, -36.0);
        assert_eq!(first_only.coordinate.lat2, -37.0);
    }

    #[test]
    fn test_explicit_directions_are_not_overridden() {
        let result = normalize(&fields(
            AngleField::degrees(5.0).with_direction(Direction::S),
            AngleField::degrees(5.0).with_direction(Direction::N),
            AngleField::degrees(10.0).with_direction(Direction::W),
            AngleField::degrees(10.0).with_direction(Direction::E),
        ));
        let c = result.coordinate;
        assert_eq!((c.lat1, c.lat2, c.lon1, c.lon2), (-5.0, 5.0, -10.0, 10.0));
        assert_eq!((c.centroid_lat, c.centroid_lon), (0.0, 0.0));
    }

    #[test]
    fn test_undirected_pairs_default_positive_with_advisory() {
        let result = normalize_text("10°, 20°, 30°, 40°");
        let c = result.coordinate;
        assert_eq!((c.lat1, c.lat2, c.lon1, c.lon2), (10.0, 20.0, 30.0, 40.0));
        assert!(result.advisories.latitude_undirected);
        assert!(result.advisories.longitude_undirected);
        assert!(!result.advisories.antimeridian_crossing);
    }

    #[test]
    fn test_antimeridian_crossing() {
        let box_fields = fields(
            AngleField::degrees(10.0).with_direction(Direction::S),
            AngleField::degrees(20.0).with_direction(Direction::S),
            AngleField::degrees(170.0).with_direction(Direction::E),
            AngleField::degrees(170.0).with_direction(Direction::W),
        );

        let naive = normalize(&box_fields);
        assert!(naive.advisories.antimeridian_crossing);
        assert_eq!(naive.coordinate.centroid_lon, 0.0);

        let aware = normalize_with(&box_fields, CentroidMode::AntimeridianAware);
        assert!(aware.advisories.antimeridian_crossing);
        assert_close(aware.coordinate.centroid_lon, 180.0);

        let skewed = fields(
            box_fields.lat1,
            box_fields.lat2,
            AngleField::degrees(175.0).with_direction(Direction::E),
            AngleField::degrees(165.0).with_direction(Direction::W),
        );
        let aware = normalize_with(&skewed, CentroidMode::AntimeridianAware);
        assert_close(aware.coordinate.centroid_lon, -175.0);
    }

    #[test]
    fn test_antimeridian_mode_leaves_ordinary_boxes_alone() {
        let parsed = parse_bbox("40°41′–40°46′N, 98°29′–98°50′W").unwrap();
        assert_eq!(
            normalize(&parsed),
            normalize_with(&parsed, CentroidMode::AntimeridianAware)
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let parsed = parse_bbox("34°30′–35°30′N, 111°15′–111°45′W").unwrap();
        let first = normalize(&parsed);
        let second = normalize(&parsed);
        assert_eq!(first.coordinate.lat1.to_bits(), second.coordinate.lat1.to_bits());
        assert_eq!(
            first.coordinate.centroid_lon.to_bits(),
            second.coordinate.centroid_lon.to_bits()
        );
        assert_eq!(first, second);
    }
}
