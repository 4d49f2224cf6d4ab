//! Extraction of single latitude/longitude points such as `36°31′N 108°52′W`.
//!
//! Unlike bounding boxes, both axes of a point must carry a compass
//! direction, and results are rounded to the precision the text implies.

use crate::error::MatcherError;
use crate::types::Direction;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::trace;

const FRACTION: &str = r"(?:\.[0-9]{1,10})?";

fn axis_pattern(prefix: &str, direction: &str, degree_digits: u8) -> String {
    format!(
        r#"(?:\b(?P<{prefix}_pre>{direction})\.?\s?)?(?P<{prefix}_deg>[0-9]{{1,{degree_digits}}}{FRACTION})(?:\s?[°º]\s?|\s)?(?:(?P<{prefix}_min>[0-9]{{1,2}}{FRACTION})\s?(?:'|′|´)?\s?(?:(?P<{prefix}_sec>[0-9]{{1,2}}{FRACTION})\s?(?:''|"|′′|ʺ|″)?)?)?(?:\s?(?P<{prefix}_post>{direction})\b)?"#
    )
}

fn point_pattern() -> String {
    let lat = axis_pattern("lat", r"(?i:north|south|n|s)", 2);
    let lon = axis_pattern("lon", r"(?i:east|west|e|w)", 3);
    format!(r"{lat}(?:\s?[ /]\s?|,\s*)?{lon}")
}

/// A point converted to decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Decimal places implied by the source text: 6 with seconds, 3 with
    /// minutes, otherwise the number of fractional degree digits.
    pub decimals: usize,
    #[serde(rename = "matched")]
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct AxisParts {
    direction: Direction,
    degree: f64,
    degree_decimals: usize,
    minute: f64,
    second: f64,
    has_minute: bool,
    has_second: bool,
}

impl AxisParts {
    fn decimal(&self) -> f64 {
        // Two-digit "seconds" above 59 are a decimal fraction of minutes.
        let minutes = if self.second > 59.0 {
            self.minute + self.second / 100.0
        } else {
            self.minute + self.second / 60.0
        };
        let value = self.degree + minutes / 60.0;
        if self.direction.is_negative() && value != 0.0 {
            -value
        } else {
            value
        }
    }
}

#[derive(Debug, Clone)]
pub struct PointMatcher {
    regex: Regex,
}

impl PointMatcher {
    pub fn new() -> Result<Self, MatcherError> {
        let regex = Regex::new(&point_pattern()).map_err(|source| MatcherError::Pattern {
            name: "point coordinates".to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Every point in `text`, left to right. Candidates without a direction
    /// on both axes, or outside ±90/±180, are skipped and the search resumes
    /// one character later.
    pub fn find_all(&self, text: &str) -> Vec<PointCoordinate> {
        let mut points = Vec::new();
        let mut start = 0;

        while start <= text.len() {
            let Some(caps) = self.regex.captures_at(text, start) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            match point_from(text, &caps) {
                Some(point) => {
                    trace!(matched = %point.text, "point coordinate matched");
                    start = whole.end().max(whole.start() + 1);
                    points.push(point);
                }
                None => {
                    start = whole.start()
                        + text[whole.start()..]
                            .chars()
                            .next()
                            .map_or(1, char::len_utf8);
                }
            }
        }

        points
    }
}

static DEFAULT_POINT_MATCHER: LazyLock<Option<PointMatcher>> = LazyLock::new(|| {
    PointMatcher::new()
        .map_err(|err| tracing::error!("failed to compile point pattern: {}", err))
        .ok()
});

pub fn parse_points(text: &str) -> Vec<PointCoordinate> {
    DEFAULT_POINT_MATCHER
        .as_ref()
        .map(|matcher| matcher.find_all(text))
        .unwrap_or_default()
}

/// True when the byte offset sits right after a digit or decimal point, i.e.
/// the candidate starts in the middle of a longer number.
fn inside_number(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

fn fraction_digits(number: &str) -> usize {
    number.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

fn axis_parts(
    text: &str,
    caps: &Captures<'_>,
    prefix: &str,
    max_degree: f64,
) -> Option<AxisParts> {
    let number = |suffix: &str| {
        caps.name(&format!("{}_{}", prefix, suffix))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    };

    let degree_match = caps.name(&format!("{}_deg", prefix))?;
    if inside_number(text, degree_match.start()) {
        return None;
    }

    let direction = caps
        .name(&format!("{}_pre", prefix))
        .or_else(|| caps.name(&format!("{}_post", prefix)))
        .and_then(|m| Direction::from_token(m.as_str()))?;
    let degree = number("deg")?;
    let minute = number("min");
    let second = number("sec");

    if degree > max_degree || minute.is_some_and(|m| m >= 60.0) {
        return None;
    }

    Some(AxisParts {
        direction,
        degree,
        degree_decimals: fraction_digits(degree_match.as_str()),
        minute: minute.unwrap_or(0.0),
        second: second.unwrap_or(0.0),
        has_minute: minute.is_some_and(|m| m != 0.0),
        has_second: second.is_some_and(|s| s != 0.0),
    })
}

fn point_from(text: &str, caps: &Captures<'_>) -> Option<PointCoordinate> {
    let lat = axis_parts(text, caps, "lat", 90.0)?;
    let lon = axis_parts(text, caps, "lon", 180.0)?;

    let implied = if lat.has_second || lon.has_second {
        6
    } else if lat.has_minute || lon.has_minute {
        3
    } else {
        0
    };
    let decimals = implied
        .max(lat.degree_decimals)
        .max(lon.degree_decimals);

    Some(PointCoordinate {
        latitude: round_to(lat.decimal(), decimals),
        longitude: round_to(lon.decimal(), decimals),
        decimals,
        text: caps.get(0)?.as_str().trim().to_string(),
    })
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round_ties_even() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_directions_with_minutes() {
        let points = parse_points("Site located at 36°31′N 108°52′W near the river");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].latitude, 36.517);
        assert_eq!(points[0].longitude, -108.867);
        assert_eq!(points[0].decimals, 3);
        assert_eq!(points[0].text, "36°31′N 108°52′W");
    }

    #[test]
    fn test_leading_directions_with_seconds() {
        let points = parse_points("N 50°30′30″, W 50°30′30″");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].latitude, 50.508333);
        assert_eq!(points[0].longitude, -50.508333);
        assert_eq!(points[0].decimals, 6);
    }

    #[test]
    fn test_decimal_degrees_with_slash() {
        let points = parse_points("36.5 S / 108.75 E");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].latitude, -36.5);
        assert_eq!(points[0].longitude, 108.75);
        assert_eq!(points[0].decimals, 2);
    }

    #[test]
    fn test_seconds_above_59_are_fraction_of_minutes() {
        let points = parse_points("S 60°30′75″ E 50°40′00″");
        assert_eq!(points.len(), 1);
        // 30.75 minutes
        assert_eq!(points[0].latitude, -60.5125);
        assert_eq!(points[0].longitude, 50.666667);
        assert_eq!(points[0].decimals, 6);
    }

    #[test]
    fn test_multiple_points_in_one_line() {
        let points = parse_points("Plots at 12°N 34°E and 13°S 35°W");
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].latitude, points[0].longitude), (12.0, 34.0));
        assert_eq!((points[1].latitude, points[1].longitude), (-13.0, -35.0));
    }

    #[test]
    fn test_axes_are_read_independently() {
        // Longitude minutes without latitude minutes, trailing then leading direction.
        for text in ["36°N 108°52′W", "36°N W 108°52′"] {
            let points = parse_points(text);
            assert_eq!(points.len(), 1, "{text}");
            assert_eq!(points[0].latitude, 36.0, "{text}");
            assert_eq!(points[0].longitude, -108.867, "{text}");
            assert_eq!(points[0].decimals, 3, "{text}");
            assert_eq!(points[0].text, text);
        }
    }

    #[test]
    fn test_points_require_directions_and_ranges() {
        assert!(parse_points("12 plots and 40 transects").is_empty());
        assert!(parse_points("36°31′ 108°52′").is_empty());
        assert!(parse_points("95°N 10°E").is_empty());
        assert!(parse_points("N 1030 E").is_empty());
        assert!(parse_points("somewhere in the mountains").is_empty());
    }
}
