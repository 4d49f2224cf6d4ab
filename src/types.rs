use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Compass direction attached to a single angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    /// Reduces a direction word or letter to its first character, uppercased.
    /// Returns `None` for anything that does not start with N, S, E or W.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.chars().next()?.to_ascii_uppercase() {
            'N' => Some(Direction::N),
            'S' => Some(Direction::S),
            'E' => Some(Direction::E),
            'W' => Some(Direction::W),
            _ => None,
        }
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Direction::S | Direction::W)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::E => "E",
            Direction::W => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One angular component as captured from the text. Degrees are always
/// non-negative here; the sign comes from the direction during normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleField {
    pub direction: Option<Direction>,
    pub degree: f64,
    pub minute: Option<f64>,
    pub second: Option<f64>,
}

impl AngleField {
    pub fn degrees(degree: f64) -> Self {
        Self {
            direction: None,
            degree,
            minute: None,
            second: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_minute(mut self, minute: f64) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn with_second(mut self, second: f64) -> Self {
        self.second = Some(second);
        self
    }
}

/// Textual arrangement of the four angles in a bounding-box description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Layout {
    /// Latitude range, then longitude range.
    A,
    /// Longitude range, then latitude range.
    B,
    /// Two comma-joined lat/lon corner pairs.
    C,
}

impl Layout {
    pub const DEFAULT_ORDER: [Layout; 3] = [Layout::A, Layout::B, Layout::C];

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::A => "A",
            Layout::B => "B",
            Layout::C => "C",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "LATLON" => Ok(Layout::A),
            "B" | "LONLAT" => Ok(Layout::B),
            "C" | "PAIRS" => Ok(Layout::C),
            _ => Err(format!(
                "Unknown layout: {} (expected A, B, or C)",
                s.trim()
            )),
        }
    }
}

/// The eight semantic fields of a successful match, per angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedBBoxFields {
    pub layout: Layout,
    pub lat1: AngleField,
    pub lat2: AngleField,
    pub lon1: AngleField,
    pub lon2: AngleField,
}

/// Signed decimal-degree bounding box with its centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedCoordinate {
    pub centroid_lat: f64,
    pub centroid_lon: f64,
    pub lat1: f64,
    pub lat2: f64,
    pub lon1: f64,
    pub lon2: f64,
}

/// Non-fatal conditions detected while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Advisories {
    /// Neither latitude carried a direction; both were taken as north.
    pub latitude_undirected: bool,
    /// Neither longitude carried a direction; both were taken as east.
    pub longitude_undirected: bool,
    /// `|lon1 - lon2| > 180`, so the plain centroid average is misleading.
    pub antimeridian_crossing: bool,
}

impl Advisories {
    pub fn any(&self) -> bool {
        self.latitude_undirected || self.longitude_undirected || self.antimeridian_crossing
    }

    /// Short labels of the raised advisories, in a stable order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.latitude_undirected {
            labels.push("latitude-undirected");
        }
        if self.longitude_undirected {
            labels.push("longitude-undirected");
        }
        if self.antimeridian_crossing {
            labels.push("antimeridian-crossing");
        }
        labels
    }
}

impl fmt::Display for Advisories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(";"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub coordinate: NormalizedCoordinate,
    pub advisories: Advisories,
}

/// How the longitude centroid is averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CentroidMode {
    /// Plain arithmetic mean, wrong for boxes spanning ±180°.
    #[default]
    Arithmetic,
    /// Averages across the antimeridian when the longitudes are more than
    /// 180° apart and wraps the result into (-180, 180].
    AntimeridianAware,
}
