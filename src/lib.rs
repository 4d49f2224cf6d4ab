//! Bounding-box extraction from free-text coordinate descriptions.
//!
//! ```
//! let fields = latlonbox::parse_bbox("36°31′ to 37°20′N, 108°52′ to 109°26′E").unwrap();
//! let result = latlonbox::normalize(&fields);
//! assert!((result.coordinate.centroid_lat - 36.925).abs() < 1e-3);
//! ```

pub mod batch;
pub mod coordinate_parser;
pub mod error;
pub mod file_input;
pub mod normalize;
pub mod points;
pub mod types;

pub use batch::{BatchSummary, BoxOutcome, BoxRecord, Extractor, LineOutcome, LineResult};
pub use coordinate_parser::{BBoxMatch, BBoxMatcher, parse_bbox};
pub use normalize::{dms_to_decimal, normalize, normalize_with};
pub use points::{PointCoordinate, PointMatcher, parse_points};
pub use types::*;
