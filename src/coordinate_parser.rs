//! Bounding-box pattern matching over free text.
//!
//! Every layout is composed from one angle sub-pattern. Each angle has four
//! named slots (`<slot>_pre`, `<slot>_deg`, `<slot>_min`, `<slot>_sec`) plus a
//! trailing direction slot (`<slot>_post`) that is only consulted when the
//! leading one is empty.

use crate::error::MatcherError;
use crate::types::{AngleField, Direction, ExtractedBBoxFields, Layout};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{error, trace};

const LAT_DIRECTION: &str = r"(?i:north|south|n|s)";
const LON_DIRECTION: &str = r"(?i:east|west|e|w)";
const FRACTION: &str = r"(?:\.[0-9]{1,10})?";
const DEGREE_MARK: &str = r"\s*[°º]";
const MINUTE_MARK: &str = r"(?:'|′|´)";
const SECOND_MARK: &str = r#"(?:''|"|′′|ʺ|″)"#;

/// Separator between the two values of one pair.
const RANGE_SEPARATOR: &str = r"(?:to|and|[-–−,])";
/// Separator between the latitude block and the longitude block.
const BLOCK_SEPARATOR: &str = r"(?:,\s*and|,|;|to|and),?\s*(?:(?i:between|from)\s*)?";

const LAT_PREFIX: &str =
    r"(?:(?i:between|about|latitudes?|lat\.?)\s*)?(?:(?i:between|from)\s*)?";
const LON_PREFIX: &str =
    r"(?:(?i:longitudes?|long\.?|lon\.?)\s*)?(?:(?i:between|from)\s*)?";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn direction(self) -> &'static str {
        match self {
            Axis::Latitude => LAT_DIRECTION,
            Axis::Longitude => LON_DIRECTION,
        }
    }

    fn degree_digits(self) -> u8 {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }
}

fn angle_pattern(slot: &str, axis: Axis, degree_mark_required: bool) -> String {
    let direction = axis.direction();
    let digits = axis.degree_digits();
    let degree_mark = if degree_mark_required {
        DEGREE_MARK.to_string()
    } else {
        format!("(?:{})?", DEGREE_MARK)
    };

    format!(
        r"(?:\b(?P<{slot}_pre>{direction})\.?\s*)?(?P<{slot}_deg>[0-9]{{1,{digits}}}{FRACTION}){degree_mark}\s*(?:(?P<{slot}_min>[0-9]{{1,2}}{FRACTION})\s*{MINUTE_MARK}\s*)?(?:(?P<{slot}_sec>[0-9]{{1,2}}{FRACTION})\s*{SECOND_MARK}\s*)?(?:(?P<{slot}_post>{direction})\b)?"
    )
}

/// Regular expression source for one layout.
///
/// The first angle of each pair may omit its degree mark; the second must
/// carry one, which keeps plain number lists from matching.
pub fn layout_pattern(layout: Layout) -> String {
    let lat1 = angle_pattern("lat1", Axis::Latitude, false);
    let lat2 = angle_pattern("lat2", Axis::Latitude, true);
    let lon1 = angle_pattern("lon1", Axis::Longitude, false);
    let lon2 = angle_pattern("lon2", Axis::Longitude, true);

    let lat_range = format!(r"{LAT_PREFIX}{lat1}\s*{RANGE_SEPARATOR}\s*{LAT_PREFIX}{lat2}");
    let lon_range = format!(r"{LON_PREFIX}{lon1}\s*{RANGE_SEPARATOR}\s*{LON_PREFIX}{lon2}");

    match layout {
        Layout::A => format!(r"{lat_range}\s*{BLOCK_SEPARATOR}{lon_range}"),
        Layout::B => format!(r"{lon_range}\s*{BLOCK_SEPARATOR}{lat_range}"),
        Layout::C => format!(
            r"{LAT_PREFIX}{lat1}\s*,\s*{LON_PREFIX}{lon1}\s*{BLOCK_SEPARATOR}{LAT_PREFIX}{lat2}\s*,\s*{LON_PREFIX}{lon2}"
        ),
    }
}

/// A bounding box found in a line, with the span of text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BBoxMatch<'t> {
    pub fields: ExtractedBBoxFields,
    pub span: Range<usize>,
    pub text: &'t str,
}

/// Compiled layouts, tried in priority order. Immutable once built and safe
/// to share across threads.
#[derive(Debug, Clone)]
pub struct BBoxMatcher {
    layouts: Vec<(Layout, Regex)>,
}

impl BBoxMatcher {
    /// Matcher with the default priority A, B, C.
    pub fn new() -> Result<Self, MatcherError> {
        Self::with_layouts(&Layout::DEFAULT_ORDER)
    }

    pub fn with_layouts(order: &[Layout]) -> Result<Self, MatcherError> {
        if order.is_empty() {
            return Err(MatcherError::NoLayouts);
        }

        let mut layouts = Vec::with_capacity(order.len());
        for (idx, layout) in order.iter().enumerate() {
            if order[..idx].contains(layout) {
                return Err(MatcherError::DuplicateLayout(*layout));
            }
            let regex =
                Regex::new(&layout_pattern(*layout)).map_err(|source| MatcherError::Pattern {
                    name: format!("layout {}", layout),
                    source,
                })?;
            layouts.push((*layout, regex));
        }

        Ok(Self { layouts })
    }

    pub fn layouts(&self) -> impl Iterator<Item = Layout> + '_ {
        self.layouts.iter().map(|(layout, _)| *layout)
    }

    /// First layout that matches anywhere in `text`, or `None`.
    pub fn find<'t>(&self, text: &'t str) -> Option<BBoxMatch<'t>> {
        self.layouts.iter().find_map(|(layout, regex)| {
            let caps = regex.captures(text)?;
            let fields = extract_fields(&caps, *layout)?;
            let whole = caps.get(0)?;
            let matched = whole.as_str().trim_end();
            trace!(layout = %layout, matched, "bounding box layout matched");
            Some(BBoxMatch {
                fields,
                span: whole.start()..whole.start() + matched.len(),
                text: matched,
            })
        })
    }

    pub fn parse(&self, text: &str) -> Option<ExtractedBBoxFields> {
        self.find(text).map(|found| found.fields)
    }
}

static DEFAULT_MATCHER: LazyLock<Option<BBoxMatcher>> = LazyLock::new(|| {
    BBoxMatcher::new()
        .map_err(|err| error!("failed to compile bounding box layouts: {}", err))
        .ok()
});

/// Tries layouts A, B and C in order and returns the fields of the first
/// match. `None` means the line holds no recognizable bounding box.
pub fn parse_bbox(text: &str) -> Option<ExtractedBBoxFields> {
    DEFAULT_MATCHER.as_ref()?.parse(text)
}

fn extract_fields(caps: &Captures<'_>, layout: Layout) -> Option<ExtractedBBoxFields> {
    Some(ExtractedBBoxFields {
        layout,
        lat1: angle_field(caps, "lat1")?,
        lat2: angle_field(caps, "lat2")?,
        lon1: angle_field(caps, "lon1")?,
        lon2: angle_field(caps, "lon2")?,
    })
}

fn angle_field(caps: &Captures<'_>, slot: &str) -> Option<AngleField> {
    let degree = capture_number(caps, &format!("{}_deg", slot))?;
    let direction = caps
        .name(&format!("{}_pre", slot))
        .or_else(|| caps.name(&format!("{}_post", slot)))
        .and_then(|m| Direction::from_token(m.as_str()));

    Some(AngleField {
        direction,
        degree,
        minute: capture_number(caps, &format!("{}_min", slot)),
        second: capture_number(caps, &format!("{}_sec", slot)),
    })
}

fn capture_number(caps: &Captures<'_>, name: &str) -> Option<f64> {
    caps.name(name).and_then(|m| m.as_str().parse::<f64>().ok())
}
