//! Per-line extraction over a stream of input lines, plus the match tally
//! callers fold the outcomes into.

use crate::coordinate_parser::BBoxMatcher;
use crate::error::{InputError, MatcherError};
use crate::file_input::{InputLine, LineStream};
use crate::normalize::normalize_with;
use crate::points::{PointCoordinate, PointMatcher};
use crate::types::{CentroidMode, ExtractedBBoxFields, Layout, NormalizedBox};
use tracing::debug;

/// A matched and normalized bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxRecord {
    pub fields: ExtractedBBoxFields,
    pub normalized: NormalizedBox,
    /// The part of the line the layout matched.
    pub matched: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxOutcome {
    Matched(BoxRecord),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineResult {
    BBox(BoxOutcome),
    Points(Vec<PointCoordinate>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
    pub line_number: usize,
    pub text: String,
    pub result: LineResult,
}

impl LineOutcome {
    pub fn is_match(&self) -> bool {
        match &self.result {
            LineResult::BBox(outcome) => matches!(outcome, BoxOutcome::Matched(_)),
            LineResult::Points(points) => !points.is_empty(),
        }
    }
}

/// Running count of processed and matched lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub matched: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &LineOutcome) {
        self.total += 1;
        if outcome.is_match() {
            self.matched += 1;
        }
    }

    pub fn unmatched(&self) -> usize {
        self.total - self.matched
    }

    /// Matched lines as a percentage of all lines; 0 for an empty batch.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 * 100.0 / self.total as f64
        }
    }
}

/// What to extract from each line.
#[derive(Debug, Clone)]
pub enum Extractor {
    BBox {
        matcher: BBoxMatcher,
        centroid: CentroidMode,
    },
    Points(PointMatcher),
}

impl Extractor {
    pub fn bbox(layouts: &[Layout], centroid: CentroidMode) -> Result<Self, MatcherError> {
        Ok(Extractor::BBox {
            matcher: BBoxMatcher::with_layouts(layouts)?,
            centroid,
        })
    }

    pub fn points() -> Result<Self, MatcherError> {
        Ok(Extractor::Points(PointMatcher::new()?))
    }

    pub fn extract(&self, line: InputLine) -> LineOutcome {
        let result = match self {
            Extractor::BBox { matcher, centroid } => LineResult::BBox(
                match matcher.find(&line.text) {
                    Some(found) => BoxOutcome::Matched(BoxRecord {
                        normalized: normalize_with(&found.fields, *centroid),
                        fields: found.fields,
                        matched: found.text.to_string(),
                    }),
                    None => {
                        debug!(line = line.number, text = %line.text, "no bounding box match");
                        BoxOutcome::NoMatch
                    }
                },
            ),
            Extractor::Points(matcher) => {
                let points = matcher.find_all(&line.text);
                if points.is_empty() {
                    debug!(line = line.number, text = %line.text, "no point coordinates found");
                }
                LineResult::Points(points)
            }
        };

        LineOutcome {
            line_number: line.number,
            text: line.text,
            result,
        }
    }
}

pub type OutcomeStream = Box<dyn Iterator<Item = Result<LineOutcome, InputError>>>;

/// Lazily maps every input line to its outcome; read errors pass through.
pub fn extract_stream(lines: LineStream, extractor: Extractor) -> OutcomeStream {
    Box::new(lines.map(move |line| line.map(|line| extractor.extract(line))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_input::{InputSource, open_lines};

    fn line(number: usize, text: &str) -> InputLine {
        InputLine {
            number,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_bbox_extraction_outcomes() {
        let extractor = Extractor::bbox(&Layout::DEFAULT_ORDER, CentroidMode::Arithmetic).unwrap();

        let matched = extractor.extract(line(3, "Area: 40°41′–40°46′N, 98°29′–98°50′W."));
        assert_eq!(matched.line_number, 3);
        assert!(matched.is_match());
        let LineResult::BBox(BoxOutcome::Matched(record)) = matched.result else {
            panic!("expected a bounding box");
        };
        assert_eq!(record.matched, "40°41′–40°46′N, 98°29′–98°50′W");
        assert_eq!(record.fields.layout, Layout::A);
        assert!(record.normalized.coordinate.lon1 < 0.0);

        let missed = extractor.extract(line(4, "somewhere in the mountains"));
        assert!(!missed.is_match());
        assert_eq!(missed.result, LineResult::BBox(BoxOutcome::NoMatch));
    }

    #[test]
    fn test_summary_folds_outcomes() {
        let source = InputSource::Text(
            [
                "36°31′ to 37°20′N, 108°52′ to 109°26′E",
                "no coordinates here",
                "# comment lines are not counted",
                "0°00′–0°40′S, 110°30′–111°30′E",
                "still nothing",
            ]
            .join("\n"),
        );
        let extractor = Extractor::bbox(&Layout::DEFAULT_ORDER, CentroidMode::Arithmetic).unwrap();
        let summary = extract_stream(open_lines(&source).unwrap(), extractor)
            .map(Result::unwrap)
            .fold(BatchSummary::default(), |mut summary, outcome| {
                summary.record(&outcome);
                summary
            });

        assert_eq!(summary.total, 4);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.unmatched(), 2);
        assert_eq!(summary.match_rate(), 50.0);
    }

    #[test]
    fn test_empty_summary_rate_is_zero() {
        assert_eq!(BatchSummary::default().match_rate(), 0.0);
    }

    #[test]
    fn test_points_extraction() {
        let extractor = Extractor::points().unwrap();
        let outcome = extractor.extract(line(1, "Plots at 12°N 34°E and 13°S 35°W"));
        assert!(outcome.is_match());
        let LineResult::Points(points) = outcome.result else {
            panic!("expected points");
        };
        assert_eq!(points.len(), 2);

        let outcome = extractor.extract(line(2, "no points"));
        assert!(!outcome.is_match());
    }
}
