//! Execution planning: turn parsed CLI data into an outcome stream and output settings.

use crate::config::{Command, Parameters};
use latlonbox::batch::{Extractor, OutcomeStream, extract_stream};
use latlonbox::error::PlannerError;
use latlonbox::file_input::{InputSource, open_lines};
use tracing::debug;

pub struct ComputePlan {
    pub outcomes: OutcomeStream,
    pub command: Command,
    pub params: Parameters,
}

pub struct OutputPlan {
    pub flush_each_record: bool,
}

pub fn build_job(
    source: InputSource,
    command: Command,
    params: Parameters,
) -> Result<(ComputePlan, OutputPlan), PlannerError> {
    let extractor = match command {
        Command::BBox => Extractor::bbox(&params.matching.layouts, params.matching.centroid)?,
        Command::Points => Extractor::points()?,
    };
    let lines = open_lines(&source)?;
    debug!(
        command = command.name(),
        source = %source.display_name(),
        format = params.output.format.as_str(),
        "extraction planned"
    );

    let compute_plan = ComputePlan {
        outcomes: extract_stream(lines, extractor),
        command,
        params,
    };
    let output_plan = OutputPlan {
        flush_each_record: source.is_stdin(),
    };
    Ok((compute_plan, output_plan))
}
