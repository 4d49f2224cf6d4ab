use super::{
    TextTable, box_cells, box_rows, point_cells, point_rows, write_csv_box, write_csv_point,
    write_json_box, write_json_point,
};
use crate::config::{Command, Parameters};
use latlonbox::batch::{BatchSummary, OutcomeStream};
use latlonbox::error::OutputError;
use std::io::Write;

pub trait Formatter {
    /// Writes all outcomes, folding each into `summary`, and returns the
    /// number of rows written.
    fn write(
        &mut self,
        outcomes: OutcomeStream,
        summary: &mut BatchSummary,
    ) -> Result<usize, OutputError>;
}

pub struct CsvFormatter<'a, W: Write> {
    writer: &'a mut W,
    command: Command,
    show_inputs: bool,
    show_unmatched: bool,
    headers: bool,
    flush_each: bool,
}

impl<'a, W: Write> CsvFormatter<'a, W> {
    pub fn new(
        writer: &'a mut W,
        params: &'a Parameters,
        command: Command,
        flush_each: bool,
    ) -> Self {
        Self {
            writer,
            command,
            show_inputs: params.output.should_show_inputs(),
            show_unmatched: params.output.show_unmatched,
            headers: params.output.headers,
            flush_each,
        }
    }
}

impl<'a, W: Write> Formatter for CsvFormatter<'a, W> {
    fn write(
        &mut self,
        outcomes: OutcomeStream,
        summary: &mut BatchSummary,
    ) -> Result<usize, OutputError> {
        let mut count = 0;
        for outcome in outcomes {
            let outcome = outcome?;
            summary.record(&outcome);
            match self.command {
                Command::BBox => {
                    for row in box_rows(&outcome, self.show_inputs, self.show_unmatched) {
                        write_csv_box(&row, self.show_inputs, self.headers, count == 0, self.writer)?;
                        count += 1;
                    }
                }
                Command::Points => {
                    for row in point_rows(&outcome, self.show_inputs) {
                        write_csv_point(&row, self.show_inputs, self.headers, count == 0, self.writer)?;
                        count += 1;
                    }
                }
            }
            if self.flush_each {
                self.writer.flush()?;
            }
        }
        Ok(count)
    }
}

pub struct JsonFormatter<'a, W: Write> {
    writer: &'a mut W,
    command: Command,
    show_inputs: bool,
    show_unmatched: bool,
    flush_each: bool,
}

impl<'a, W: Write> JsonFormatter<'a, W> {
    pub fn new(
        writer: &'a mut W,
        params: &'a Parameters,
        command: Command,
        flush_each: bool,
    ) -> Self {
        Self {
            writer,
            command,
            show_inputs: params.output.should_show_inputs(),
            show_unmatched: params.output.show_unmatched,
            flush_each,
        }
    }
}

impl<'a, W: Write> Formatter for JsonFormatter<'a, W> {
    fn write(
        &mut self,
        outcomes: OutcomeStream,
        summary: &mut BatchSummary,
    ) -> Result<usize, OutputError> {
        let mut count = 0;
        for outcome in outcomes {
            let outcome = outcome?;
            summary.record(&outcome);
            match self.command {
                Command::BBox => {
                    for row in box_rows(&outcome, self.show_inputs, self.show_unmatched) {
                        write_json_box(&row, self.writer)?;
                        count += 1;
                    }
                }
                Command::Points => {
                    for row in point_rows(&outcome, self.show_inputs) {
                        write_json_point(&row, self.writer)?;
                        count += 1;
                    }
                }
            }
            if self.flush_each {
                self.writer.flush()?;
            }
        }
        Ok(count)
    }
}

pub struct TextFormatter<'a, W: Write> {
    writer: &'a mut W,
    command: Command,
    show_inputs: bool,
    show_unmatched: bool,
    flush_each: bool,
}

impl<'a, W: Write> TextFormatter<'a, W> {
    pub fn new(
        writer: &'a mut W,
        params: &'a Parameters,
        command: Command,
        flush_each: bool,
    ) -> Self {
        Self {
            writer,
            command,
            show_inputs: params.output.should_show_inputs(),
            show_unmatched: params.output.show_unmatched,
            flush_each,
        }
    }
}

impl<'a, W: Write> Formatter for TextFormatter<'a, W> {
    fn write(
        &mut self,
        outcomes: OutcomeStream,
        summary: &mut BatchSummary,
    ) -> Result<usize, OutputError> {
        let mut table = TextTable::for_command(self.command, self.show_inputs);
        let mut count = 0;
        for outcome in outcomes {
            let outcome = outcome?;
            summary.record(&outcome);
            let cells: Vec<Vec<String>> = match self.command {
                Command::BBox => box_rows(&outcome, self.show_inputs, self.show_unmatched)
                    .iter()
                    .map(box_cells)
                    .collect(),
                Command::Points => point_rows(&outcome, self.show_inputs)
                    .iter()
                    .map(point_cells)
                    .collect(),
            };
            for row in &cells {
                table.write_row(row, self.writer)?;
                count += 1;
            }
            if self.flush_each {
                self.writer.flush()?;
            }
        }
        table.finish(self.writer)?;
        Ok(count)
    }
}
