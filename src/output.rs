//! Output formatting for CSV, JSON, and text table formats.

pub(crate) mod formatters;

use crate::config::{Command, OutputFormat, Parameters};
use crate::planner::OutputPlan;
use formatters::{CsvFormatter, Formatter, JsonFormatter, TextFormatter};
use latlonbox::batch::{BatchSummary, BoxOutcome, BoxRecord, LineOutcome, LineResult, OutcomeStream};
use latlonbox::error::OutputError;
use latlonbox::points::PointCoordinate;
use latlonbox::types::{Layout, NormalizedCoordinate};
use serde::Serialize;
use std::io::{self, BufWriter, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const INPUT_COLUMN_WIDTH: usize = 40;
const MATCH_COLUMN_WIDTH: usize = 32;
const NOTES_COLUMN_WIDTH: usize = 42;
const NUMBER_COLUMN_WIDTH: usize = 11;

/// One output row of the bbox command. `record` is `None` for unmatched lines.
pub struct BoxRow<'a> {
    pub line: usize,
    pub input: Option<&'a str>,
    pub record: Option<&'a BoxRecord>,
}

/// One output row of the points command.
pub struct PointRow<'a> {
    pub line: usize,
    pub input: Option<&'a str>,
    pub point: &'a PointCoordinate,
}

/// Expands a line outcome into its output rows.
pub fn box_rows<'a>(
    outcome: &'a LineOutcome,
    show_inputs: bool,
    show_unmatched: bool,
) -> Vec<BoxRow<'a>> {
    let input = show_inputs.then_some(outcome.text.as_str());
    match &outcome.result {
        LineResult::BBox(BoxOutcome::Matched(record)) => vec![BoxRow {
            line: outcome.line_number,
            input,
            record: Some(record),
        }],
        LineResult::BBox(BoxOutcome::NoMatch) if show_unmatched => vec![BoxRow {
            line: outcome.line_number,
            input,
            record: None,
        }],
        _ => Vec::new(),
    }
}

pub fn point_rows(outcome: &LineOutcome, show_inputs: bool) -> Vec<PointRow<'_>> {
    let input = show_inputs.then_some(outcome.text.as_str());
    match &outcome.result {
        LineResult::Points(points) => points
            .iter()
            .map(|point| PointRow {
                line: outcome.line_number,
                input,
                point,
            })
            .collect(),
        LineResult::BBox(_) => Vec::new(),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn write_csv_box<W: Write>(
    row: &BoxRow<'_>,
    show_inputs: bool,
    headers: bool,
    first: bool,
    writer: &mut W,
) -> io::Result<()> {
    if first && headers {
        if show_inputs {
            writeln!(
                writer,
                "line,input,layout,matched,lat1,lat2,lon1,lon2,centroid_lat,centroid_lon,advisories"
            )?;
        } else {
            writeln!(
                writer,
                "line,layout,lat1,lat2,lon1,lon2,centroid_lat,centroid_lon,advisories"
            )?;
        }
    }

    write!(writer, "{}", row.line)?;
    if let Some(input) = row.input {
        write!(writer, ",{}", csv_field(input))?;
    }
    match row.record {
        Some(record) => {
            let c = &record.normalized.coordinate;
            write!(writer, ",{}", record.fields.layout)?;
            if show_inputs {
                write!(writer, ",{}", csv_field(&record.matched))?;
            }
            writeln!(
                writer,
                ",{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{}",
                c.lat1,
                c.lat2,
                c.lon1,
                c.lon2,
                c.centroid_lat,
                c.centroid_lon,
                record.normalized.advisories
            )
        }
        None => {
            let empty = if show_inputs { ",,,,,,,,," } else { ",,,,,,,," };
            writeln!(writer, "{}", empty)
        }
    }
}

pub fn write_csv_point<W: Write>(
    row: &PointRow<'_>,
    show_inputs: bool,
    headers: bool,
    first: bool,
    writer: &mut W,
) -> io::Result<()> {
    if first && headers {
        if show_inputs {
            writeln!(writer, "line,input,latitude,longitude,matched")?;
        } else {
            writeln!(writer, "line,latitude,longitude,matched")?;
        }
    }

    write!(writer, "{}", row.line)?;
    if let Some(input) = row.input {
        write!(writer, ",{}", csv_field(input))?;
    }
    let p = row.point;
    writeln!(
        writer,
        ",{:.*},{:.*},{}",
        p.decimals,
        p.latitude,
        p.decimals,
        p.longitude,
        csv_field(&p.text)
    )
}

#[derive(Serialize)]
struct BoxJson<'a> {
    layout: Layout,
    matched: &'a str,
    #[serde(flatten)]
    coordinate: &'a NormalizedCoordinate,
    advisories: Vec<&'static str>,
}

#[derive(Serialize)]
struct BoxLineJson<'a> {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a str>,
    found: bool,
    #[serde(flatten)]
    bbox: Option<BoxJson<'a>>,
}

#[derive(Serialize)]
struct PointLineJson<'a> {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a str>,
    #[serde(flatten)]
    point: &'a PointCoordinate,
}

pub fn write_json_box<W: Write>(row: &BoxRow<'_>, writer: &mut W) -> Result<(), OutputError> {
    let json = BoxLineJson {
        line: row.line,
        input: row.input,
        found: row.record.is_some(),
        bbox: row.record.map(|record| BoxJson {
            layout: record.fields.layout,
            matched: &record.matched,
            coordinate: &record.normalized.coordinate,
            advisories: record.normalized.advisories.labels(),
        }),
    };
    serde_json::to_writer(&mut *writer, &json)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_json_point<W: Write>(row: &PointRow<'_>, writer: &mut W) -> Result<(), OutputError> {
    let json = PointLineJson {
        line: row.line,
        input: row.input,
        point: row.point,
    };
    serde_json::to_writer(&mut *writer, &json)?;
    writeln!(writer)?;
    Ok(())
}

/// Cuts `text` to at most `width` display columns, marking the cut with `…`.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Left-aligns by display width; `format!` padding counts chars instead.
fn pad_left_aligned(text: &str, width: usize) -> String {
    let fitted = fit(text, width);
    let padding = width.saturating_sub(fitted.width());
    format!("{}{}", fitted, " ".repeat(padding))
}

fn write_border<W: Write>(
    writer: &mut W,
    widths: &[usize],
    (left, mid, right): (char, char, char),
) -> io::Result<()> {
    write!(writer, "{}", left)?;
    for (i, &width) in widths.iter().enumerate() {
        write!(writer, "{}", "─".repeat(width + 2))?;
        if i < widths.len() - 1 {
            write!(writer, "{}", mid)?;
        }
    }
    writeln!(writer, "{}", right)
}

/// Streaming box-drawing table: header before the first row, footer at the end.
pub struct TextTable {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
    numeric: Vec<bool>,
    started: bool,
}

impl TextTable {
    pub fn for_command(command: Command, show_inputs: bool) -> Self {
        let mut columns: Vec<(&'static str, usize, bool)> = vec![("Line", 6, true)];
        if show_inputs {
            columns.push(("Input", INPUT_COLUMN_WIDTH, false));
        }
        match command {
            Command::BBox => {
                columns.push(("Layout", 6, false));
                for name in [
                    "Lat 1",
                    "Lat 2",
                    "Lon 1",
                    "Lon 2",
                    "Centroid Lat",
                    "Centroid Lon",
                ] {
                    columns.push((name, NUMBER_COLUMN_WIDTH.max(name.len()), true));
                }
                columns.push(("Notes", NOTES_COLUMN_WIDTH, false));
            }
            Command::Points => {
                columns.push(("Latitude", NUMBER_COLUMN_WIDTH, true));
                columns.push(("Longitude", NUMBER_COLUMN_WIDTH, true));
                columns.push(("Matched", MATCH_COLUMN_WIDTH, false));
            }
        }

        Self {
            headers: columns.iter().map(|c| c.0).collect(),
            widths: columns.iter().map(|c| c.1).collect(),
            numeric: columns.iter().map(|c| c.2).collect(),
            started: false,
        }
    }

    pub fn write_row<W: Write>(&mut self, cells: &[String], writer: &mut W) -> io::Result<()> {
        if !self.started {
            write_border(writer, &self.widths, ('┌', '┬', '┐'))?;
            write!(writer, "│")?;
            for (header, &width) in self.headers.iter().zip(&self.widths) {
                write!(writer, " {} │", pad_left_aligned(header, width))?;
            }
            writeln!(writer)?;
            write_border(writer, &self.widths, ('├', '┼', '┤'))?;
            self.started = true;
        }

        write!(writer, "│")?;
        for ((cell, &width), &numeric) in cells.iter().zip(&self.widths).zip(&self.numeric) {
            if numeric {
                write!(writer, " {:>width$} │", cell, width = width)?;
            } else {
                write!(writer, " {} │", pad_left_aligned(cell, width))?;
            }
        }
        writeln!(writer)
    }

    pub fn finish<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.started {
            write_border(writer, &self.widths, ('└', '┴', '┘'))?;
        }
        Ok(())
    }
}

pub fn box_cells(row: &BoxRow<'_>) -> Vec<String> {
    let mut cells = vec![row.line.to_string()];
    if let Some(input) = row.input {
        cells.push(input.to_string());
    }
    match row.record {
        Some(record) => {
            let c = &record.normalized.coordinate;
            cells.push(record.fields.layout.to_string());
            cells.extend(
                [c.lat1, c.lat2, c.lon1, c.lon2, c.centroid_lat, c.centroid_lon]
                    .iter()
                    .map(|v| format!("{:.6}", v)),
            );
            cells.push(record.normalized.advisories.to_string());
        }
        None => {
            cells.push("-".to_string());
            cells.extend(std::iter::repeat_n(String::new(), 6));
            cells.push("no match".to_string());
        }
    }
    cells
}

pub fn point_cells(row: &PointRow<'_>) -> Vec<String> {
    let mut cells = vec![row.line.to_string()];
    if let Some(input) = row.input {
        cells.push(input.to_string());
    }
    let p = row.point;
    cells.push(format!("{:.*}", p.decimals, p.latitude));
    cells.push(format!("{:.*}", p.decimals, p.longitude));
    cells.push(p.text.clone());
    cells
}

/// Writes every outcome in the requested format and returns the match tally.
pub fn dispatch_output(
    outcomes: OutcomeStream,
    command: Command,
    params: &Parameters,
    plan: &OutputPlan,
) -> Result<BatchSummary, OutputError> {
    let mut summary = BatchSummary::default();
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let flush_each = plan.flush_each_record;

    let mut formatter: Box<dyn Formatter + '_> = match params.output.format {
        OutputFormat::Csv => Box::new(CsvFormatter::new(&mut writer, params, command, flush_each)),
        OutputFormat::Json => Box::new(JsonFormatter::new(&mut writer, params, command, flush_each)),
        OutputFormat::Text => Box::new(TextFormatter::new(&mut writer, params, command, flush_each)),
        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => Box::new(crate::parquet::ParquetFormatter::new(
            BufWriter::new(io::stdout()),
            params,
            command,
        )),
    };

    formatter.write(outcomes, &mut summary)?;
    drop(formatter);
    writer.flush()?;
    Ok(summary)
}
