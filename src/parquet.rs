//! Parquet output format support.

use crate::config::{Command, Parameters};
use crate::output::formatters::Formatter;
use crate::output::{BoxRow, PointRow, box_rows, point_rows};
use arrow::array::{ArrayRef, Float64Builder, StringBuilder, UInt8Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use latlonbox::batch::{BatchSummary, OutcomeStream};
use latlonbox::error::OutputError;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::{self, Write};
use std::sync::Arc;

const BATCH_SIZE: usize = 8192;

pub struct ParquetFormatter<W: Write + Send> {
    writer: Option<W>,
    command: Command,
    show_inputs: bool,
    show_unmatched: bool,
}

impl<W: Write + Send> ParquetFormatter<W> {
    pub fn new(writer: W, params: &Parameters, command: Command) -> Self {
        Self {
            writer: Some(writer),
            command,
            show_inputs: params.output.should_show_inputs(),
            show_unmatched: params.output.show_unmatched,
        }
    }
}

impl<W: Write + Send> Formatter for ParquetFormatter<W> {
    fn write(
        &mut self,
        outcomes: OutcomeStream,
        summary: &mut BatchSummary,
    ) -> Result<usize, OutputError> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| io::Error::other("Parquet output already written"))?;
        match self.command {
            Command::BBox => {
                let columns = BoxColumns::new(self.show_inputs);
                let show_unmatched = self.show_unmatched;
                let show_inputs = self.show_inputs;
                write_batches(outcomes, summary, writer, columns, move |outcome, columns| {
                    let rows = box_rows(outcome, show_inputs, show_unmatched);
                    rows.iter().for_each(|row| columns.append(row));
                    rows.len()
                })
            }
            Command::Points => {
                let columns = PointColumns::new(self.show_inputs);
                let show_inputs = self.show_inputs;
                write_batches(outcomes, summary, writer, columns, move |outcome, columns| {
                    let rows = point_rows(outcome, show_inputs);
                    rows.iter().for_each(|row| columns.append(row));
                    rows.len()
                })
            }
        }
    }
}

/// Column builders for one output schema.
trait ColumnSet {
    fn schema(&self) -> Arc<Schema>;
    /// Finishes every builder, leaving them empty for the next batch.
    fn finish(&mut self) -> Vec<ArrayRef>;
}

fn write_batches<W, C, F>(
    outcomes: OutcomeStream,
    summary: &mut BatchSummary,
    writer: W,
    mut columns: C,
    mut append: F,
) -> Result<usize, OutputError>
where
    W: Write + Send,
    C: ColumnSet,
    F: FnMut(&latlonbox::LineOutcome, &mut C) -> usize,
{
    let schema = columns.schema();
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut parquet_writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

    let mut batch_count = 0;
    let mut total_count = 0;

    for outcome in outcomes {
        let outcome = outcome?;
        summary.record(&outcome);
        let appended = append(&outcome, &mut columns);
        batch_count += appended;
        total_count += appended;

        if batch_count >= BATCH_SIZE {
            flush_batch(&mut parquet_writer, &schema, &mut columns)?;
            batch_count = 0;
        }
    }

    if batch_count > 0 {
        flush_batch(&mut parquet_writer, &schema, &mut columns)?;
    }

    let mut inner = parquet_writer.into_inner()?;
    inner.flush()?;
    Ok(total_count)
}

fn flush_batch<W: Write + Send, C: ColumnSet>(
    writer: &mut ArrowWriter<W>,
    schema: &Arc<Schema>,
    columns: &mut C,
) -> Result<(), OutputError> {
    let batch = RecordBatch::try_new(schema.clone(), columns.finish())?;
    writer.write(&batch)?;
    Ok(())
}

struct BoxColumns {
    line: UInt64Builder,
    input: Option<StringBuilder>,
    layout: StringBuilder,
    matched: Option<StringBuilder>,
    /// lat1, lat2, lon1, lon2, centroid_lat, centroid_lon
    values: [Float64Builder; 6],
    advisories: StringBuilder,
}

const BOX_VALUE_COLUMNS: [&str; 6] = [
    "lat1",
    "lat2",
    "lon1",
    "lon2",
    "centroid_lat",
    "centroid_lon",
];

impl BoxColumns {
    fn new(show_inputs: bool) -> Self {
        Self {
            line: UInt64Builder::with_capacity(BATCH_SIZE),
            input: show_inputs.then(|| StringBuilder::with_capacity(BATCH_SIZE, BATCH_SIZE * 64)),
            layout: StringBuilder::with_capacity(BATCH_SIZE, BATCH_SIZE),
            matched: show_inputs.then(|| StringBuilder::with_capacity(BATCH_SIZE, BATCH_SIZE * 48)),
            values: std::array::from_fn(|_| Float64Builder::with_capacity(BATCH_SIZE)),
            advisories: StringBuilder::with_capacity(BATCH_SIZE, BATCH_SIZE * 8),
        }
    }

    fn append(&mut self, row: &BoxRow<'_>) {
        self.line.append_value(row.line as u64);
        if let Some(b) = self.input.as_mut() {
            b.append_option(row.input);
        }
        match row.record {
            Some(record) => {
                let c = &record.normalized.coordinate;
                self.layout.append_value(record.fields.layout.as_str());
                if let Some(b) = self.matched.as_mut() {
                    b.append_value(&record.matched);
                }
                let values = [c.lat1, c.lat2, c.lon1, c.lon2, c.centroid_lat, c.centroid_lon];
                for (builder, value) in self.values.iter_mut().zip(values) {
                    builder.append_value(value);
                }
                self.advisories
                    .append_value(record.normalized.advisories.to_string());
            }
            None => {
                self.layout.append_null();
                if let Some(b) = self.matched.as_mut() {
                    b.append_null();
                }
                for builder in self.values.iter_mut() {
                    builder.append_null();
                }
                self.advisories.append_null();
            }
        }
    }
}

impl ColumnSet for BoxColumns {
    fn schema(&self) -> Arc<Schema> {
        let mut fields = vec![Field::new("line", DataType::UInt64, false)];
        if self.input.is_some() {
            fields.push(Field::new("input", DataType::Utf8, false));
        }
        fields.push(Field::new("layout", DataType::Utf8, true));
        if self.matched.is_some() {
            fields.push(Field::new("matched", DataType::Utf8, true));
        }
        for name in BOX_VALUE_COLUMNS {
            fields.push(Field::new(name, DataType::Float64, true));
        }
        fields.push(Field::new("advisories", DataType::Utf8, true));
        Arc::new(Schema::new(fields))
    }

    fn finish(&mut self) -> Vec<ArrayRef> {
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(self.line.finish())];
        if let Some(b) = self.input.as_mut() {
            arrays.push(Arc::new(b.finish()));
        }
        arrays.push(Arc::new(self.layout.finish()));
        if let Some(b) = self.matched.as_mut() {
            arrays.push(Arc::new(b.finish()));
        }
        for b in self.values.iter_mut() {
            arrays.push(Arc::new(b.finish()));
        }
        arrays.push(Arc::new(self.advisories.finish()));
        arrays
    }
}

struct PointColumns {
    line: UInt64Builder,
    input: Option<StringBuilder>,
    latitude: Float64Builder,
    longitude: Float64Builder,
    decimals: UInt8Builder,
    matched: StringBuilder,
}

impl PointColumns {
    fn new(show_inputs: bool) -> Self {
        Self {
            line: UInt64Builder::with_capacity(BATCH_SIZE),
            input: show_inputs.then(|| StringBuilder::with_capacity(BATCH_SIZE, BATCH_SIZE * 64)),
            latitude: Float64Builder::with_capacity(BATCH_SIZE),
            longitude: Float64Builder::with_capacity(BATCH_SIZE),
            decimals: UInt8Builder::with_capacity(BATCH_SIZE),
            matched: StringBuilder::with_capacity(BATCH_SIZE, BATCH_SIZE * 24),
        }
    }

    fn append(&mut self, row: &PointRow<'_>) {
        self.line.append_value(row.line as u64);
        if let Some(b) = self.input.as_mut() {
            b.append_option(row.input);
        }
        self.latitude.append_value(row.point.latitude);
        self.longitude.append_value(row.point.longitude);
        self.decimals
            .append_value(u8::try_from(row.point.decimals).unwrap_or(u8::MAX));
        self.matched.append_value(&row.point.text);
    }
}

impl ColumnSet for PointColumns {
    fn schema(&self) -> Arc<Schema> {
        let mut fields = vec![Field::new("line", DataType::UInt64, false)];
        if self.input.is_some() {
            fields.push(Field::new("input", DataType::Utf8, false));
        }
        fields.push(Field::new("latitude", DataType::Float64, false));
        fields.push(Field::new("longitude", DataType::Float64, false));
        fields.push(Field::new("decimals", DataType::UInt8, false));
        fields.push(Field::new("matched", DataType::Utf8, false));
        Arc::new(Schema::new(fields))
    }

    fn finish(&mut self) -> Vec<ArrayRef> {
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(self.line.finish())];
        if let Some(b) = self.input.as_mut() {
            arrays.push(Arc::new(b.finish()));
        }
        arrays.push(Arc::new(self.latitude.finish()));
        arrays.push(Arc::new(self.longitude.finish()));
        arrays.push(Arc::new(self.decimals.finish()));
        arrays.push(Arc::new(self.matched.finish()));
        arrays
    }
}
