//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `plans.parquet`
//! - `stage_timings.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::PlanWriter;
use crate::{OutputResult, PlanRow, StageTimingRow};

fn plan_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("personId",         DataType::UInt64,  false),
        Field::new("planElement",      DataType::Utf8,    false),
        Field::new("planElementIndex", DataType::UInt32,  false),
        Field::new("activityType",     DataType::Utf8,    true),
        Field::new("x",                DataType::Float64, true),
        Field::new("y",                DataType::Float64, true),
        Field::new("endTime",          DataType::Float64, true),
    ]))
}

fn timing_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("stage_index", DataType::UInt32,  false),
        Field::new("stage",       DataType::Utf8,    false),
        Field::new("elapsed_ms",  DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes plans and stage timings to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    plans:         Option<ArrowWriter<File>>,
    timings:       Option<ArrowWriter<File>>,
    plan_schema:   Arc<Schema>,
    timing_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let plan_schema = plan_schema();
        let timing_schema = timing_schema();

        let plans = ArrowWriter::try_new(
            File::create(dir.join("plans.parquet"))?,
            Arc::clone(&plan_schema),
            Some(snappy_props()),
        )?;
        let timings = ArrowWriter::try_new(
            File::create(dir.join("stage_timings.parquet"))?,
            Arc::clone(&timing_schema),
            Some(snappy_props()),
        )?;

        Ok(Self { plans: Some(plans), timings: Some(timings), plan_schema, timing_schema })
    }
}

impl PlanWriter for ParquetWriter {
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.plans.as_mut() else {
            return Ok(());
        };

        let mut person_ids = UInt64Builder::new();
        let mut elements   = StringBuilder::new();
        let mut indices    = UInt32Builder::new();
        let mut activities = StringBuilder::new();
        let mut xs         = Float64Builder::new();
        let mut ys         = Float64Builder::new();
        let mut end_times  = Float64Builder::new();

        for row in rows {
            person_ids.append_value(row.person_id.0);
            elements.append_value(row.element);
            indices.append_value(row.index);
            activities.append_option(row.activity_type.map(|a| a.as_str()));
            xs.append_option(row.x);
            ys.append_option(row.y);
            end_times.append_option(row.end_time);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.plan_schema),
            vec![
                Arc::new(person_ids.finish()),
                Arc::new(elements.finish()),
                Arc::new(indices.finish()),
                Arc::new(activities.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
                Arc::new(end_times.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_stage_timing(&mut self, row: &StageTimingRow) -> OutputResult<()> {
        let Some(writer) = self.timings.as_mut() else {
            return Ok(());
        };

        let mut indices = UInt32Builder::new();
        let mut stages  = StringBuilder::new();
        let mut elapsed = Float64Builder::new();

        indices.append_value(row.stage_index);
        stages.append_value(&row.stage);
        elapsed.append_value(row.elapsed_ms);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.timing_schema),
            vec![
                Arc::new(indices.finish()),
                Arc::new(stages.finish()),
                Arc::new(elapsed.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.plans.take() {
            w.close()?;
        }
        if let Some(w) = self.timings.take() {
            w.close()?;
        }
        Ok(())
    }
}
