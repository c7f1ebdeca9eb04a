// src/export/parquet.rs
use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt16Array, UInt32Array, UInt64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{path::Path, sync::Arc};

use super::write_atomic;
use crate::report::{InsertionRecord, Rate};

/// Arrow schema of an exported record; unavailable rates become nulls.
pub fn record_schema() -> Schema {
    Schema::new(vec![
        Field::new("line_number", DataType::UInt64, false),
        Field::new("year", DataType::UInt16, false),
        Field::new("institution", DataType::Utf8, false),
        Field::new("academy", DataType::Utf8, false),
        Field::new("domain", DataType::Utf8, false),
        Field::new("discipline", DataType::Utf8, false),
        Field::new("situation_label", DataType::Utf8, false),
        Field::new("horizon_months", DataType::UInt32, true),
        Field::new("response_rate", DataType::Float64, true),
        Field::new("insertion_rate", DataType::Float64, true),
        Field::new("respondents", DataType::UInt32, true),
        Field::new("female_respondents", DataType::UInt32, false),
        Field::new("male_respondents", DataType::Int64, false),
        Field::new("stable_employment", DataType::UInt32, false),
        Field::new("full_time_employment", DataType::UInt32, false),
        Field::new("executive_employment", DataType::UInt32, false),
        Field::new("female_insertion_rate", DataType::Float64, true),
        Field::new("male_insertion_rate", DataType::Float64, true),
    ])
}

fn strings<'a>(records: &'a [InsertionRecord], f: impl Fn(&'a InsertionRecord) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
}

fn counts(records: &[InsertionRecord], f: impl Fn(&InsertionRecord) -> u32) -> ArrayRef {
    Arc::new(UInt32Array::from(records.iter().map(f).collect::<Vec<_>>()))
}

fn rates(records: &[InsertionRecord], f: impl Fn(&InsertionRecord) -> Rate) -> ArrayRef {
    Arc::new(Float64Array::from(
        records.iter().map(|r| f(r).value()).collect::<Vec<_>>(),
    ))
}

/// Build one batch holding every record, columns in [`record_schema`] order.
pub fn to_record_batch(records: &[InsertionRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(
            records.iter().map(|r| r.line_number as u64).collect::<Vec<_>>(),
        )),
        Arc::new(UInt16Array::from(records.iter().map(|r| r.year).collect::<Vec<_>>())),
        strings(records, |r| r.institution.as_str()),
        strings(records, |r| r.academy.as_str()),
        strings(records, |r| r.domain.as_str()),
        strings(records, |r| r.discipline.as_str()),
        strings(records, |r| r.situation_label.as_str()),
        Arc::new(UInt32Array::from(
            records.iter().map(|r| r.horizon_months).collect::<Vec<_>>(),
        )),
        rates(records, |r| r.response_rate),
        rates(records, |r| r.insertion_rate),
        Arc::new(UInt32Array::from(
            records.iter().map(|r| r.respondents).collect::<Vec<_>>(),
        )),
        counts(records, |r| r.female_respondents),
        Arc::new(Int64Array::from(
            records.iter().map(|r| r.male_respondents).collect::<Vec<_>>(),
        )),
        counts(records, |r| r.stable_employment),
        counts(records, |r| r.full_time_employment),
        counts(records, |r| r.executive_employment),
        rates(records, |r| r.female_insertion_rate),
        rates(records, |r| r.male_insertion_rate),
    ];
    RecordBatch::try_new(Arc::new(record_schema()), columns).context("building record batch")
}

/// Write `records` to a Snappy-compressed Parquet file.
/// Written to a temp file next to `path`, then renamed over it.
pub fn write_parquet<P: AsRef<Path>>(records: &[InsertionRecord], path: P) -> Result<()> {
    let batch = to_record_batch(records)?;
    write_atomic(path.as_ref(), |file| {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
            .context("creating Arrow writer for records")?;
        writer.write(&batch).context("writing record batch")?;
        writer.close().context("closing Parquet writer")?;
        Ok(())
    })
}
