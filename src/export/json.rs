// src/export/json.rs
use anyhow::{Context, Result};
use std::{
    io::{BufWriter, Write},
    path::Path,
};

use super::write_atomic;
use crate::report::InsertionRecord;

/// Write `records` as a pretty-printed JSON array.
/// Unavailable rates are written as the report's `"ns"` marker.
///
/// Written to a temp file next to `path`, then renamed over it.
pub fn write_json<P: AsRef<Path>>(records: &[InsertionRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, |file| {
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, records).context("serializing records to JSON")?;
        out.write_all(b"\n")?;
        out.flush()
            .with_context(|| format!("flushing JSON export for {}", path.display()))?;
        Ok(())
    })
}
