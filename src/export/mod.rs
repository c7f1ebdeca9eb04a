// src/export/mod.rs
pub mod json;
pub mod parquet;

pub use self::json::write_json;
pub use self::parquet::{to_record_batch, write_parquet};

use anyhow::{Context, Result};
use chrono::Utc;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::config::ExportConfig;
use crate::report::InsertionRecord;

/// Write through `write` into a hidden temp file next to `path`, then rename it over
/// `path`. On any failure the temp file is removed and `path` is left untouched.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("export path {} has no file name", path.display()))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))
        .and_then(write)
        .and_then(|()| {
            fs::rename(&tmp_path, path).with_context(|| {
                format!("renaming {} -> {}", tmp_path.display(), path.display())
            })
        });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Write every enabled format to `dir` as `insertion_<unix micros>.<ext>`.
/// Returns the written paths.
#[instrument(level = "info", skip(records, dir), fields(dir = %dir.as_ref().display(), records = records.len()))]
pub fn export_all<P: AsRef<Path>>(
    records: &[InsertionRecord],
    dir: P,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::new();
    if !config.json && !config.parquet {
        return Ok(written);
    }

    fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))?;
    let stem = format!("insertion_{}", Utc::now().timestamp_micros());

    if config.json {
        let path = dir.join(format!("{}.json", stem));
        write_json(records, &path)?;
        info!(path = %path.display(), "wrote JSON export");
        written.push(path);
    }
    if config.parquet {
        let path = dir.join(format!("{}.parquet", stem));
        write_parquet(records, &path)?;
        info!(path = %path.display(), "wrote Parquet export");
        written.push(path);
    }
    Ok(written)
}
