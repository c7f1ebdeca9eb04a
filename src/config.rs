// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// Run configuration. Every key is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local path or `http(s)://` URL of the report.
    pub source: String,
    pub output_dir: PathBuf,
    /// Default `tracing` filter; `RUST_LOG` wins when set.
    pub log_filter: String,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub json: bool,
    pub parquet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "insertion_master.txt".into(),
            output_dir: PathBuf::from("out"),
            log_filter: "info".into(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Read a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
