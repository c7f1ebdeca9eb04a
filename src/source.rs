// src/source.rs
use anyhow::{Context, Result};
use reqwest::Client;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::report::{extract_records_with_stats, ExtractStats, InsertionRecord};

/// Where the report text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(Url),
}

impl Source {
    /// `http(s)://…` is a URL, anything else a local path.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).with_context(|| format!("parsing source URL {}", s))?;
            Ok(Source::Url(url))
        } else {
            Ok(Source::File(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(p) => write!(f, "{}", p.display()),
            Source::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Fetch the whole report text. Any failure is fatal for the load; there is no retry.
#[instrument(level = "info", skip(client, source), fields(source = %source))]
pub async fn load_text(client: &Client, source: &Source) -> Result<String> {
    let bytes = match source {
        Source::File(path) => fs::read(path)
            .await
            .with_context(|| format!("reading report {}", path.display()))?,
        Source::Url(url) => client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("fetching report {}", url))?
            .bytes()
            .await
            .with_context(|| format!("reading body from {}", url))?
            .to_vec(),
    };
    info!(bytes = bytes.len(), "loaded report");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Load the report and run one extraction pass over it.
pub async fn load_records(
    client: &Client,
    source: &Source,
) -> Result<(Vec<InsertionRecord>, ExtractStats)> {
    let text = load_text(client, source).await?;
    let (records, stats) = extract_records_with_stats(&text);
    info!(
        records = stats.records,
        skipped = stats.skipped(),
        inconsistent_headcount = stats.inconsistent_headcount,
        "parsed report"
    );
    Ok((records, stats))
}
