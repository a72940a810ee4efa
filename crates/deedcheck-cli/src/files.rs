//! Reading cases and precedents, writing reviewed output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use deedcheck_core::{PrecedentCase, RawCase, ReviewObject};
use serde::de::DeserializeOwned;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub fn load_case(path: &Path) -> anyhow::Result<RawCase> {
    read_json(path)
}

/// Every `*.json` file in `dir`, sorted by file name.
pub fn load_precedents(dir: &Path) -> anyhow::Result<Vec<(PathBuf, PrecedentCase)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let precedent = read_json(&path)?;
            Ok((path, precedent))
        })
        .collect()
}

/// `review_<stem>_<YYYYmmdd_HHMMSS>.json`
pub fn output_name<Tz: TimeZone>(source: &Path, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("case");
    format!("review_{stem}_{}.json", at.format("%Y%m%d_%H%M%S"))
}

pub fn write_review<Tz: TimeZone>(
    dir: &Path,
    source: &Path,
    review: &ReviewObject,
    at: DateTime<Tz>,
) -> anyhow::Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(output_name(source, &at));
    let json = serde_json::to_string_pretty(review)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote review");
    Ok(path)
}
