use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$RASEED_HOME`, or `~/.raseed`.
pub fn raseed_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RASEED_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".raseed"))
}

pub fn ensure_raseed_home() -> Result<PathBuf> {
    let dir = raseed_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Receipts file used when `--receipts` is not given.
pub fn default_receipts_path() -> Result<PathBuf> {
    Ok(raseed_home()?.join("receipts.json"))
}
