use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Environment override for the save file location.
pub const SAVE_FILE_ENV: &str = "HOLDOUT_SAVE_FILE";

pub fn holdout_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".holdout"))
}

pub fn ensure_holdout_home() -> Result<PathBuf> {
    let dir = holdout_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_save_path() -> Result<PathBuf> {
    Ok(holdout_home()?.join("gamestate.json"))
}
