use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{SAVE_FILE_ENV, default_save_path, ensure_holdout_home, holdout_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub save: SaveSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveSection {
    /// Save file location. Defaults to ~/.holdout/gamestate.json
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default tracing filter when RUST_LOG is unset.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(holdout_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    ensure_holdout_home()?;
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config {
        save: SaveSection {
            path: Some(default_save_path()?),
        },
        log: LogSection::default(),
    };
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Save file to use: `--save-file`, then $HOLDOUT_SAVE_FILE, then config, then default.
pub fn resolve_save_path(cfg: &Config, flag: Option<PathBuf>) -> Result<PathBuf> {
    let env = std::env::var_os(SAVE_FILE_ENV).map(PathBuf::from);
    match pick_save_path(flag, env, cfg.save.path.clone()) {
        Some(p) => Ok(p),
        None => default_save_path(),
    }
}

fn pick_save_path(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> Option<PathBuf> {
    flag.or(env.filter(|p| !p.as_os_str().is_empty()))
        .or(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_path_precedence() {
        let flag = Some(PathBuf::from("flag.json"));
        let env = Some(PathBuf::from("env.json"));
        let cfg = Some(PathBuf::from("cfg.json"));

        assert_eq!(pick_save_path(flag.clone(), env.clone(), cfg.clone()), flag);
        assert_eq!(pick_save_path(None, env.clone(), cfg.clone()), env);
        assert_eq!(pick_save_path(None, Some(PathBuf::new()), cfg.clone()), cfg);
        assert_eq!(pick_save_path(None, None, None), None);
    }

    #[test]
    fn parses_partial_config() {
        let cfg: Config = toml::from_str("[log]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.save.path, None);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = Config {
            save: SaveSection {
                path: Some(PathBuf::from("/tmp/holdout/gamestate.json")),
            },
            log: LogSection {
                level: "info".to_string(),
            },
        };
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(toml::from_str::<Config>(&s).unwrap(), cfg);
    }
}
