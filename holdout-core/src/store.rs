//! File-backed persistence for a session.
//!
//! Save file layout (JSON):
//!
//! ```text
//! { "version": 1, "saved_at": "...",
//!   "character": { "name", "level", "xp", "health", "hunger", "thirst", "infection" },
//!   "tasks": [ { "title", "description", "completed", "completed_at"?,
//!                "kind": "todo" | "habit", "priority"? , "last_outcome"? } ] }
//! ```
//!
//! Saving moves the current file aside to `<file>.bak`, writes the new file,
//! and drops the backup only once the write succeeded. Loading never fails:
//! a corrupt primary falls back to the backup, and if neither parses the
//! caller simply gets no saved state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, ValidationError};
use crate::session::Session;
use crate::stats::Survivor;
use crate::task::Task;

pub const SAVE_FORMAT_VERSION: u32 = 1;

const BACKUP_SUFFIX: &str = "bak";

fn current_version() -> u32 {
    SAVE_FORMAT_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    #[serde(default = "current_version")]
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    character: CharacterRecord,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CharacterRecord {
    name: String,
    level: i64,
    xp: i64,
    health: i64,
    hunger: i64,
    thirst: i64,
    infection: i64,
}

impl From<&Survivor> for CharacterRecord {
    fn from(s: &Survivor) -> Self {
        Self {
            name: s.name().to_string(),
            level: s.level(),
            xp: s.xp(),
            health: s.health(),
            hunger: s.hunger(),
            thirst: s.thirst(),
            infection: s.infection(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CorruptSave {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {0}")]
    Version(u32),

    #[error("invalid contents: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<file>.bak` next to the save file.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Write `session` to disk. On failure the previous file is put back.
    pub fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        self.save_with(session, write_synced)
    }

    fn save_with(
        &self,
        session: &Session,
        write: impl FnOnce(&Path, &[u8]) -> io::Result<()>,
    ) -> Result<(), PersistenceError> {
        let file = SaveFile {
            version: SAVE_FORMAT_VERSION,
            saved_at: Some(Utc::now()),
            character: CharacterRecord::from(session.character()),
            tasks: session.tasks().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }

        let backup = self.backup_path();
        self.set_aside_primary(&backup)?;
        let backed_up = backup.exists();

        if let Err(e) = write(&self.path, json.as_bytes()) {
            self.rollback(backed_up);
            return Err(PersistenceError::io(&self.path, e));
        }

        if backed_up {
            if let Err(e) = fs::remove_file(&backup) {
                tracing::warn!("could not remove backup {}: {}", backup.display(), e);
            }
        }
        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Clear the primary path before a write, keeping the best copy in `.bak`.
    ///
    /// A readable primary replaces the backup. An unreadable primary is
    /// dropped when a backup exists, since that backup is the last good state
    /// (left by an interrupted save).
    fn set_aside_primary(&self, backup: &Path) -> Result<(), PersistenceError> {
        if !self.path.exists() {
            return Ok(());
        }
        if backup.exists() && read_session(&self.path).is_err() {
            tracing::warn!(
                "Dropping unreadable {} in favour of {}",
                self.path.display(),
                backup.display()
            );
            return fs::remove_file(&self.path).map_err(|e| PersistenceError::io(&self.path, e));
        }
        fs::rename(&self.path, backup).map_err(|e| PersistenceError::io(&self.path, e))
    }

    /// Restore the last saved session.
    ///
    /// `None` means there is no usable saved state; the caller should start a
    /// fresh character.
    pub fn load(&self) -> Option<Session> {
        let backup = self.backup_path();

        if !self.path.exists() {
            // A backup without a primary means a save was interrupted.
            if backup.exists() {
                return self.load_backup(&backup);
            }
            tracing::debug!("No save file at {}", self.path.display());
            return None;
        }

        match read_session(&self.path) {
            Ok(session) => {
                tracing::debug!("Loaded session from {}", self.path.display());
                Some(session)
            }
            Err(e) => {
                tracing::warn!("Save file {} is unreadable: {}", self.path.display(), e);
                if backup.exists() {
                    self.load_backup(&backup)
                } else {
                    None
                }
            }
        }
    }

    fn load_backup(&self, backup: &Path) -> Option<Session> {
        match read_session(backup) {
            Ok(session) => {
                tracing::warn!("Restored session from backup {}", backup.display());
                Some(session)
            }
            Err(e) => {
                tracing::warn!("Backup {} is unreadable too: {}", backup.display(), e);
                None
            }
        }
    }

    fn rollback(&self, backed_up: bool) {
        let restored = match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ if backed_up => fs::rename(self.backup_path(), &self.path),
            _ => Ok(()),
        };
        if let Err(e) = restored {
            tracing::error!("could not restore {}: {}", self.path.display(), e);
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

fn read_session(path: &Path) -> Result<Session, CorruptSave> {
    let text = fs::read_to_string(path)?;
    let file: SaveFile = serde_json::from_str(&text)?;
    if file.version != SAVE_FORMAT_VERSION {
        return Err(CorruptSave::Version(file.version));
    }

    let c = file.character;
    let survivor = Survivor::restore(
        &c.name,
        c.level,
        c.xp,
        c.health,
        c.hunger,
        c.thirst,
        c.infection,
    )?;
    for task in &file.tasks {
        task.validate()?;
    }
    Ok(Session::from_parts(survivor, file.tasks))
}
