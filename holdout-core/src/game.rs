//! A session bound to its save file.

use crate::error::PersistenceError;
use crate::session::Session;
use crate::store::SaveStore;

#[derive(Debug, Clone)]
pub struct Game {
    store: SaveStore,
    session: Session,
}

impl Game {
    pub fn new(store: SaveStore, session: Session) -> Self {
        Self { store, session }
    }

    /// Pick up where the last run left off, if anything was saved.
    pub fn resume(store: SaveStore) -> Option<Self> {
        let session = store.load()?;
        Some(Self { store, session })
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        self.store.save(&self.session)
    }

    /// Replace the in-memory session with what's on disk.
    ///
    /// Returns false (and keeps the current session) when nothing is saved.
    pub fn load(&mut self) -> bool {
        match self.store.load() {
            Some(session) => {
                self.session = session;
                true
            }
            None => false,
        }
    }
}
