//! holdout-core: survivor stats, tasks, market items and the save file.

pub mod error;
pub mod game;
pub mod item;
pub mod session;
pub mod stats;
pub mod store;
pub mod task;

pub use error::{PersistenceError, PurchaseError, SessionError, ValidationError};
pub use game::Game;
pub use item::{Item, ItemKind, market_catalog};
pub use session::{CompletionOutcome, CompletionStatus, Session};
pub use stats::{MAX_HEALTH, MAX_NEED, Survivor};
pub use store::SaveStore;
pub use task::{Completion, HabitOutcome, Priority, Reward, Task, TaskKind};
