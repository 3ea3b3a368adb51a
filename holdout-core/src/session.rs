//! Game session: one survivor plus their ordered task list.
//!
//! All mutation goes through the commands here. Callers get read-only views
//! (`character()`, `tasks()`) and never touch fields directly.

use crate::error::{PurchaseError, SessionError, ValidationError};
use crate::item::{Item, ItemKind};
use crate::stats::Survivor;
use crate::task::{Completion, Priority, Reward, Task, TaskKind};

/// Hunger and thirst lost after every completion.
pub const NEED_DECAY: i64 = 1;
/// Infection gained when a habit is failed.
pub const FAILURE_INFECTION: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// XP was granted.
    Completed,
    /// A habit was failed; health was lost instead.
    Failed,
    AlreadyCompleted,
}

/// Result of `complete_task`, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub status: CompletionStatus,
    /// XP gained (positive), health lost (negative), or 0.
    pub amount: i64,
    pub leveled_up: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    survivor: Survivor,
    tasks: Vec<Task>,
}

impl Session {
    /// First-run session: a new survivor with no tasks.
    pub fn create_character(name: &str) -> Result<Self, ValidationError> {
        Ok(Self::from_parts(Survivor::new(name)?, Vec::new()))
    }

    pub fn from_parts(survivor: Survivor, tasks: Vec<Task>) -> Self {
        Self { survivor, tasks }
    }

    pub fn character(&self) -> &Survivor {
        &self.survivor
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn is_alive(&self) -> bool {
        self.survivor.is_alive()
    }

    /// Append a task; returns its index.
    pub fn create_task(
        &mut self,
        kind: TaskKind,
        title: &str,
        description: &str,
        priority: Option<Priority>,
    ) -> Result<usize, ValidationError> {
        let task = Task::new(kind, title, description, priority)?;
        tracing::debug!(kind = %kind, title = task.title(), "task created");
        self.tasks.push(task);
        Ok(self.tasks.len() - 1)
    }

    /// Complete the task at `index` and apply its reward to the survivor.
    ///
    /// `success` only matters for habits and defaults to true. Level-up is
    /// checked once per completion, even if the new XP clears more than one
    /// threshold.
    pub fn complete_task(
        &mut self,
        index: usize,
        success: Option<bool>,
    ) -> Result<CompletionOutcome, SessionError> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;

        let reward = match task.complete(success.unwrap_or(true)) {
            Completion::AlreadyCompleted => {
                tracing::debug!(index, "task already completed");
                return Ok(CompletionOutcome {
                    status: CompletionStatus::AlreadyCompleted,
                    amount: 0,
                    leveled_up: false,
                });
            }
            Completion::Granted(reward) => reward,
        };
        let title = task.title().to_string();

        let outcome = match reward {
            Reward::Experience(xp) => {
                self.survivor.add_xp(xp);
                let leveled_up = self.survivor.xp() >= self.survivor.calculate_xp_needed()
                    && self.survivor.level_up();
                if leveled_up {
                    tracing::info!(level = self.survivor.level(), "survivor leveled up");
                }
                CompletionOutcome {
                    status: CompletionStatus::Completed,
                    amount: xp,
                    leveled_up,
                }
            }
            Reward::HealthPenalty(hp) => {
                self.survivor.add_health(-hp);
                self.survivor.add_infection(FAILURE_INFECTION);
                CompletionOutcome {
                    status: CompletionStatus::Failed,
                    amount: -hp,
                    leveled_up: false,
                }
            }
        };

        self.survivor.add_hunger(-NEED_DECAY);
        self.survivor.add_thirst(-NEED_DECAY);

        tracing::info!(index, title = %title, amount = outcome.amount, "task completed");
        if !self.survivor.is_alive() {
            tracing::warn!(name = self.survivor.name(), "survivor has died");
        }
        Ok(outcome)
    }

    /// Remove and return the task at `index`. The rest keep their order.
    pub fn delete_task(&mut self, index: usize) -> Result<Task, SessionError> {
        let len = self.tasks.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        let task = self.tasks.remove(index);
        tracing::debug!(index, title = task.title(), "task deleted");
        Ok(task)
    }

    pub fn edit_task(
        &mut self,
        index: usize,
        title: &str,
        description: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<(), SessionError> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        task.edit(title, description, priority)?;
        Ok(())
    }

    /// Buy the market's stock item of `kind`.
    pub fn purchase_item(&mut self, kind: ItemKind) -> Result<Item, PurchaseError> {
        let item = Item::standard(kind);
        self.purchase(&item)?;
        Ok(item)
    }

    /// Pay for `item` in XP and use it.
    ///
    /// Refused when the survivor can't afford it or when it would be wasted
    /// (stat already near its limit). A refused purchase changes nothing.
    pub fn purchase(&mut self, item: &Item) -> Result<(), PurchaseError> {
        if self.survivor.xp() < item.cost() {
            return Err(PurchaseError::InsufficientFunds {
                have: self.survivor.xp(),
                need: item.cost(),
            });
        }
        if item.would_waste(&self.survivor) {
            return Err(PurchaseError::NoEffect {
                item: item.name().to_string(),
            });
        }
        self.survivor.add_xp(-item.cost());
        item.use_on(&mut self.survivor);
        tracing::info!(item = item.name(), cost = item.cost(), "item purchased");
        Ok(())
    }

    pub fn rename_character(&mut self, name: &str) -> Result<(), ValidationError> {
        self.survivor.set_name(name)
    }

    /// Start over: default stats under `new_name`, and no tasks.
    pub fn reset_character(&mut self, new_name: &str) -> Result<(), ValidationError> {
        self.survivor = Survivor::new(new_name)?;
        self.tasks.clear();
        tracing::info!(name = self.survivor.name(), "session reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::create_character("Ash").unwrap()
    }

    #[test]
    fn todo_completion_grants_xp_and_decays_needs() {
        let mut s = session();
        let i = s.create_task(TaskKind::Todo, "Scavenge", "", Some(Priority::High)).unwrap();
        let out = s.complete_task(i, None).unwrap();

        assert_eq!(out.status, CompletionStatus::Completed);
        assert_eq!(out.amount, 7);
        assert!(!out.leveled_up);
        let c = s.character();
        assert_eq!(c.xp(), 7);
        assert_eq!((c.hunger(), c.thirst(), c.infection()), (99, 99, 0));
    }

    #[test]
    fn habit_failure_costs_health_not_xp() {
        let mut s = session();
        let i = s.create_task(TaskKind::Habit, "Patrol", "", None).unwrap();
        let out = s.complete_task(i, Some(false)).unwrap();

        assert_eq!(out.status, CompletionStatus::Failed);
        assert_eq!(out.amount, -5);
        let c = s.character();
        assert_eq!(c.xp(), 0);
        assert_eq!(c.health(), 25);
        assert_eq!(c.infection(), 1);
        assert_eq!((c.hunger(), c.thirst()), (99, 99));
    }

    #[test]
    fn already_completed_changes_nothing() {
        let mut s = session();
        let i = s.create_task(TaskKind::Todo, "Scavenge", "", None).unwrap();
        s.complete_task(i, None).unwrap();
        let before = s.character().clone();

        let out = s.complete_task(i, None).unwrap();
        assert_eq!(out.status, CompletionStatus::AlreadyCompleted);
        assert_eq!(out.amount, 0);
        assert_eq!(s.character(), &before);
    }

    #[test]
    fn completed_habit_cannot_be_failed_afterwards() {
        let mut s = session();
        let i = s.create_task(TaskKind::Habit, "Patrol", "", None).unwrap();
        s.complete_task(i, Some(true)).unwrap();
        let before = s.character().clone();

        for success in [Some(false), Some(true), None] {
            let out = s.complete_task(i, success).unwrap();
            assert_eq!(out.status, CompletionStatus::AlreadyCompleted);
            assert_eq!(out.amount, 0);
            assert_eq!(s.character(), &before);
        }
        assert_eq!(s.tasks()[i].last_outcome(), Some(crate::task::HabitOutcome::Success));
    }

    #[test]
    fn edit_without_description_keeps_it() {
        let mut s = session();
        s.create_task(TaskKind::Todo, "Scavenge", "north gate", None).unwrap();
        s.edit_task(0, "Scavenge mall", None, Some(Priority::High)).unwrap();
        assert_eq!(s.tasks()[0].description(), "north gate");
        assert_eq!(s.tasks()[0].priority(), Some(Priority::High));
    }

    #[test]
    fn levels_up_once_per_completion() {
        let mut s = Session::from_parts(Survivor::restore("Ash", 1, 118, 12, 50, 50, 0).unwrap(), vec![]);
        let i = s.create_task(TaskKind::Todo, "Scavenge", "", Some(Priority::High)).unwrap();
        let out = s.complete_task(i, None).unwrap();

        // 125 XP clears both the level 1 and level 2 thresholds; only one level is gained.
        assert!(out.leveled_up);
        assert_eq!(s.character().level(), 2);
        assert_eq!(s.character().xp(), 125);
        assert_eq!(s.character().health(), 30);
    }

    #[test]
    fn index_errors() {
        let mut s = session();
        s.create_task(TaskKind::Todo, "A", "", None).unwrap();
        s.create_task(TaskKind::Todo, "B", "", None).unwrap();

        assert_eq!(
            s.delete_task(2).unwrap_err(),
            SessionError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert!(s.complete_task(5, None).is_err());
        assert!(s.edit_task(9, "x", None, None).is_err());
        let titles: Vec<_> = s.tasks().iter().map(Task::title).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn delete_preserves_order() {
        let mut s = session();
        for t in ["A", "B", "C"] {
            s.create_task(TaskKind::Habit, t, "", None).unwrap();
        }
        assert_eq!(s.delete_task(1).unwrap().title(), "B");
        let titles: Vec<_> = s.tasks().iter().map(Task::title).collect();
        assert_eq!(titles, ["A", "C"]);
    }

    #[test]
    fn edit_rejects_empty_title() {
        let mut s = session();
        s.create_task(TaskKind::Todo, "Scavenge", "", None).unwrap();
        assert_eq!(
            s.edit_task(0, " ", Some(""), None).unwrap_err(),
            SessionError::Validation(ValidationError::InvalidTitle)
        );
        assert_eq!(s.tasks()[0].title(), "Scavenge");
    }

    #[test]
    fn purchase_requires_funds() {
        let mut s = session();
        let err = s.purchase_item(ItemKind::Water).unwrap_err();
        assert_eq!(err, PurchaseError::InsufficientFunds { have: 0, need: 8 });
    }

    #[test]
    fn purchase_refuses_wasted_medicine() {
        let mut s = Session::from_parts(Survivor::restore("Ash", 1, 40, 30, 100, 100, 10).unwrap(), vec![]);
        let medkit = Item::new(ItemKind::Medicine, "Medkit", 15, 25).unwrap();
        assert!(matches!(s.purchase(&medkit), Err(PurchaseError::NoEffect { .. })));
        assert_eq!(s.character().xp(), 40);
        assert_eq!(s.character().infection(), 10);
    }

    #[test]
    fn purchase_charges_then_applies() {
        let mut s = Session::from_parts(Survivor::restore("Ash", 1, 40, 30, 60, 100, 0).unwrap(), vec![]);
        let item = s.purchase_item(ItemKind::Food).unwrap();
        assert_eq!(item.name(), "Food Ration");
        assert_eq!(s.character().xp(), 30);
        assert_eq!(s.character().hunger(), 80);
    }

    #[test]
    fn reset_restores_defaults_and_clears_tasks() {
        let mut s = Session::from_parts(Survivor::restore("Ash", 4, 90, 3, 10, 10, 70).unwrap(), vec![]);
        s.create_task(TaskKind::Todo, "Scavenge", "", None).unwrap();

        assert!(s.reset_character("").is_err());
        assert_eq!(s.tasks().len(), 1);

        s.reset_character("Bea").unwrap();
        assert_eq!(s.character(), &Survivor::new("Bea").unwrap());
        assert!(s.tasks().is_empty());
    }

    #[test]
    fn health_zero_means_game_over() {
        let mut s = Session::from_parts(Survivor::restore("Ash", 1, 0, 5, 100, 100, 0).unwrap(), vec![]);
        assert!(s.is_alive());
        s.create_task(TaskKind::Habit, "Patrol", "", None).unwrap();
        s.complete_task(0, Some(false)).unwrap();
        assert_eq!(s.character().health(), 0);
        assert!(!s.is_alive());
    }

    #[test]
    fn rename_keeps_stats() {
        let mut s = Session::from_parts(Survivor::restore("Ash", 3, 15, 20, 80, 90, 5).unwrap(), vec![]);
        s.rename_character("  Bea ").unwrap();
        assert_eq!(s.character().name(), "Bea");
        assert_eq!(s.character().level(), 3);
    }
}
