//! Task model: one-shot todos and pass/fail habits.
//!
//! A task is `pending` until completed, and completion is terminal. Tasks
//! only compute rewards; applying them to a survivor is the session's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// XP granted for a successful habit.
pub const HABIT_REWARD: i64 = 5;
/// Health lost when a habit is failed.
pub const HABIT_PENALTY: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn reward(self) -> i64 {
        match self {
            Priority::Low => 3,
            Priority::Medium => 5,
            Priority::High => 7,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Ok(Priority::Low),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "high" | "h" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Todo,
    Habit,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Todo => f.write_str("todo"),
            TaskKind::Habit => f.write_str("habit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitOutcome {
    Success,
    Failure,
}

/// What completing a task is worth. Exactly one per completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Experience(i64),
    HealthPenalty(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Granted(Reward),
    /// The task was already done; nothing changed.
    AlreadyCompleted,
}

/// Kind-specific fields. Serialized flat next to the shared ones, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TaskDetails {
    Todo {
        #[serde(default)]
        priority: Priority,
    },
    Habit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_outcome: Option<HabitOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    details: TaskDetails,
}

impl Task {
    /// Build a pending task. `priority` is only meaningful for todos and
    /// defaults to low.
    pub fn new(
        kind: TaskKind,
        title: &str,
        description: &str,
        priority: Option<Priority>,
    ) -> Result<Self, ValidationError> {
        let details = match kind {
            TaskKind::Todo => TaskDetails::Todo {
                priority: priority.unwrap_or_default(),
            },
            TaskKind::Habit => TaskDetails::Habit { last_outcome: None },
        };
        Ok(Self {
            title: validated_title(title)?,
            description: description.trim().to_string(),
            completed: false,
            completed_at: None,
            details,
        })
    }

    pub fn todo(title: &str, description: &str, priority: Priority) -> Result<Self, ValidationError> {
        Self::new(TaskKind::Todo, title, description, Some(priority))
    }

    pub fn habit(title: &str, description: &str) -> Result<Self, ValidationError> {
        Self::new(TaskKind::Habit, title, description, None)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn kind(&self) -> TaskKind {
        match self.details {
            TaskDetails::Todo { .. } => TaskKind::Todo,
            TaskDetails::Habit { .. } => TaskKind::Habit,
        }
    }

    /// Todo priority; `None` for habits.
    pub fn priority(&self) -> Option<Priority> {
        match self.details {
            TaskDetails::Todo { priority } => Some(priority),
            TaskDetails::Habit { .. } => None,
        }
    }

    /// Outcome recorded by the last habit completion; `None` for todos.
    pub fn last_outcome(&self) -> Option<HabitOutcome> {
        match self.details {
            TaskDetails::Habit { last_outcome } => last_outcome,
            TaskDetails::Todo { .. } => None,
        }
    }

    /// Mark the task done and report its reward.
    ///
    /// `success` is only consulted for habits: a failed habit still completes,
    /// but yields a health penalty instead of experience.
    pub fn complete(&mut self, success: bool) -> Completion {
        if self.completed {
            return Completion::AlreadyCompleted;
        }
        self.completed = true;
        self.completed_at = Some(Utc::now());

        let reward = match &mut self.details {
            TaskDetails::Todo { priority } => Reward::Experience(priority.reward()),
            TaskDetails::Habit { last_outcome } => {
                if success {
                    *last_outcome = Some(HabitOutcome::Success);
                    Reward::Experience(HABIT_REWARD)
                } else {
                    *last_outcome = Some(HabitOutcome::Failure);
                    Reward::HealthPenalty(HABIT_PENALTY)
                }
            }
        };
        Completion::Granted(reward)
    }

    /// Replace the title, plus the description and todo priority when given.
    ///
    /// Completion state is left alone. On an empty title nothing is changed.
    pub fn edit(
        &mut self,
        title: &str,
        description: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<(), ValidationError> {
        let title = validated_title(title)?;
        self.title = title;
        if let Some(description) = description {
            self.description = description.trim().to_string();
        }
        if let (TaskDetails::Todo { priority: current }, Some(p)) = (&mut self.details, priority) {
            *current = p;
        }
        Ok(())
    }

    /// Checks invariants that deserialization alone can't enforce.
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        validated_title(&self.title).map(|_| ())
    }
}

fn validated_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::InvalidTitle);
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_reward_follows_priority() {
        for (p, xp) in [(Priority::Low, 3), (Priority::Medium, 5), (Priority::High, 7)] {
            let mut t = Task::todo("Scavenge", "", p).unwrap();
            assert_eq!(t.complete(true), Completion::Granted(Reward::Experience(xp)));
            assert!(t.is_completed());
            assert!(t.completed_at().is_some());
        }
    }

    #[test]
    fn todo_ignores_success_flag() {
        let mut t = Task::todo("Scavenge", "", Priority::Medium).unwrap();
        assert_eq!(t.complete(false), Completion::Granted(Reward::Experience(5)));
    }

    #[test]
    fn habit_success_and_failure() {
        let mut ok = Task::habit("Patrol", "walk the fence").unwrap();
        assert_eq!(ok.complete(true), Completion::Granted(Reward::Experience(5)));
        assert_eq!(ok.last_outcome(), Some(HabitOutcome::Success));

        let mut bad = Task::habit("Patrol", "").unwrap();
        assert_eq!(bad.complete(false), Completion::Granted(Reward::HealthPenalty(5)));
        assert!(bad.is_completed());
        assert_eq!(bad.last_outcome(), Some(HabitOutcome::Failure));
    }

    #[test]
    fn completion_is_terminal() {
        let mut t = Task::habit("Patrol", "").unwrap();
        t.complete(true);
        let stamp = t.completed_at();
        assert_eq!(t.complete(false), Completion::AlreadyCompleted);
        assert_eq!(t.last_outcome(), Some(HabitOutcome::Success));
        assert_eq!(t.completed_at(), stamp);
    }

    #[test]
    fn empty_title_rejected_on_create_and_edit() {
        assert_eq!(Task::habit("  ", "").unwrap_err(), ValidationError::InvalidTitle);

        let mut t = Task::todo("Scavenge", "old", Priority::Low).unwrap();
        assert!(t.edit("", Some("new"), Some(Priority::High)).is_err());
        assert_eq!(t.title(), "Scavenge");
        assert_eq!(t.description(), "old");
        assert_eq!(t.priority(), Some(Priority::Low));
    }

    #[test]
    fn edit_keeps_completion() {
        let mut t = Task::todo("Scavenge", "", Priority::Low).unwrap();
        t.complete(true);
        t.edit("Scavenge mall", Some("east wing"), Some(Priority::High)).unwrap();
        assert!(t.is_completed());
        assert_eq!(t.title(), "Scavenge mall");
        assert_eq!(t.priority(), Some(Priority::High));
    }

    #[test]
    fn habit_edit_ignores_priority() {
        let mut t = Task::habit("Patrol", "").unwrap();
        t.edit("Night patrol", None, Some(Priority::High)).unwrap();
        assert_eq!(t.priority(), None);
        assert_eq!(t.kind(), TaskKind::Habit);
    }

    #[test]
    fn edit_without_description_keeps_it() {
        let mut t = Task::todo("Scavenge", "north gate", Priority::Medium).unwrap();
        t.edit("Scavenge mall", None, None).unwrap();
        assert_eq!(t.description(), "north gate");
        assert_eq!(t.priority(), Some(Priority::Medium));

        t.edit("Scavenge mall", Some(""), None).unwrap();
        assert_eq!(t.description(), "");
    }

    #[test]
    fn priority_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(
            "urgent".parse::<Priority>().unwrap_err(),
            ValidationError::InvalidPriority("urgent".to_string())
        );
    }

    #[test]
    fn serializes_flat_with_kind_tag() {
        let t = Task::todo("Scavenge", "", Priority::High).unwrap();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["kind"], "todo");
        assert_eq!(v["priority"], "high");
        assert_eq!(v["completed"], false);

        let h = Task::habit("Patrol", "").unwrap();
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["kind"], "habit");
        assert!(v.get("priority").is_none());
    }
}
