//! Plain-text views of session snapshots.

use holdout_core::{
    CompletionOutcome, CompletionStatus, HabitOutcome, Item, ItemKind, MAX_HEALTH, Survivor, Task,
};

pub fn stats(s: &Survivor) -> String {
    format!(
        "Name: {}\nLevel: {}\nXP: {}/{}\nHealth: {}/{}\nHunger: {}%\nThirst: {}%\nInfection: {}%",
        s.name(),
        s.level(),
        s.xp(),
        s.calculate_xp_needed(),
        s.health(),
        MAX_HEALTH,
        s.hunger(),
        s.thirst(),
        s.infection(),
    )
}

/// One line per task, numbered from 1.
pub fn tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.".to_string();
    }
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, task_line(t)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn task_line(t: &Task) -> String {
    let mark = if t.is_completed() { "x" } else { " " };
    let mut line = format!("[{mark}] {} ({}", t.title(), t.kind());
    if let Some(p) = t.priority() {
        line.push_str(&format!(", {p}"));
    }
    match t.last_outcome() {
        Some(HabitOutcome::Success) => line.push_str(", succeeded"),
        Some(HabitOutcome::Failure) => line.push_str(", failed"),
        None => {}
    }
    line.push(')');
    if let Some(at) = t.completed_at() {
        line.push_str(&format!(" done {}", at.format("%Y-%m-%d %H:%M")));
    }
    if !t.description().is_empty() {
        line.push_str(&format!(" - {}", t.description()));
    }
    line
}

pub fn market(items: &[Item]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{}. {} - Cost: {} XP ({})",
                i + 1,
                item.name(),
                item.cost(),
                effect(item)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn effect(item: &Item) -> String {
    match item.kind() {
        ItemKind::Food => format!("+{} hunger", item.effect_value()),
        ItemKind::Water => format!("+{} thirst", item.effect_value()),
        ItemKind::Medicine => format!("-{} infection", item.effect_value()),
    }
}

pub fn completion(out: &CompletionOutcome) -> String {
    let mut msg = match out.status {
        CompletionStatus::Completed => format!("Gained {} XP!", out.amount),
        CompletionStatus::Failed => format!("Lost {} health points!", out.amount.abs()),
        CompletionStatus::AlreadyCompleted => "Task already completed.".to_string(),
    };
    if out.leveled_up {
        msg.push_str("\nLevel Up!");
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdout_core::{Priority, market_catalog};

    #[test]
    fn lists_tasks_with_numbers() {
        let mut habit = Task::habit("Patrol", "fence line").unwrap();
        habit.complete(false);
        let list = tasks(&[Task::todo("Scavenge", "", Priority::High).unwrap(), habit]);

        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines[0], "1. [ ] Scavenge (todo, high)");
        assert!(lines[1].starts_with("2. [x] Patrol (habit, failed) done "));
        assert!(lines[1].ends_with(" - fence line"));
    }

    #[test]
    fn empty_list_message() {
        assert_eq!(tasks(&[]), "No tasks yet.");
    }

    #[test]
    fn market_shows_costs() {
        let text = market(&market_catalog());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1. Food Ration - Cost: 10 XP (+20 hunger)");
        assert_eq!(lines[1], "2. Water Bottle - Cost: 8 XP (+15 thirst)");
        assert_eq!(lines[2], "3. Medkit - Cost: 15 XP (-25 infection)");
    }

    #[test]
    fn completion_messages() {
        let out = CompletionOutcome {
            status: CompletionStatus::Failed,
            amount: -5,
            leveled_up: false,
        };
        assert_eq!(completion(&out), "Lost 5 health points!");

        let out = CompletionOutcome {
            status: CompletionStatus::Completed,
            amount: 7,
            leveled_up: true,
        };
        assert_eq!(completion(&out), "Gained 7 XP!\nLevel Up!");
    }

    #[test]
    fn stats_show_threshold() {
        let s = Survivor::new("Ash").unwrap();
        assert!(stats(&s).contains("XP: 0/50"));
        assert!(stats(&s).contains("Health: 30/30"));
    }
}
