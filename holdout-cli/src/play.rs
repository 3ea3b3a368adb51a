//! Interactive text menu over a `Game`.

use anyhow::Result;
use holdout_core::{Game, ItemKind, Priority, TaskKind, market_catalog};
use std::io::{self, Write};

use crate::render;

pub fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Ask until a non-empty name is given.
pub fn prompt_name(label: &str) -> Result<String> {
    loop {
        let name = prompt(label)?;
        if !name.is_empty() {
            return Ok(name);
        }
        println!("Name cannot be empty!");
    }
}

fn confirm(label: &str) -> Result<bool> {
    Ok(prompt(&format!("{label} (y/n)"))?.eq_ignore_ascii_case("y"))
}

/// Turn a 1-based menu answer into an index below `len`.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

pub fn run(game: &mut Game) -> Result<()> {
    loop {
        println!("\n=== Holdout ===");
        println!("1. View Character Stats");
        println!("2. Create New Task");
        println!("3. View Tasks");
        println!("4. Complete Task");
        println!("5. Visit Marketplace");
        println!("6. Delete Task");
        println!("7. Edit Task");
        println!("8. Settings");
        println!("9. Save and Exit");

        match prompt("Choose an option (1-9)")?.as_str() {
            "1" => println!("\n{}", render::stats(game.session().character())),
            "2" => create_task(game)?,
            "3" => println!("\n{}", render::tasks(game.session().tasks())),
            "4" => complete_task(game)?,
            "5" => marketplace(game)?,
            "6" => delete_task(game)?,
            "7" => edit_task(game)?,
            "8" => settings(game)?,
            "9" => break,
            _ => println!("Invalid option!"),
        }

        if !game.session().is_alive() {
            println!("Game Over! Your character has died.");
            break;
        }
    }

    game.save()?;
    println!("Game saved. Goodbye!");
    Ok(())
}

fn create_task(game: &mut Game) -> Result<()> {
    let kind = match prompt("Task type: 1) Todo 2) Habit")?.as_str() {
        "1" => TaskKind::Todo,
        "2" => TaskKind::Habit,
        _ => {
            println!("Invalid task type!");
            return Ok(());
        }
    };
    let title = prompt("Title")?;
    let description = prompt("Description (optional)")?;
    let priority = match kind {
        TaskKind::Todo => match read_priority()? {
            Some(p) => Some(p),
            None => return Ok(()),
        },
        TaskKind::Habit => None,
    };

    match game
        .session_mut()
        .create_task(kind, &title, &description, priority)
    {
        Ok(_) => println!("Task created!"),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn read_priority() -> Result<Option<Priority>> {
    let answer = prompt("Priority (low/medium/high)")?;
    if answer.is_empty() {
        return Ok(Some(Priority::Low));
    }
    match answer.parse::<Priority>() {
        Ok(p) => Ok(Some(p)),
        Err(e) => {
            println!("{e}");
            Ok(None)
        }
    }
}

fn pick_task(game: &Game, verb: &str) -> Result<Option<usize>> {
    let tasks = game.session().tasks();
    println!("\n{}", render::tasks(tasks));
    if tasks.is_empty() {
        return Ok(None);
    }
    let choice = parse_choice(&prompt(&format!("Enter task number to {verb}"))?, tasks.len());
    if choice.is_none() {
        println!("Invalid task number!");
    }
    Ok(choice)
}

fn complete_task(game: &mut Game) -> Result<()> {
    let Some(index) = pick_task(game, "complete")? else {
        return Ok(());
    };
    let success = match game.session().task(index).map(|t| t.kind()) {
        Some(TaskKind::Habit) => Some(confirm("Was the task successful?")?),
        _ => None,
    };
    let out = game.session_mut().complete_task(index, success)?;
    println!("{}", render::completion(&out));
    Ok(())
}

fn delete_task(game: &mut Game) -> Result<()> {
    let Some(index) = pick_task(game, "delete")? else {
        return Ok(());
    };
    let task = game.session_mut().delete_task(index)?;
    println!("Task '{}' deleted successfully!", task.title());
    Ok(())
}

fn edit_task(game: &mut Game) -> Result<()> {
    let Some(index) = pick_task(game, "edit")? else {
        return Ok(());
    };
    let title = prompt("New title")?;
    let description = prompt("New description (blank keeps the current one)")?;
    let description = (!description.is_empty()).then_some(description.as_str());
    let is_todo = game.session().task(index).map(|t| t.kind()) == Some(TaskKind::Todo);
    let priority = if is_todo {
        match read_priority()? {
            Some(p) => Some(p),
            None => return Ok(()),
        }
    } else {
        None
    };

    match game
        .session_mut()
        .edit_task(index, &title, description, priority)
    {
        Ok(()) => println!("Task updated!"),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn marketplace(game: &mut Game) -> Result<()> {
    let items = market_catalog();
    println!("\nMarketplace:\n{}", render::market(&items));
    let Some(index) = parse_choice(&prompt("Choose item to buy (0 to exit)")?, items.len()) else {
        return Ok(());
    };
    let kind: ItemKind = items[index].kind();
    match game.session_mut().purchase_item(kind) {
        Ok(item) => println!("Used {} successfully!", item.name()),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn settings(game: &mut Game) -> Result<()> {
    println!("\n=== Settings ===");
    println!(
        "1. Change Character Name ({})",
        game.session().character().name()
    );
    println!("2. Reset All Data");
    println!("3. Back to Main Menu");

    match prompt("Choose an option (1-3)")?.as_str() {
        "1" => {
            let name = prompt("Enter new character name")?;
            match game.session_mut().rename_character(&name) {
                Ok(()) => println!(
                    "Character name changed to: {}",
                    game.session().character().name()
                ),
                Err(e) => println!("{e}"),
            }
        }
        "2" => {
            if !confirm("Are you sure you want to reset all data? This cannot be undone!")? {
                println!("Reset cancelled.");
                return Ok(());
            }
            let name = prompt("Enter new character name")?;
            match game.session_mut().reset_character(&name) {
                Ok(()) => println!("All data has been reset to default values!"),
                Err(e) => println!("Reset cancelled - {e}"),
            }
        }
        _ => {}
    }
    Ok(())
}
