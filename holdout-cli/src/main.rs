use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use holdout_core::{Game, ItemKind, Priority, SaveStore, Session, TaskKind, market_catalog};
use std::path::PathBuf;

mod config;
mod play;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "holdout",
    version,
    about = "Survival-themed to-do and habit tracker"
)]
struct Cli {
    /// Save file to use (overrides $HOLDOUT_SAVE_FILE and config.toml)
    #[arg(long, global = true)]
    save_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default when no command is given)
    Play,

    /// Show the survivor's stats
    Status,

    /// List tasks
    List,

    /// Add a task
    Add {
        #[arg(value_enum)]
        kind: KindArg,

        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// low, medium or high (todos only; default low)
        #[arg(long)]
        priority: Option<String>,
    },

    /// Complete a task by its number in `list`
    Done {
        number: usize,

        /// Record a habit as failed (costs health instead of granting XP)
        #[arg(long, default_value_t = false)]
        failed: bool,
    },

    /// Edit a task's title, description and priority
    Edit {
        number: usize,

        title: String,

        /// New description (kept when omitted; pass "" to clear)
        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<String>,
    },

    /// Delete a task by its number in `list`
    Rm { number: usize },

    /// Show what the market sells
    Market,

    /// Buy and use an item: food, water or medicine
    Buy { item: String },

    /// Change the survivor's name
    Rename { name: String },

    /// Wipe the survivor and all tasks, starting over as NAME
    Reset {
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Show resolved configuration, or write a default config.toml
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.holdout/config.toml with defaults
    Init,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Todo,
    Habit,
}

impl From<KindArg> for TaskKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Todo => TaskKind::Todo,
            KindArg::Habit => TaskKind::Habit,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(&cfg.log.level);

    let save_path = config::resolve_save_path(&cfg, cli.save_file)?;
    tracing::debug!("using save file {}", save_path.display());
    let store = SaveStore::new(save_path);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let mut game = open_game(store)?;
            play::run(&mut game)?;
        }

        Command::Status => {
            let game = open_game(store)?;
            println!("{}", render::stats(game.session().character()));
            if !game.session().is_alive() {
                println!("\nGame Over! Your character has died. Run: holdout reset <name>");
            }
        }

        Command::List => {
            let game = open_game(store)?;
            println!("{}", render::tasks(game.session().tasks()));
        }

        Command::Add {
            kind,
            title,
            description,
            priority,
        } => {
            let priority = parse_priority(priority)?;
            let mut game = open_game(store)?;
            let index = game
                .session_mut()
                .create_task(kind.into(), &title, &description, priority)?;
            save(&game)?;
            println!("Added task {}: {}", index + 1, title.trim());
        }

        Command::Done { number, failed } => {
            let mut game = open_game(store)?;
            let index = to_index(number)?;
            let out = game.session_mut().complete_task(index, Some(!failed))?;
            save(&game)?;
            println!("{}", render::completion(&out));
            if !game.session().is_alive() {
                println!("Game Over! Your character has died.");
            }
        }

        Command::Edit {
            number,
            title,
            description,
            priority,
        } => {
            let priority = parse_priority(priority)?;
            let mut game = open_game(store)?;
            game.session_mut()
                .edit_task(to_index(number)?, &title, description.as_deref(), priority)?;
            save(&game)?;
            println!("Task {} updated.", number);
        }

        Command::Rm { number } => {
            let mut game = open_game(store)?;
            let task = game.session_mut().delete_task(to_index(number)?)?;
            save(&game)?;
            println!("Task '{}' deleted.", task.title());
        }

        Command::Market => {
            println!("{}", render::market(&market_catalog()));
        }

        Command::Buy { item } => {
            let kind: ItemKind = item.parse()?;
            let mut game = open_game(store)?;
            let bought = game.session_mut().purchase_item(kind)?;
            save(&game)?;
            println!("Used {} successfully!", bought.name());
        }

        Command::Rename { name } => {
            let mut game = open_game(store)?;
            game.session_mut().rename_character(&name)?;
            save(&game)?;
            println!(
                "Character name changed to: {}",
                game.session().character().name()
            );
        }

        Command::Reset { name, yes } => {
            if !yes
                && !play::prompt("Reset all data? This cannot be undone! (y/n)")?
                    .eq_ignore_ascii_case("y")
            {
                println!("Reset cancelled.");
                return Ok(());
            }
            let session = Session::create_character(&name)?;
            let game = match Game::resume(store.clone()) {
                Some(mut game) => {
                    game.session_mut().reset_character(&name)?;
                    game
                }
                None => Game::new(store, session),
            };
            save(&game)?;
            println!("All data has been reset to default values!");
        }

        Command::Config { command } => match command {
            Some(ConfigCommand::Init) => config::init_config()?,
            None => {
                println!("config file: {}", config::config_path()?.display());
                println!("save file:   {}", store.path().display());
                println!("log level:   {}", cfg.log.level);
            }
        },
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resume the saved game, or ask for a name and start a new one.
fn open_game(store: SaveStore) -> Result<Game> {
    if let Some(game) = Game::resume(store.clone()) {
        return Ok(game);
    }
    println!("No saved survivor at {}.", store.path().display());
    let name = play::prompt_name("Enter your character name")?;
    let game = Game::new(store, Session::create_character(&name)?);
    save(&game)?;
    Ok(game)
}

fn save(game: &Game) -> Result<()> {
    game.save()
        .with_context(|| format!("save {}", game.store().path().display()))
}

fn parse_priority(raw: Option<String>) -> Result<Option<Priority>> {
    Ok(raw.map(|p| p.parse::<Priority>()).transpose()?)
}

fn to_index(number: usize) -> Result<usize> {
    if number == 0 {
        bail!("task numbers start at 1 (see: holdout list)");
    }
    Ok(number - 1)
}
