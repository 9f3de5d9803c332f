mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::commands::{
    IntoleranceArgs, ItemArgs, NotFound, Store, cmd_clear, cmd_dislike_add, cmd_dislike_edit,
    cmd_dislike_list, cmd_dislike_remove, cmd_favorite_add, cmd_favorite_edit, cmd_favorite_list,
    cmd_favorite_remove, cmd_instructions, cmd_intolerance_add, cmd_intolerance_edit,
    cmd_intolerance_list, cmd_intolerance_quick_add, cmd_intolerance_remove,
    cmd_intolerance_suggest, cmd_name, cmd_show,
};
use crate::config::Config;
use mealprefs_core::persistence::PreferencesRepository;
use mealprefs_core::storage::{KeyValueStore, MemoryStore, SqliteStore};

#[derive(Parser)]
#[command(
    name = "mealprefs",
    version,
    about = "Record favorite foods, dislikes, allergies, and special instructions"
)]
struct Cli {
    /// Store data in this directory instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    /// Increase log output (-v info, -vv debug); `RUST_LOG` overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all saved preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the name of the person these preferences belong to
    Name {
        /// Person name (pass "" to clear)
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set special instructions (suggested maximum: 500 characters)
    Instructions {
        /// Free-text instructions (pass "" to clear)
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage favorite foods
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// Manage disliked foods
    Dislike {
        #[command(subcommand)]
        command: DislikeCommands,
    },
    /// Manage food intolerances and allergies
    Intolerance {
        #[command(subcommand)]
        command: IntoleranceCommands,
    },
    /// Delete all saved preferences
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct NewItemFields {
    /// Food name
    name: String,
    /// Category: breakfast, lunch, dinner, snacks, beverages, desserts, other, or any text
    #[arg(short, long)]
    category: Option<String>,
    /// Optional notes
    #[arg(short, long)]
    notes: Option<String>,
}

impl From<NewItemFields> for ItemArgs {
    fn from(fields: NewItemFields) -> Self {
        ItemArgs {
            name: Some(fields.name),
            category: fields.category,
            notes: fields.notes,
        }
    }
}

#[derive(Args)]
struct EditItemFields {
    /// ID of the entry to edit
    id: String,
    /// New name
    #[arg(long)]
    name: Option<String>,
    /// New category (pass "" to clear)
    #[arg(short, long)]
    category: Option<String>,
    /// New notes (pass "" to clear)
    #[arg(short, long)]
    notes: Option<String>,
}

impl EditItemFields {
    fn split(self) -> (String, ItemArgs) {
        (
            self.id,
            ItemArgs {
                name: self.name,
                category: self.category,
                notes: self.notes,
            },
        )
    }
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// Add a favorite food
    Add {
        #[command(flatten)]
        fields: NewItemFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a favorite food
    Edit {
        #[command(flatten)]
        fields: EditItemFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a favorite food by ID
    Remove {
        /// Entry ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List favorite foods
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DislikeCommands {
    /// Add a disliked food
    Add {
        #[command(flatten)]
        fields: NewItemFields,
        /// Severity: mild, moderate, severe
        #[arg(short, long, default_value = "mild")]
        severity: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a disliked food
    Edit {
        #[command(flatten)]
        fields: EditItemFields,
        /// New severity: mild, moderate, severe
        #[arg(short, long)]
        severity: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a disliked food by ID
    Remove {
        /// Entry ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List disliked foods
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum IntoleranceCommands {
    /// Add an intolerance or allergy
    Add {
        #[command(flatten)]
        fields: NewItemFields,
        /// Severity: mild, moderate, severe
        #[arg(short, long, default_value = "mild")]
        severity: String,
        /// Mark as an allergy rather than an intolerance
        #[arg(long)]
        allergy: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an intolerance or allergy
    Edit {
        #[command(flatten)]
        fields: EditItemFields,
        /// New severity: mild, moderate, severe
        #[arg(short, long)]
        severity: Option<String>,
        /// Mark as an allergy
        #[arg(long, conflicts_with = "not_allergy")]
        allergy: bool,
        /// Mark as an intolerance (not an allergy)
        #[arg(long)]
        not_allergy: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an intolerance or allergy by ID
    Remove {
        /// Entry ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List intolerances and allergies
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show common allergies that are not listed yet
    Suggest {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a common allergy as severe (e.g. "Peanuts")
    QuickAdd {
        /// Allergy name from the suggestion list
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn allergy_flag(allergy: bool, not_allergy: bool) -> Option<bool> {
    match (allergy, not_allergy) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Dropped when `main` returns, after the last log line is written.
    let _logger = match logging::init(cli.verbose) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    ExitCode::from(report(&run(cli)))
}

/// Exit status for a finished command: 2 for an unknown id (already
/// reported), 1 for any other error.
fn report(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) if e.is::<NotFound>() => 2,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

fn open_database(data_dir: Option<&Path>) -> Result<SqliteStore> {
    let config = Config::load(data_dir)?;
    log::debug!("Data directory: {}", config.data_dir.display());
    let db = SqliteStore::open(&config.db_path)
        .with_context(|| format!("Could not open {}", config.db_path.display()))?;
    log::debug!("Opened {}", config.db_path.display());
    Ok(db)
}

/// Never fails: without a usable database the session runs in memory and
/// nothing is kept after the command exits.
fn open_store(data_dir: Option<&Path>) -> Store {
    let backend: Box<dyn KeyValueStore> = match open_database(data_dir) {
        Ok(db) => Box::new(db),
        Err(e) => {
            log::error!("{e:#}; changes in this session will not be saved");
            Box::new(MemoryStore::new())
        }
    };
    Store::open(PreferencesRepository::new(backend))
}

fn run(cli: Cli) -> Result<()> {
    let mut store = open_store(cli.data_dir.as_deref());

    match cli.command {
        Commands::Show { json } => cmd_show(&store, json),
        Commands::Name { name, json } => cmd_name(&mut store, &name, json),
        Commands::Instructions { text, json } => cmd_instructions(&mut store, &text, json),
        Commands::Clear { json } => cmd_clear(&mut store, json),
        Commands::Favorite { command } => match command {
            FavoriteCommands::Add { fields, json } => {
                cmd_favorite_add(&mut store, fields.into(), json)
            }
            FavoriteCommands::Edit { fields, json } => {
                let (id, args) = fields.split();
                cmd_favorite_edit(&mut store, &id, args, json)
            }
            FavoriteCommands::Remove { id, json } => cmd_favorite_remove(&mut store, &id, json),
            FavoriteCommands::List { json } => cmd_favorite_list(&store, json),
        },
        Commands::Dislike { command } => match command {
            DislikeCommands::Add {
                fields,
                severity,
                json,
            } => cmd_dislike_add(&mut store, fields.into(), &severity, json),
            DislikeCommands::Edit {
                fields,
                severity,
                json,
            } => {
                let (id, args) = fields.split();
                cmd_dislike_edit(&mut store, &id, args, severity.as_deref(), json)
            }
            DislikeCommands::Remove { id, json } => cmd_dislike_remove(&mut store, &id, json),
            DislikeCommands::List { json } => cmd_dislike_list(&store, json),
        },
        Commands::Intolerance { command } => match command {
            IntoleranceCommands::Add {
                fields,
                severity,
                allergy,
                json,
            } => cmd_intolerance_add(
                &mut store,
                IntoleranceArgs {
                    item: fields.into(),
                    severity: Some(severity),
                    is_allergy: Some(allergy),
                },
                json,
            ),
            IntoleranceCommands::Edit {
                fields,
                severity,
                allergy,
                not_allergy,
                json,
            } => {
                let (id, item) = fields.split();
                cmd_intolerance_edit(
                    &mut store,
                    &id,
                    IntoleranceArgs {
                        item,
                        severity,
                        is_allergy: allergy_flag(allergy, not_allergy),
                    },
                    json,
                )
            }
            IntoleranceCommands::Remove { id, json } => {
                cmd_intolerance_remove(&mut store, &id, json)
            }
            IntoleranceCommands::List { json } => cmd_intolerance_list(&store, json),
            IntoleranceCommands::Suggest { json } => cmd_intolerance_suggest(&store, json),
            IntoleranceCommands::QuickAdd { name, json } => {
                cmd_intolerance_quick_add(&mut store, &name, json)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_favorite_add() {
        let cli = Cli::try_parse_from([
            "mealprefs",
            "favorite",
            "add",
            "Soup",
            "--category",
            "dinner",
        ])
        .unwrap();
        let Commands::Favorite {
            command: FavoriteCommands::Add { fields, json },
        } = cli.command
        else {
            panic!("expected favorite add");
        };
        assert_eq!(fields.name, "Soup");
        assert_eq!(fields.category.as_deref(), Some("dinner"));
        assert!(fields.notes.is_none());
        assert!(!json);
    }

    #[test]
    fn test_parse_global_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["mealprefs", "show", "--data-dir", "/tmp/prefs"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/prefs")));
    }

    #[test]
    fn test_allergy_flags_conflict() {
        let result = Cli::try_parse_from([
            "mealprefs",
            "intolerance",
            "edit",
            "abc",
            "--allergy",
            "--not-allergy",
        ]);
        assert!(result.is_err());
    }

    fn run_in(dir: &Path, args: &[&str]) -> Result<()> {
        let mut argv = vec!["mealprefs", "--data-dir", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        run(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_unreadable_database_falls_back_to_memory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("mealprefs.db");
        let garbage = "this is not a database ".repeat(200);
        std::fs::write(&db_path, &garbage).unwrap();

        let mut store = open_store(Some(tmp.path()));
        assert!(store.preferences().is_empty());
        cmd_show(&store, true).unwrap();

        cmd_name(&mut store, "Ada", false).unwrap();
        assert_eq!(store.preferences().person_name, "Ada");
        assert!(!store.last_save_failed());

        // Whole commands still succeed, and the file is left alone.
        assert_eq!(report(&run_in(tmp.path(), &["show"])), 0);
        assert_eq!(report(&run_in(tmp.path(), &["name", "Ada"])), 0);
        assert_eq!(std::fs::read_to_string(&db_path).unwrap(), garbage);
    }

    #[test]
    fn test_unusable_data_dir_falls_back_to_memory() {
        let tmp = tempfile::tempdir().unwrap();
        let not_a_dir = tmp.path().join("file");
        std::fs::write(&not_a_dir, "x").unwrap();

        let store = open_store(Some(&not_a_dir));
        assert!(store.preferences().is_empty());
        assert_eq!(report(&run_in(&not_a_dir, &["show", "--json"])), 0);
    }

    #[test]
    fn test_exit_status() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(report(&run_in(tmp.path(), &["favorite", "add", "Soup"])), 0);
        assert_eq!(
            report(&run_in(tmp.path(), &["favorite", "remove", "no-such-id"])),
            2
        );
        assert_eq!(
            report(&run_in(tmp.path(), &["dislike", "add", "Liver", "-s", "deadly"])),
            1
        );
    }

    #[test]
    fn test_allergy_flag() {
        assert_eq!(allergy_flag(true, false), Some(true));
        assert_eq!(allergy_flag(false, true), Some(false));
        assert_eq!(allergy_flag(false, false), None);
    }
}
