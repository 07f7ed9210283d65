//! pmf: CLI tool for inspecting and editing Process Monitor filter files.

use clap::{Parser, Subcommand};
use pmfilter::{Column, FilterStore};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pmf")]
#[command(version)]
#[command(about = "Inspect and edit Process Monitor filter (.PMF) files", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Filter file to print (same as `pmf show <FILE>`)
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rules as a table
    Show {
        /// Filter file
        file: PathBuf,

        /// Print a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Append a rule and save
    Add {
        /// Filter file
        file: PathBuf,

        /// Column name, e.g. "Process Name"
        column: String,

        /// Relation, e.g. "is" or "begins with"
        relation: String,

        /// Comparison value
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// INCLUDE or EXCLUDE
        action: String,

        /// Save through a temporary file and rename
        #[arg(long)]
        atomic: bool,
    },

    /// Remove rules by id and save
    Remove {
        /// Filter file
        file: PathBuf,

        /// Rule ids as shown by `show`
        #[arg(required = true)]
        ids: Vec<u32>,

        /// Save through a temporary file and rename
        #[arg(long)]
        atomic: bool,
    },

    /// Remove every rule and save
    Clear {
        /// Filter file
        file: PathBuf,

        /// Save through a temporary file and rename
        #[arg(long)]
        atomic: bool,
    },

    /// List known column names and codes
    Columns,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match (cli.command, cli.file) {
        (Some(command), _) => run(command),
        (None, Some(file)) => show(&file, false),
        (None, None) => {
            eprintln!("Error: a filter file or subcommand is required (see --help)");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Show { file, json } => show(&file, json),
        Commands::Add {
            file,
            column,
            relation,
            value,
            action,
            atomic,
        } => {
            let mut store = FilterStore::open(&file)?;
            let id = store.append(&column, &relation, &value, &action)?;
            save(&mut store, atomic)?;
            println!("Added rule {}", id);
            Ok(())
        }
        Commands::Remove { file, ids, atomic } => {
            let mut store = FilterStore::open(&file)?;
            for id in ids {
                if !store.remove(id) {
                    log::warn!("No rule with id {}", id);
                }
            }
            save(&mut store, atomic)?;
            print!("{}", store);
            Ok(())
        }
        Commands::Clear { file, atomic } => {
            let mut store = FilterStore::open(&file)?;
            store.clear();
            save(&mut store, atomic)?;
            println!("Cleared {:?}", file);
            Ok(())
        }
        Commands::Columns => {
            for column in Column::known() {
                println!("{:<24}0x{:04x}", column.to_string(), column.code());
            }
            Ok(())
        }
    }
}

fn show(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = FilterStore::open(file)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&store.list())?);
    } else {
        print!("{}", store);
    }
    Ok(())
}

fn save(store: &mut FilterStore<File>, atomic: bool) -> pmfilter::Result<()> {
    if atomic {
        store.commit_atomic()
    } else {
        store.commit()
    }
}
