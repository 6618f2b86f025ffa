mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gitpass::error::Result;
use gitpass::lifecycle::Lifecycle;

#[derive(Parser)]
#[command(name = "gitpass")]
#[command(version)]
#[command(about = "A password store inside a git repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change configuration values
    Config {
        /// Configuration key to read or write
        #[arg(short, long)]
        key: Option<String>,

        /// New value for the key
        #[arg(short, long)]
        set: Option<String>,
    },

    /// Initialize a password repository
    Init {
        /// Repository path (defaults to the configured default_repository)
        #[arg(short, long)]
        repository: Option<PathBuf>,
    },

    /// List stored entries
    Ls {
        /// Path prefix to list under
        #[arg(default_value = "/")]
        path: String,

        /// Repository path (defaults to the configured default_repository)
        #[arg(short, long)]
        repository: Option<PathBuf>,
    },

    /// Read a stored password, or store a new one
    Pw {
        /// Entry path inside the repository
        path: String,

        /// Repository path (defaults to the configured default_repository)
        #[arg(short, long)]
        repository: Option<PathBuf>,

        /// Store a new value (prompted with confirmation) instead of reading
        #[arg(short, long)]
        set: bool,

        /// Store the contents of this file as the value
        #[arg(short, long)]
        key: Option<PathBuf>,
    },

    /// Remove a stored entry
    Rm {
        /// Entry path inside the repository
        path: String,

        /// Repository path (defaults to the configured default_repository)
        #[arg(short, long)]
        repository: Option<PathBuf>,
    },

    /// Generate a random password
    Generate {
        /// Minimum password length (inclusive)
        #[arg(long, default_value_t = 8)]
        min_length: u64,

        /// Maximum password length (inclusive)
        #[arg(long, default_value_t = 32)]
        max_length: u64,

        /// Characters to exclude from the password alphabet
        #[arg(long)]
        exclude: Option<String>,

        /// Leave out lowercase letters
        #[arg(long)]
        no_lowercase: bool,

        /// Leave out uppercase letters
        #[arg(long)]
        no_uppercase: bool,

        /// Leave out digits
        #[arg(long)]
        no_numbers: bool,

        /// Leave out punctuation characters
        #[arg(long)]
        no_special: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let lifecycle = Lifecycle::acquire()?;

    match cli.command {
        Commands::Config { key, set } => commands::config(key.as_deref(), set.as_deref()),
        Commands::Init { repository } => commands::init(&lifecycle, repository.as_deref()),
        Commands::Ls { path, repository } => commands::ls(&lifecycle, repository.as_deref(), &path),
        Commands::Pw {
            path,
            repository,
            set,
            key,
        } => commands::pw(&lifecycle, repository.as_deref(), &path, set, key.as_deref()),
        Commands::Rm { path, repository } => {
            commands::rm(&lifecycle, repository.as_deref(), &path)
        }
        Commands::Generate {
            min_length,
            max_length,
            exclude,
            no_lowercase,
            no_uppercase,
            no_numbers,
            no_special,
        } => commands::generate(
            min_length,
            max_length,
            exclude.as_deref(),
            no_lowercase,
            no_uppercase,
            no_numbers,
            no_special,
        ),
    }
}
