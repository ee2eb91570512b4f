//! Terminal frontend for SYNAPSE.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::play::PlayArgs;

#[derive(Parser)]
#[command(
    name = "synapse",
    about = "SYNAPSE: a night shift alone with the facility assistant",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume a game (the default)
    Play(PlayArgs),

    /// Show a saved game as a table
    Inspect {
        /// Save file to read
        #[arg(short, long, default_value = "synapse_save.json")]
        save: PathBuf,

        /// Also list journal entries
        #[arg(short, long)]
        journal: bool,
    },

    /// List the facility's rooms
    Rooms,

    /// List the endings and what triggers them
    Endings {
        /// Show one ending in full (e.g. liberation, vigil)
        id: Option<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Play(args)) => commands::play::run(&args),
        None => commands::play::run(&cli.play),
        Some(Commands::Inspect { save, journal }) => commands::inspect::run(&save, journal),
        Some(Commands::Rooms) => commands::rooms::run(),
        Some(Commands::Endings { id }) => commands::endings::run(id.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
