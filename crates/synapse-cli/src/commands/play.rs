use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use synapse_fiction::{Difficulty, GameConfig, GameSession, LineKind, TurnReport};

/// Options for a game. Flags override the config file, which overrides defaults.
#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Name SYNAPSE calls you
    #[arg(short, long)]
    pub name: Option<String>,

    /// RNG seed for room events
    #[arg(long)]
    pub seed: Option<u64>,

    /// Difficulty: easy, normal, hard
    #[arg(short, long)]
    pub difficulty: Option<String>,

    /// Save file used by save, load and autosave
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Autosave every N turns (0 disables)
    #[arg(long)]
    pub autosave: Option<u32>,

    /// Resume from the save file
    #[arg(short, long)]
    pub resume: bool,
}

impl PlayArgs {
    fn game_config(&self) -> Result<GameConfig, String> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path).map_err(|e| e.to_string())?,
            None => GameConfig::default(),
        };
        if let Some(name) = &self.name {
            config = config.with_player_name(name.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(d) = &self.difficulty {
            let difficulty = Difficulty::parse(d)
                .ok_or_else(|| format!("unknown difficulty '{d}' (expected easy, normal or hard)"))?;
            config = config.with_difficulty(difficulty);
        }
        if let Some(path) = &self.save {
            config = config.with_save_path(path.clone());
        }
        if let Some(turns) = self.autosave {
            config = config.with_autosave_interval(turns);
        }
        Ok(config)
    }
}

pub fn run(args: &PlayArgs) -> Result<(), String> {
    let config = args.game_config()?;
    let difficulty = config.difficulty;
    let seed = config.seed;
    let mut session =
        GameSession::new(config).map_err(|e| format!("failed to start game: {e}"))?;

    println!("  {}", "S Y N A P S E".bold());
    println!("  Difficulty: {difficulty} | Seed: {seed}");
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    if args.resume {
        match session.process("load") {
            Ok(report) => print_report(&report),
            Err(e) => {
                println!("{}", format!("Could not resume: {e}").yellow());
                println!("{}\n", "Starting a new game instead.".yellow());
                print_report(&session.intro());
            }
        }
    } else {
        print_report(&session.intro());
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match session.process(input) {
            Ok(report) => {
                print_report(&report);
                if report.quit || report.is_over() {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}

fn print_report(report: &TurnReport) {
    if report.lines.is_empty() {
        return;
    }
    for line in &report.lines {
        let text = line.text.as_str();
        match line.kind {
            LineKind::Narration => println!("{text}"),
            LineKind::Synapse => println!("{} {}", "SYNAPSE:".cyan().bold(), text.cyan()),
            LineKind::Event => println!("{}", text.magenta()),
            LineKind::Warning => println!("{}", text.yellow()),
            LineKind::System => println!("{}", text.dimmed()),
            LineKind::Ending => println!("{}", text.red().bold()),
        }
    }
    println!();
}
