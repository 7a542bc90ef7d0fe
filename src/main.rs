//! Tactician -- the Boss decision engine on the command line.
//!
//! Reads a position in board notation and either prints its evaluation or
//! runs one Boss decision against it. Results go to stdout, one line each;
//! logs go to stderr (filter with `RUST_LOG`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tactician::board::{DurationKind, EffectId, TileEffectSnapshot, UnitEffectSnapshot, UnitKind};
use tactician::config::{load_config, EngineConfig};
use tactician::engine::Engine;
use tactician::protocol::parse_position;
use tactician::select::{Decision, SelectError, UnitTemplate};
use tactician::table::Table;

/// Effect id used for cards played from the command line.
const CLI_CARD_EFFECT: EffectId = EffectId(1);

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the static evaluation breakdown of a position.
    Eval {
        #[arg(long)]
        position: String,

        /// JSON engine configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run one Boss decision on a position.
    Decide {
        #[arg(long)]
        position: String,

        #[arg(long, value_enum)]
        action: Action,

        /// Overrides the configured search depth.
        #[arg(long, allow_hyphen_values = true)]
        depth: Option<i32>,

        /// JSON engine configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Unit kind to spawn (P, N, B, R, Q or K).
        #[arg(long, default_value = "P", value_parser = parse_kind)]
        kind: UnitKind,

        /// Duration of the played effect in turns; 0 means permanent.
        #[arg(long, default_value_t = 2)]
        turns: i32,

        /// Seed for the fallback RNG.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    Spawn,
    Buff,
    Tile,
    Move,
}

fn parse_kind(s: &str) -> Result<UnitKind, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => UnitKind::from_notation_char(c.to_ascii_uppercase())
            .ok_or_else(|| format!("unknown unit kind '{s}'")),
        _ => Err(format!("unknown unit kind '{s}'")),
    }
}

fn duration(turns: i32) -> (DurationKind, i32) {
    if turns == 0 {
        (DurationKind::Permanent, 0)
    } else {
        (DurationKind::Temporary, turns)
    }
}

fn config_from(path: Option<&PathBuf>) -> Result<EngineConfig, String> {
    match path {
        Some(p) => load_config(p).map_err(|e| e.to_string()),
        None => Ok(EngineConfig::default()),
    }
}

/// Formats a decision as one output line.
fn decision_line<T>(action: &str, result: Result<Decision<T>, SelectError>, show: impl Fn(&T) -> String) -> String {
    match result {
        Ok(Decision::Single(t)) => format!("best {action} {} single", show(&t)),
        Ok(Decision::Searched { target, score }) => {
            format!("best {action} {} searched {score:.3}", show(&target))
        }
        Ok(Decision::Random(t)) => format!("best {action} {} random", show(&t)),
        Ok(Decision::Declined { best_score, baseline }) => {
            format!("decline {action} {best_score:.3} {baseline:.3}")
        }
        Err(e) => format!("error {action} {e}"),
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Eval { position, config } => {
            let state = parse_position(&position).map_err(|e| e.to_string())?;
            let engine = Engine::new(config_from(config.as_ref())?);
            let breakdown = engine.breakdown(&state);
            for (name, value) in breakdown.components() {
                println!("{name} {value:.3}");
            }
            println!("total {:.3}", breakdown.total());
        }
        Commands::Decide {
            position,
            action,
            depth,
            config,
            kind,
            turns,
            seed,
        } => {
            let state = parse_position(&position).map_err(|e| e.to_string())?;
            let mut config = config_from(config.as_ref())?;
            if let Some(depth) = depth {
                config.depth = depth;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if turns < 0 {
                return Err(format!("turns must not be negative, got {turns}"));
            }

            let table = Table::from_state(&state);
            let units = table.units();
            let mut engine = Engine::new(config);
            let (duration, remaining) = duration(turns);

            let line = match action {
                Action::Spawn => decision_line(
                    "spawn",
                    engine.choose_spawn(&table, units, &UnitTemplate::of(kind)),
                    |tile| tile.to_string(),
                ),
                Action::Buff => {
                    let shield = UnitEffectSnapshot::invulnerable(CLI_CARD_EFFECT, duration, remaining);
                    decision_line("buff", engine.choose_buff_target(&table, units, &shield), |u| {
                        u.name.clone()
                    })
                }
                Action::Tile => {
                    let barrier = TileEffectSnapshot::new(CLI_CARD_EFFECT, duration, remaining, true);
                    decision_line(
                        "tile",
                        engine.choose_tile_effect(&table, units, &barrier),
                        |tile| tile.to_string(),
                    )
                }
                Action::Move => decision_line("move", engine.choose_move(&table, units), |m| {
                    format!("{} {}{}", m.unit.name, m.from, m.to)
                }),
            };
            println!("{line}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
