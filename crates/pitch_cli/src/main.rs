//! Pitch CLI
//!
//! Headless match runner: seeded simulation → JSON summary
//! (score, stats, integrity report, optional event log).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use pitch_core::analysis::{verify, MatchReport, MatchStats};
use pitch_core::fixtures::sample_team;
use pitch_core::tactics::AIDifficulty;
use pitch_core::{AIProfile, MatchEngine, MatchEvent, SimConfig, TeamSide, Termination};

#[derive(Parser)]
#[command(name = "pitch")]
#[command(about = "Run seeded football matches headless", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match and print the summary as JSON
    Simulate {
        /// RNG seed (same seed + same config = same match)
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Field preset, ignored when --config is given
        #[arg(long, value_enum, default_value_t = FieldPreset::Legacy)]
        field: FieldPreset,

        /// AI profile for the home side (e.g. "aggressive")
        #[arg(long)]
        home_profile: Option<String>,

        /// AI profile for the away side
        #[arg(long)]
        away_profile: Option<String>,

        /// AI difficulty for both sides
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// SimConfig JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Include the full event log
        #[arg(long, default_value = "false")]
        events: bool,

        /// Write the summary here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print progress to stderr
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },

    /// List the AI profile presets
    Profiles {
        #[arg(long, default_value = "medium")]
        difficulty: String,
    },

    /// Print the default config as JSON
    Config {
        #[arg(long, value_enum, default_value_t = FieldPreset::Legacy)]
        field: FieldPreset,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FieldPreset {
    /// 1050 × 680
    Legacy,
    /// 104 × 68
    Metric,
}

impl FieldPreset {
    fn config(self) -> SimConfig {
        match self {
            FieldPreset::Legacy => SimConfig::legacy(),
            FieldPreset::Metric => SimConfig::metric(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchSummary {
    seed: u64,
    ticks: u32,
    home: String,
    away: String,
    score: (u8, u8),
    termination: Option<Termination>,
    decisions: usize,
    adaptations: usize,
    stats: MatchStats,
    report: MatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<MatchEvent>>,
}

struct SimulateArgs {
    seed: u64,
    config: SimConfig,
    home_profile: Option<AIProfile>,
    away_profile: Option<AIProfile>,
    include_events: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            seed,
            field,
            home_profile,
            away_profile,
            difficulty,
            config,
            events,
            out,
            verbose,
        } => {
            let difficulty = parse_difficulty(&difficulty)?;
            let args = SimulateArgs {
                seed,
                config: load_config(config.as_deref(), field)?,
                home_profile: home_profile.map(|n| AIProfile::preset(&n, difficulty)).transpose()?,
                away_profile: away_profile.map(|n| AIProfile::preset(&n, difficulty)).transpose()?,
                include_events: events,
            };

            if verbose {
                eprintln!("⚽ Simulating match...");
                eprintln!("   Seed:  {}", args.seed);
                eprintln!("   Field: {} × {}", args.config.field.length, args.config.field.width);
            }

            let summary = simulate(args)?;

            if verbose {
                let (home_goals, away_goals) = summary.score;
                eprintln!("\n✅ Full time: {} {} - {} {}", summary.home, home_goals, away_goals, summary.away);
                eprintln!("   Ticks:       {}", summary.ticks);
                eprintln!("   Decisions:   {}", summary.decisions);
                eprintln!("   Adaptations: {}", summary.adaptations);
                eprintln!("   Digest:      {}", summary.report.event_digest);
            }

            let json = serde_json::to_string_pretty(&summary)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                    if verbose {
                        eprintln!("\n📄 Summary saved to: {}", path.display());
                    }
                }
                None => println!("{}", json),
            }
        }

        Commands::Profiles { difficulty } => {
            let difficulty = parse_difficulty(&difficulty)?;
            println!("{}", serde_json::to_string_pretty(&AIProfile::all(difficulty))?);
        }

        Commands::Config { field } => {
            println!("{}", field.config().to_json()?);
        }
    }

    Ok(())
}

fn parse_difficulty(name: &str) -> Result<AIDifficulty> {
    AIDifficulty::from_name(name).with_context(|| format!("unknown difficulty: {}", name))
}

fn load_config(path: Option<&Path>, field: FieldPreset) -> Result<SimConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(SimConfig::from_json(&json)?)
        }
        None => Ok(field.config()),
    }
}

fn simulate(args: SimulateArgs) -> Result<MatchSummary> {
    let state = pitch_core::init_match(
        sample_team("Home", 1),
        sample_team("Away", 100),
        None,
        None,
        &args.config,
    )?;

    let mut engine = MatchEngine::with_seed(args.config.clone(), state, args.seed)?;
    for (side, profile) in [(TeamSide::Home, args.home_profile), (TeamSide::Away, args.away_profile)] {
        engine.set_ai(side, profile);
    }

    let ticks = engine.run_to_end();
    let state = engine.into_state();
    let report = verify(&state, &args.config)?;
    log::info!("match finished after {} ticks, digest {}", ticks, report.event_digest);

    Ok(MatchSummary {
        seed: args.seed,
        ticks,
        home: state.home.name.clone(),
        away: state.away.name.clone(),
        score: state.score(),
        termination: state.termination.clone(),
        decisions: state.decisions.len(),
        adaptations: state.adaptations.len(),
        stats: pitch_core::get_stats(&state),
        report,
        events: args.include_events.then(|| state.events.snapshot()),
    })
}
