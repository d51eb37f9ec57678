use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use training_plan_lib::catalog::{LibraryCatalog, WorkoutCatalog};
use training_plan_lib::config::PipelineConfig;
use training_plan_lib::models::{RaceDistance, RunnerProfile, Units};
use training_plan_lib::paces::{derive_single_goal_paces, PaceTable};
use training_plan_lib::pipeline::compile_plan;

#[derive(Parser)]
#[command(name = "training-plan")]
#[command(about = "Compile generated training-plan text into prescribed workouts", long_about = None)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse, enrich, and repair plan text; prints the plan as JSON
  Compile {
    /// Plan text file ("-" for stdin)
    plan: PathBuf,

    /// Runner profile JSON
    #[arg(short, long)]
    profile: PathBuf,

    /// Workout library JSON (defaults to the built-in library)
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Regeneration mode: drop weeks numbered below this
    #[arg(short, long)]
    start_week: Option<u32>,
  },

  /// Training paces for a goal race
  Paces {
    /// Race distance (5K, 10K, Half, Marathon)
    distance: String,

    /// Goal time (m:ss or h:mm:ss)
    time: String,

    /// Units for zone paces (mi or km)
    #[arg(short, long, default_value = "mi")]
    units: String,
  },

  /// Estimate a race time from training volume
  Estimate {
    /// Longest recent run
    #[arg(long)]
    long_run: f64,

    /// Weekly volume
    #[arg(long)]
    weekly: f64,

    /// Race distance to estimate
    #[arg(short, long, default_value = "10K")]
    distance: String,

    /// Units of the volume figures (mi or km)
    #[arg(short, long, default_value = "mi")]
    units: String,
  },
}

fn read_input(path: &Path) -> Result<String> {
  if path == Path::new("-") {
    let mut text = String::new();
    std::io::stdin()
      .read_to_string(&mut text)
      .context("Failed to read plan text from stdin")?;
    return Ok(text);
  }
  std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_units(units: &str) -> Result<Units> {
  units.parse().map_err(anyhow::Error::msg)
}

fn main() -> Result<()> {
  dotenvy::dotenv().ok();

  // JSON goes to stdout; logs go to stderr
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();

  let output = match cli.command {
    Commands::Compile {
      plan,
      profile,
      library,
      start_week,
    } => {
      let raw_text = read_input(&plan)?;
      let profile: RunnerProfile = serde_json::from_str(&read_input(&profile)?)
        .with_context(|| format!("Invalid runner profile {}", profile.display()))?;
      let config = PipelineConfig::from_env()?;

      let custom_library;
      let catalog: &dyn WorkoutCatalog = match library {
        Some(path) => {
          custom_library = LibraryCatalog::from_json(&read_input(&path)?)
            .with_context(|| format!("Invalid workout library {}", path.display()))?;
          &custom_library
        }
        None => LibraryCatalog::builtin()?,
      };

      let compiled = compile_plan(&raw_text, &profile, catalog, &config, start_week)?;
      serde_json::to_string_pretty(&compiled)?
    }

    Commands::Paces { distance, time, units } => {
      let paces = derive_single_goal_paces(&distance, &time)?.for_units(parse_units(&units)?);
      serde_json::to_string_pretty(&paces)?
    }

    Commands::Estimate {
      long_run,
      weekly,
      distance,
      units,
    } => {
      let distance: RaceDistance = distance.parse().map_err(anyhow::Error::msg)?;
      let units = parse_units(&units)?;
      let estimate = PaceTable::builtin()?.estimate_race_time_from_fitness(
        units.to_miles(long_run),
        units.to_miles(weekly),
        distance,
      )?;
      serde_json::to_string_pretty(&estimate)?
    }
  };

  println!("{}", output);
  Ok(())
}
