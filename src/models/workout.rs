use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::day;

/// Library workout families a plan can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
  Tempo,
  Interval,
  LongRun,
  Hill,
}

impl WorkoutKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutKind::Tempo => "tempo",
      WorkoutKind::Interval => "interval",
      WorkoutKind::LongRun => "long_run",
      WorkoutKind::Hill => "hill",
    }
  }

  /// The type a resolved workout of this kind carries
  pub fn workout_type(&self) -> WorkoutType {
    match self {
      WorkoutKind::Tempo => WorkoutType::Tempo,
      WorkoutKind::Interval => WorkoutType::Intervals,
      WorkoutKind::LongRun => WorkoutType::LongRun,
      WorkoutKind::Hill => WorkoutType::Hills,
    }
  }
}

impl std::fmt::Display for WorkoutKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for WorkoutKind {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "tempo" => Ok(Self::Tempo),
      "interval" | "intervals" => Ok(Self::Interval),
      "long_run" | "longrun" | "long-run" => Ok(Self::LongRun),
      "hill" | "hills" => Ok(Self::Hill),
      _ => Err(format!("Unknown workout kind: {}", s)),
    }
  }
}

/// Symbolic pointer into the workout library, e.g. `tempo_THRESHOLD_0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutReference {
  pub kind: WorkoutKind,
  pub category: String,
  pub index: usize,
}

impl std::fmt::Display for WorkoutReference {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}_{}_{}", self.kind, self.category, self.index)
  }
}

/// Coarse workout type every workout ends up with, enriched or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutType {
  Easy,
  LongRun,
  Tempo,
  Intervals,
  Hills,
  Bike,
  Rest,
  RestOrCrossTrain,
  Unresolved,
}

impl WorkoutType {
  /// Tempo, intervals, and hills satisfy a quality-session day
  pub fn is_quality(&self) -> bool {
    matches!(self, WorkoutType::Tempo | WorkoutType::Intervals | WorkoutType::Hills)
  }
}

/// A day line recovered from plan text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedWorkout {
  #[serde(with = "day::name")]
  pub day: Weekday,
  /// Display text with reference markup removed
  pub text: String,
  pub reference: Option<WorkoutReference>,
  /// Type from keyword matching; only meaningful when there is no reference
  pub inferred_type: WorkoutType,
  /// First "<number> <unit>" in the text
  pub distance: Option<f64>,
  /// 1-based source line
  pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedWeek {
  pub week_number: u32,
  /// From the week header; 0 when the header carried no distance
  pub total_distance: f64,
  pub workouts: Vec<ParsedWorkout>,
}
