use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Info,
  Warning,
}

/// Something a pipeline stage tolerated, skipped, or changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
  /// A week header repeated an earlier week number
  DuplicateWeek { week: u32 },
  /// Regeneration mode: week numbered below the starting week
  WeekBeforeStart { week: u32, starting_week: u32 },
  /// Week header numbered below 1; its day lines are dropped
  InvalidWeekNumber { week: u32 },
  /// Line starts with a day name but could not be read as a workout
  UnparsedDayLine { text: String },
  /// Day line seen before any week header
  OrphanWorkout {
    #[serde(with = "day::name")]
    day: Weekday,
  },
  PaceHintCaptured { text: String },
  /// Goal paces could not be computed; pace hints are the only pace data
  PacesUnavailable { reason: String },
  /// No usable current-fitness anchor; every week gets goal paces
  CurrentFitnessUnavailable { reason: String },
  ReferenceUnresolved {
    week: u32,
    #[serde(with = "day::name")]
    day: Weekday,
    reference: String,
    reason: String,
  },
  RepairApplied {
    week: u32,
    #[serde(with = "day::name")]
    day: Weekday,
    replaced: String,
  },
  RepairSkipped {
    week: u32,
    #[serde(with = "day::name")]
    day: Weekday,
    reason: String,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub severity: Severity,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub line: Option<usize>,
  #[serde(flatten)]
  pub kind: DiagnosticKind,
}

impl Diagnostic {
  pub fn info(kind: DiagnosticKind) -> Self {
    Self { severity: Severity::Info, line: None, kind }
  }

  pub fn warning(kind: DiagnosticKind) -> Self {
    Self { severity: Severity::Warning, line: None, kind }
  }

  pub fn at_line(mut self, line: usize) -> Self {
    self.line = Some(line);
    self
  }
}
