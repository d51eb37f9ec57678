//! Test utilities and fixtures
//!
//! - Sample runner profiles
//! - Synthetic plan text
//! - Catalog wrappers

use chrono::Weekday;
use serde_json::Value;
use std::cell::Cell;

use crate::catalog::{LibraryCatalog, WorkoutCatalog};
use crate::models::{PaceSet, RaceDistance, RaceGoal, RunnerProfile, WorkoutKind};
use crate::paces::PaceTable;

/// ---------------------------------------------------------------------------
/// Profiles and Paces
/// ---------------------------------------------------------------------------

/// 50:00 10K goal, miles, quality sessions on Tuesday and Thursday
pub fn sample_profile() -> RunnerProfile {
  let mut profile = RunnerProfile::new(RaceGoal {
    distance: RaceDistance::TenK,
    target_time: "50:00".parse().expect("valid goal time"),
    terrain: None,
  });
  profile.quality_days = vec![Weekday::Tue, Weekday::Thu];
  profile
}

/// Goal paces for `sample_profile` (threshold 8:29/mi)
pub fn goal_paces() -> PaceSet {
  let goal = sample_profile().goal;
  PaceTable::builtin()
    .and_then(|table| table.derive(goal.distance, goal.target_time))
    .expect("builtin table covers the sample goal")
}

/// ---------------------------------------------------------------------------
/// Plan Text
/// ---------------------------------------------------------------------------

const WEEK_TEMPLATE: [(&str, &str, f64); 7] = [
  ("Mon", "Rest", 0.0),
  ("Tue", "[tempo_THRESHOLD_0] Tempo run 6 miles", 6.0),
  ("Wed", "Easy 3 miles", 3.0),
  ("Thu", "[interval_VO2MAX_0] Track intervals 7 miles", 7.0),
  ("Fri", "Rest/XT", 0.0),
  ("Sat", "Easy 3 miles", 3.0),
  ("Sun", "[long_run_PROGRESSION_0] Long run 10 miles", 10.0),
];

fn week_block(number: u32, days: &[(&str, &str, f64)]) -> String {
  let total: f64 = days.iter().map(|(_, _, distance)| distance).sum();
  let mut block = format!("### Week {} - {} miles\n", number, total);
  for (day, text, _) in days {
    block.push_str(&format!("- {}: {}\n", day, text));
  }
  block.push('\n');
  block
}

/// Plan text whose week 1 holds only the last `partial_days` days of the
/// week, followed by `full_weeks` complete weeks numbered from 2
pub fn synthetic_plan_text(full_weeks: u32, partial_days: usize) -> String {
  let partial_days = partial_days.min(WEEK_TEMPLATE.len());
  let mut text = String::from("Here is your training plan.\n\n");
  text.push_str(&week_block(1, &WEEK_TEMPLATE[WEEK_TEMPLATE.len() - partial_days..]));
  for week in 0..full_weeks {
    text.push_str(&week_block(week + 2, &WEEK_TEMPLATE));
  }
  text
}

/// ---------------------------------------------------------------------------
/// Catalogs
/// ---------------------------------------------------------------------------

/// Builtin library that counts category lookups
pub struct CountingCatalog {
  inner: &'static LibraryCatalog,
  calls: Cell<usize>,
}

impl CountingCatalog {
  pub fn new() -> Self {
    Self {
      inner: LibraryCatalog::builtin().expect("builtin library parses"),
      calls: Cell::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.get()
  }
}

impl WorkoutCatalog for CountingCatalog {
  fn templates_by_category(&self, kind: WorkoutKind, category: &str) -> Option<Vec<Value>> {
    self.calls.set(self.calls.get() + 1);
    self.inner.templates_by_category(kind, category)
  }
}
