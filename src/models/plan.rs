use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::day;
use super::diagnostic::Diagnostic;
use super::pace::{PaceSet, TrackIntervals};
use super::workout::{WorkoutReference, WorkoutType};

/// A block of a prescribed workout at one pace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedSegment {
  pub label: String,
  pub distance: f64,
  pub pace: String,
}

/// Concrete numbers computed from a library template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
  pub template_id: String,
  pub name: String,
  /// Total distance including warmup and cooldown
  pub distance: f64,
  /// One-line prescription, e.g. "1 mi warmup, 6 x 800m @ 3:46 w/ 400m jog, 1 mi cooldown"
  pub summary: String,
  /// Template description with pace placeholders filled in
  pub details: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reps: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rep_distance: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rep_seconds: Option<u32>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub segments: Vec<PrescribedSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enrichment {
  /// Reference resolved against the library
  Enriched,
  /// Reference present but could not be resolved
  Unresolved { reason: String },
  /// No reference; literal text kept
  Literal,
  /// Replaced by the quality-day repair pass
  Repaired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedWorkout {
  #[serde(with = "day::name")]
  pub day: Weekday,
  pub text: String,
  #[serde(rename = "type")]
  pub workout_type: WorkoutType,
  pub distance: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reference: Option<WorkoutReference>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prescription: Option<Prescription>,
  #[serde(flatten)]
  pub enrichment: Enrichment,
}

impl EnrichedWorkout {
  pub fn is_enriched(&self) -> bool {
    self.enrichment == Enrichment::Enriched
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedWeek {
  pub week_number: u32,
  /// Weekly target from the plan text (0 when undetermined)
  pub total_distance: f64,
  /// Sum of workout distances that could be determined
  pub computed_distance: f64,
  /// Paces this week was prescribed with
  pub paces: PaceSet,
  pub workouts: Vec<EnrichedWorkout>,
}

impl EnrichedWeek {
  pub fn workout_on(&self, day: Weekday) -> Option<&EnrichedWorkout> {
    self.workouts.iter().find(|w| w.day == day)
  }

  pub fn recompute_distance(&mut self) {
    self.computed_distance = self.workouts.iter().filter_map(|w| w.distance).sum();
  }
}

/// Final compiled plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
  pub weeks: Vec<EnrichedWeek>,
  /// Goal paces
  pub paces: PaceSet,
  pub track_intervals: TrackIntervals,
  pub raw_text: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub pace_hints: Vec<String>,
  #[serde(default)]
  pub diagnostics: Vec<Diagnostic>,
}

impl Plan {
  pub fn week(&self, number: u32) -> Option<&EnrichedWeek> {
    self.weeks.iter().find(|w| w.week_number == number)
  }

  /// Replace weeks from `starting_week` on with a partial regeneration.
  /// Earlier weeks stay untouched; the regenerated weeks keep their numbers.
  pub fn splice_regenerated(&mut self, regenerated: Plan, starting_week: u32) {
    self.weeks.retain(|w| w.week_number < starting_week);
    self
      .weeks
      .extend(regenerated.weeks.into_iter().filter(|w| w.week_number >= starting_week));
    self.weeks.sort_by_key(|w| w.week_number);
    self.diagnostics.extend(regenerated.diagnostics);
    self.pace_hints.extend(regenerated.pace_hints);
  }
}
