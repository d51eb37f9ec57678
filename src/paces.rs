//! Pace engine
//!
//! Turns a race goal into training paces using a VDOT-style reference table:
//! - exact table rows are returned as-is
//! - goals between rows are interpolated field by field (easy band,
//!   threshold and interval paces don't scale together across fitness levels)
//! - progressive plans blend a current-fitness set toward the goal set
//!   along a three-segment curve
//!
//! Table paces are per mile; `PaceSet::for_units` handles kilometers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::models::{
  InterpolationBounds, Pace, PaceSet, RaceDistance, RaceTime, TrackIntervals, Units, ZonePaces,
};

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum PaceError {
  #[error("Goal time {time} for {distance} is outside the supported range ({min} to {max})")]
  OutOfRange {
    distance: RaceDistance,
    time: RaceTime,
    min: RaceTime,
    max: RaceTime,
  },

  #[error("Unsupported race distance: {0}")]
  UnsupportedDistance(String),

  #[error("Invalid time: {0}")]
  InvalidTime(String),

  #[error("Pace table error: {0}")]
  Table(String),
}

/// ---------------------------------------------------------------------------
/// Reference Table
/// ---------------------------------------------------------------------------

const PACE_TABLE_JSON: &str = include_str!("../data/pace_table.json");

static BUILTIN_TABLE: LazyLock<Result<PaceTable, PaceError>> =
  LazyLock::new(|| PaceTable::from_json(PACE_TABLE_JSON));

#[derive(Debug, Clone, Deserialize)]
struct TableRow {
  time: RaceTime,
  vdot: f64,
  paces: ZonePaces,
  #[serde(default)]
  track: TrackIntervals,
}

impl TableRow {
  fn pace_set(&self) -> PaceSet {
    PaceSet {
      paces: self.paces.clone(),
      track: self.track.clone(),
      units: Units::Miles,
      interpolated: false,
      bounds: None,
    }
  }
}

/// Race-time to training-pace anchors, per distance, sorted by time
#[derive(Debug, Clone)]
pub struct PaceTable {
  rows: BTreeMap<RaceDistance, Vec<TableRow>>,
}

/// Fitness-based estimate of what the runner could race today
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessEstimate {
  pub vdot: f64,
  pub time: RaceTime,
}

/// Estimated VDOT is clamped to this band
const MIN_ESTIMATED_VDOT: f64 = 30.0;
const MAX_ESTIMATED_VDOT: f64 = 50.0;

/// Weekly mileage ceiling -> base VDOT
const WEEKLY_VOLUME_BUCKETS: [(f64, f64); 5] = [
  (15.0, 30.0),
  (25.0, 34.0),
  (35.0, 38.0),
  (45.0, 42.0),
  (55.0, 46.0),
];
const TOP_VOLUME_VDOT: f64 = 50.0;

impl PaceTable {
  pub fn from_json(json: &str) -> Result<Self, PaceError> {
    let raw: HashMap<RaceDistance, Vec<TableRow>> =
      serde_json::from_str(json).map_err(|e| PaceError::Table(e.to_string()))?;

    let rows = raw
      .into_iter()
      .map(|(distance, mut rows)| {
        rows.sort_by_key(|r| r.time);
        (distance, rows)
      })
      .collect();

    Ok(Self { rows })
  }

  /// Table shipped with the crate
  pub fn builtin() -> Result<&'static PaceTable, PaceError> {
    BUILTIN_TABLE.as_ref().map_err(Clone::clone)
  }

  fn rows_for(&self, distance: RaceDistance) -> Result<&[TableRow], PaceError> {
    self
      .rows
      .get(&distance)
      .filter(|rows| !rows.is_empty())
      .map(Vec::as_slice)
      .ok_or_else(|| PaceError::UnsupportedDistance(distance.to_string()))
  }

  /// Fastest and slowest supported goal times for a distance
  pub fn range(&self, distance: RaceDistance) -> Result<(RaceTime, RaceTime), PaceError> {
    let rows = self.rows_for(distance)?;
    Ok((rows[0].time, rows[rows.len() - 1].time))
  }

  /// Training paces for a single goal
  pub fn derive(&self, distance: RaceDistance, goal: RaceTime) -> Result<PaceSet, PaceError> {
    let rows = self.rows_for(distance)?;
    let (min, max) = self.range(distance)?;
    if goal < min || goal > max {
      return Err(PaceError::OutOfRange {
        distance,
        time: goal,
        min,
        max,
      });
    }

    if let Some(row) = rows.iter().find(|r| r.time == goal) {
      return Ok(row.pace_set());
    }

    // First row slower than the goal; the range check guarantees 1..len
    let upper_idx = rows.partition_point(|r| r.time < goal);
    let lower = &rows[upper_idx - 1];
    let upper = &rows[upper_idx];

    // Duplicate anchors: nothing to interpolate
    if lower.paces == upper.paces && lower.track == upper.track {
      return Ok(lower.pace_set());
    }

    let span = (upper.time.seconds() - lower.time.seconds()) as f64;
    let ratio = (goal.seconds() - lower.time.seconds()) as f64 / span;

    debug!(
      distance = %distance,
      goal = %goal,
      lower = %lower.time,
      upper = %upper.time,
      ratio,
      "Interpolating goal paces"
    );

    Ok(PaceSet {
      paces: lower.paces.zip_with(&upper.paces, |a, b| a.lerp(b, ratio)),
      track: lower.track.zip_with(&upper.track, |a, b| a.lerp(b, ratio)),
      units: Units::Miles,
      interpolated: true,
      bounds: Some(InterpolationBounds {
        lower: lower.time,
        upper: upper.time,
      }),
    })
  }

  /// Bucketed VDOT estimate from training volume, converted to a race time.
  /// An approximation for runners without a recent race, not a measurement.
  pub fn estimate_race_time_from_fitness(
    &self,
    long_run_miles: f64,
    weekly_miles: f64,
    distance: RaceDistance,
  ) -> Result<FitnessEstimate, PaceError> {
    let vdot = estimate_vdot(long_run_miles, weekly_miles);
    let time = self.time_for_vdot(distance, vdot)?;
    Ok(FitnessEstimate { vdot, time })
  }

  /// Race time for a VDOT, interpolated between table rows and clamped to the table
  fn time_for_vdot(&self, distance: RaceDistance, vdot: f64) -> Result<RaceTime, PaceError> {
    let rows = self.rows_for(distance)?;

    // Rows run fastest (highest VDOT) to slowest
    let fastest = &rows[0];
    let slowest = &rows[rows.len() - 1];
    if vdot >= fastest.vdot {
      return Ok(fastest.time);
    }
    if vdot <= slowest.vdot {
      return Ok(slowest.time);
    }

    let pair = rows
      .windows(2)
      .find(|w| vdot <= w[0].vdot && vdot >= w[1].vdot)
      .ok_or_else(|| PaceError::Table(format!("VDOT {:.1} not bracketed for {}", vdot, distance)))?;

    let (fast, slow) = (&pair[0], &pair[1]);
    let ratio = if fast.vdot == slow.vdot {
      0.0
    } else {
      (fast.vdot - vdot) / (fast.vdot - slow.vdot)
    };
    let seconds = fast.time.seconds() as f64
      + (slow.time.seconds() as f64 - fast.time.seconds() as f64) * ratio;

    Ok(RaceTime::from_seconds(seconds.round() as u32))
  }
}

fn estimate_vdot(long_run_miles: f64, weekly_miles: f64) -> f64 {
  let base = WEEKLY_VOLUME_BUCKETS
    .iter()
    .find(|(ceiling, _)| weekly_miles < *ceiling)
    .map(|(_, vdot)| *vdot)
    .unwrap_or(TOP_VOLUME_VDOT);

  let long_run_adjustment = if long_run_miles < 6.0 {
    -2.0
  } else if long_run_miles >= 14.0 {
    2.0
  } else if long_run_miles >= 10.0 {
    1.0
  } else {
    0.0
  };

  (base + long_run_adjustment).clamp(MIN_ESTIMATED_VDOT, MAX_ESTIMATED_VDOT)
}

/// Paces for a goal given as loose text, e.g. ("10K", "52:30")
pub fn derive_single_goal_paces(distance: &str, goal_time: &str) -> Result<PaceSet, PaceError> {
  let distance: RaceDistance = distance
    .parse()
    .map_err(|_| PaceError::UnsupportedDistance(distance.to_string()))?;
  let goal: RaceTime = goal_time
    .parse()
    .map_err(|_| PaceError::InvalidTime(goal_time.to_string()))?;
  PaceTable::builtin()?.derive(distance, goal)
}

/// ---------------------------------------------------------------------------
/// Progressive Blending
/// ---------------------------------------------------------------------------

/// Maps linear plan progress onto a slow-fast-slow curve.
/// The offsets of the middle and late segments follow from the breakpoints
/// and slopes so the curve is continuous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendCurve {
  pub early_breakpoint: f64,
  pub late_breakpoint: f64,
  pub early_slope: f64,
  pub middle_slope: f64,
  pub late_slope: f64,
}

impl Default for BlendCurve {
  fn default() -> Self {
    Self {
      early_breakpoint: 0.3,
      late_breakpoint: 0.7,
      early_slope: 0.5,
      middle_slope: 1.5,
      late_slope: 0.833,
    }
  }
}

impl BlendCurve {
  pub fn curved_ratio(&self, raw: f64) -> f64 {
    if raw <= 0.0 {
      return 0.0;
    }
    // Final week is exactly the goal, whatever the late slope rounds to
    if raw >= 1.0 {
      return 1.0;
    }

    let middle_start = self.early_breakpoint * self.early_slope;
    let late_start = middle_start + (self.late_breakpoint - self.early_breakpoint) * self.middle_slope;

    let curved = if raw < self.early_breakpoint {
      raw * self.early_slope
    } else if raw < self.late_breakpoint {
      middle_start + (raw - self.early_breakpoint) * self.middle_slope
    } else {
      late_start + (raw - self.late_breakpoint) * self.late_slope
    };

    curved.clamp(0.0, 1.0)
  }
}

/// Week-specific paces between current fitness and goal
pub fn blend(
  current: &PaceSet,
  goal: &PaceSet,
  week_number: u32,
  total_weeks: u32,
  curve: &BlendCurve,
) -> PaceSet {
  let raw = if total_weeks <= 1 {
    1.0
  } else {
    (week_number.saturating_sub(1) as f64 / (total_weeks - 1) as f64).clamp(0.0, 1.0)
  };
  let ratio = curve.curved_ratio(raw);
  let goal = goal.for_units(current.units);

  let step = |cur: Pace, target: Pace| {
    if ratio >= 1.0 {
      return target;
    }
    Pace::from_seconds(cur.seconds() - (cur.seconds() - target.seconds()) * ratio)
  };

  PaceSet {
    paces: current.paces.zip_with(&goal.paces, step),
    track: current.track.zip_with(&goal.track, step),
    units: current.units,
    interpolated: false,
    bounds: None,
  }
}

/// Current-fitness and goal paces across a plan of known length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveGoal {
  pub current: PaceSet,
  pub goal: PaceSet,
  pub total_weeks: u32,
}

impl ProgressiveGoal {
  pub fn for_week(&self, week_number: u32, curve: &BlendCurve) -> PaceSet {
    blend(&self.current, &self.goal, week_number, self.total_weeks, curve)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
