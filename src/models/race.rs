//! Race goals, runner profile, and clock-time helpers

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::day;

/// ---------------------------------------------------------------------------
/// Race Distance
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RaceDistance {
  #[serde(rename = "5K")]
  FiveK,
  #[serde(rename = "10K")]
  TenK,
  #[serde(rename = "Half")]
  Half,
  #[serde(rename = "Marathon")]
  Marathon,
}

impl RaceDistance {
  pub const ALL: [RaceDistance; 4] = [
    RaceDistance::FiveK,
    RaceDistance::TenK,
    RaceDistance::Half,
    RaceDistance::Marathon,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      RaceDistance::FiveK => "5K",
      RaceDistance::TenK => "10K",
      RaceDistance::Half => "Half",
      RaceDistance::Marathon => "Marathon",
    }
  }

  pub fn meters(&self) -> f64 {
    match self {
      RaceDistance::FiveK => 5_000.0,
      RaceDistance::TenK => 10_000.0,
      RaceDistance::Half => 21_097.5,
      RaceDistance::Marathon => 42_195.0,
    }
  }
}

impl std::fmt::Display for RaceDistance {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for RaceDistance {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "5k" | "5km" => Ok(Self::FiveK),
      "10k" | "10km" => Ok(Self::TenK),
      "half" | "half marathon" | "hm" | "21k" => Ok(Self::Half),
      "marathon" | "full" | "full marathon" | "42k" => Ok(Self::Marathon),
      _ => Err(format!("Unknown race distance: {}", s)),
    }
  }
}

impl TryFrom<String> for RaceDistance {
  type Error = String;
  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// ---------------------------------------------------------------------------
/// Clock Times
/// ---------------------------------------------------------------------------

/// Parse `m:ss` or `h:mm:ss` into whole seconds
pub fn parse_clock(text: &str) -> Option<u32> {
  let parts: Vec<&str> = text.trim().split(':').collect();
  if parts.len() < 2 || parts.len() > 3 {
    return None;
  }
  let nums: Vec<u32> = parts
    .iter()
    .map(|p| p.trim().parse::<u32>().ok())
    .collect::<Option<Vec<_>>>()?;
  // Everything after the leading component is base-60
  if nums[1..].iter().any(|n| *n >= 60) {
    return None;
  }
  nums
    .iter()
    .try_fold(0u32, |acc, n| acc.checked_mul(60)?.checked_add(*n))
}

/// Format whole seconds as `m:ss`, or `h:mm:ss` once past the hour
pub fn format_clock(total_seconds: u32) -> String {
  let hours = total_seconds / 3600;
  let minutes = (total_seconds % 3600) / 60;
  let seconds = total_seconds % 60;
  if hours > 0 {
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
  } else {
    format!("{}:{:02}", minutes, seconds)
  }
}

/// A finishing time, carried as whole seconds and written as a clock string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RaceTime(u32);

impl RaceTime {
  pub fn from_seconds(seconds: u32) -> Self {
    Self(seconds)
  }

  pub fn seconds(&self) -> u32 {
    self.0
  }
}

impl std::fmt::Display for RaceTime {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", format_clock(self.0))
  }
}

impl std::str::FromStr for RaceTime {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_clock(s)
      .filter(|secs| *secs > 0)
      .map(Self)
      .ok_or_else(|| format!("Invalid race time: {}", s))
  }
}

impl TryFrom<String> for RaceTime {
  type Error = String;
  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<RaceTime> for String {
  fn from(value: RaceTime) -> Self {
    value.to_string()
  }
}

/// ---------------------------------------------------------------------------
/// Units
/// ---------------------------------------------------------------------------

pub const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
  #[default]
  #[serde(rename = "mi", alias = "miles", alias = "imperial")]
  Miles,
  #[serde(rename = "km", alias = "kilometers", alias = "metric")]
  Kilometers,
}

impl Units {
  pub fn abbrev(&self) -> &'static str {
    match self {
      Units::Miles => "mi",
      Units::Kilometers => "km",
    }
  }

  pub fn meters(&self) -> f64 {
    match self {
      Units::Miles => METERS_PER_MILE,
      Units::Kilometers => 1000.0,
    }
  }

  /// Convert a distance in these units to miles
  pub fn to_miles(&self, distance: f64) -> f64 {
    distance * self.meters() / METERS_PER_MILE
  }
}

impl std::str::FromStr for Units {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "mi" | "mile" | "miles" | "imperial" => Ok(Self::Miles),
      "km" | "kms" | "kilometers" | "kilometres" | "metric" => Ok(Self::Kilometers),
      _ => Err(format!("Unknown units: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Runner Profile
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceGoal {
  pub distance: RaceDistance,
  pub target_time: RaceTime,
  /// Course terrain tag ("flat", "hilly", ...), informational only
  #[serde(default)]
  pub terrain: Option<String>,
}

/// A recent race, used as the current-fitness anchor for progressive paces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
  pub distance: RaceDistance,
  pub time: RaceTime,
}

/// Training volume snapshot, in the profile's units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessSnapshot {
  pub long_run_distance: f64,
  pub weekly_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerProfile {
  pub goal: RaceGoal,

  #[serde(default)]
  pub recent_race: Option<RaceResult>,

  #[serde(default)]
  pub fitness: Option<FitnessSnapshot>,

  #[serde(default)]
  pub units: Units,

  /// Days that must carry a tempo, interval, or hill session
  #[serde(default, with = "day::names")]
  pub quality_days: Vec<Weekday>,

  /// Total plan length, when known up front
  #[serde(default)]
  pub plan_weeks: Option<u32>,
}

impl RunnerProfile {
  pub fn new(goal: RaceGoal) -> Self {
    Self {
      goal,
      recent_race: None,
      fitness: None,
      units: Units::default(),
      quality_days: Vec::new(),
      plan_weeks: None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
