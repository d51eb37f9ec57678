use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::race::{format_clock, parse_clock, RaceTime, Units, METERS_PER_MILE};

/// ---------------------------------------------------------------------------
/// Pace
/// ---------------------------------------------------------------------------

/// Seconds per unit distance (or per rep, for track splits).
/// Kept fractional so interpolation and blending don't accumulate rounding.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pace(f64);

impl Pace {
  pub fn from_seconds(seconds: f64) -> Self {
    Self(seconds)
  }

  pub fn seconds(&self) -> f64 {
    self.0
  }

  /// Linear interpolation: `ratio` 0 gives `self`, 1 gives `other`
  pub fn lerp(&self, other: Pace, ratio: f64) -> Pace {
    Pace(self.0 + (other.0 - self.0) * ratio)
  }

  pub fn scaled(&self, factor: f64) -> Pace {
    Pace(self.0 * factor)
  }
}

impl std::fmt::Display for Pace {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", format_clock(self.0.round().max(0.0) as u32))
  }
}

impl std::str::FromStr for Pace {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_clock(s)
      .map(|secs| Self(secs as f64))
      .ok_or_else(|| format!("Invalid pace: {}", s))
  }
}

impl TryFrom<String> for Pace {
  type Error = String;
  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Pace> for String {
  fn from(value: Pace) -> Self {
    value.to_string()
  }
}

/// ---------------------------------------------------------------------------
/// Zones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceZone {
  Easy,
  Marathon,
  Threshold,
  Interval,
}

impl PaceZone {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaceZone::Easy => "easy",
      PaceZone::Marathon => "marathon",
      PaceZone::Threshold => "threshold",
      PaceZone::Interval => "interval",
    }
  }
}

/// One pace per zone; easy is a band (`easy_min` is the faster end)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePaces {
  pub easy_min: Pace,
  pub easy_max: Pace,
  pub marathon: Pace,
  pub threshold: Pace,
  pub interval: Pace,
}

impl ZonePaces {
  /// Combine two pace sets field by field
  pub fn zip_with(&self, other: &ZonePaces, f: impl Fn(Pace, Pace) -> Pace) -> ZonePaces {
    ZonePaces {
      easy_min: f(self.easy_min, other.easy_min),
      easy_max: f(self.easy_max, other.easy_max),
      marathon: f(self.marathon, other.marathon),
      threshold: f(self.threshold, other.threshold),
      interval: f(self.interval, other.interval),
    }
  }

  pub fn map(&self, f: impl Fn(Pace) -> Pace) -> ZonePaces {
    self.zip_with(self, |a, _| f(a))
  }

  /// Every zone value with its name, in table order
  pub fn fields(&self) -> [(&'static str, Pace); 5] {
    [
      ("easy_min", self.easy_min),
      ("easy_max", self.easy_max),
      ("marathon", self.marathon),
      ("threshold", self.threshold),
      ("interval", self.interval),
    ]
  }
}

/// Track rep distance ("400m", "1mi") to split time, per zone
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackIntervals {
  #[serde(default)]
  pub threshold: BTreeMap<String, Pace>,
  #[serde(default)]
  pub interval: BTreeMap<String, Pace>,
}

impl TrackIntervals {
  /// Combine splits present in both sets; splits only `other` has are taken as-is
  pub fn zip_with(&self, other: &TrackIntervals, f: impl Fn(Pace, Pace) -> Pace) -> TrackIntervals {
    let merge = |a: &BTreeMap<String, Pace>, b: &BTreeMap<String, Pace>| {
      b.iter()
        .map(|(dist, pace)| {
          let value = match a.get(dist) {
            Some(mine) => f(*mine, *pace),
            None => *pace,
          };
          (dist.clone(), value)
        })
        .collect::<BTreeMap<_, _>>()
    };
    TrackIntervals {
      threshold: merge(&self.threshold, &other.threshold),
      interval: merge(&self.interval, &other.interval),
    }
  }

  pub fn for_zone(&self, zone: PaceZone) -> Option<&BTreeMap<String, Pace>> {
    match zone {
      PaceZone::Threshold => Some(&self.threshold),
      PaceZone::Interval => Some(&self.interval),
      _ => None,
    }
  }
}

/// Parse a track distance label ("400m", "1mi", "1.5 km") into meters
pub fn track_distance_meters(label: &str) -> Option<f64> {
  let lower = label.trim().to_lowercase();
  let split = lower
    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
    .unwrap_or(lower.len());
  let (num, unit) = lower.split_at(split);
  let value: f64 = num.parse().ok()?;
  let meters = match unit.trim() {
    "m" | "meters" | "metres" => value,
    "mi" | "mile" | "miles" => value * METERS_PER_MILE,
    "k" | "km" => value * 1000.0,
    _ => return None,
  };
  Some(meters)
}

/// ---------------------------------------------------------------------------
/// Pace Set
/// ---------------------------------------------------------------------------

/// The two table rows an interpolated pace set was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationBounds {
  pub lower: RaceTime,
  pub upper: RaceTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceSet {
  pub paces: ZonePaces,
  pub track: TrackIntervals,
  #[serde(default)]
  pub units: Units,
  #[serde(default)]
  pub interpolated: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bounds: Option<InterpolationBounds>,
}

impl PaceSet {
  pub fn zone(&self, zone: PaceZone) -> Pace {
    match zone {
      PaceZone::Easy => self.paces.easy_min,
      PaceZone::Marathon => self.paces.marathon,
      PaceZone::Threshold => self.paces.threshold,
      PaceZone::Interval => self.paces.interval,
    }
  }

  /// Display text for a zone: "9:09/mi", or the band for easy
  pub fn zone_text(&self, zone: PaceZone) -> String {
    let unit = self.units.abbrev();
    match zone {
      PaceZone::Easy => format!("{}-{}/{}", self.paces.easy_min, self.paces.easy_max, unit),
      _ => format!("{}/{}", self.zone(zone), unit),
    }
  }

  /// Split time for a rep distance, from the track table or derived from zone pace
  pub fn split_for(&self, zone: PaceZone, rep: &str) -> Option<Pace> {
    if let Some(split) = self.track.for_zone(zone).and_then(|t| t.get(rep)) {
      return Some(*split);
    }
    let meters = track_distance_meters(rep)?;
    Some(self.zone(zone).scaled(meters / self.units.meters()))
  }

  /// Re-express zone paces per the given unit; track splits don't depend on units
  pub fn for_units(&self, units: Units) -> PaceSet {
    if units == self.units {
      return self.clone();
    }
    let factor = units.meters() / self.units.meters();
    PaceSet {
      paces: self.paces.map(|p| p.scaled(factor)),
      units,
      ..self.clone()
    }
  }
}
