//! Turn a generic library template into concrete numbers for one runner-week

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::catalog::{TemplateStructure, WorkoutTemplate};
use crate::enrich::ResolveError;
use crate::models::pace::track_distance_meters;
use crate::models::{PaceSet, PaceZone, PrescribedSegment, Prescription, WorkoutKind};

/// Effort phrases in template text that stand in for a zone pace
static EFFORT_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(?:at\s+)?(threshold|tempo|interval|5k|marathon|easy|conversational)\s+effort\b")
    .expect("effort placeholder pattern")
});

/// Smallest main set prescribed when the target barely covers warmup and cooldown
const MIN_MAIN_DISTANCE: f64 = 1.0;

fn placeholder_zone(word: &str) -> PaceZone {
  match word.to_lowercase().as_str() {
    "threshold" | "tempo" => PaceZone::Threshold,
    "interval" | "5k" => PaceZone::Interval,
    "marathon" => PaceZone::Marathon,
    _ => PaceZone::Easy,
  }
}

/// Replace effort phrases with numeric pace text, e.g. "threshold effort" -> "@ 8:29/mi"
pub fn substitute_pace_placeholders(text: &str, paces: &PaceSet) -> String {
  EFFORT_PLACEHOLDER
    .replace_all(text, |caps: &Captures| {
      format!("@ {}", paces.zone_text(placeholder_zone(&caps[1])))
    })
    .into_owned()
}

/// Distance for display: one decimal, no trailing ".0"
pub fn format_distance(distance: f64) -> String {
  let rounded = (distance * 10.0).round() / 10.0;
  if rounded.fract() == 0.0 {
    format!("{}", rounded as i64)
  } else {
    format!("{:.1}", rounded)
  }
}

fn format_duration(seconds: u32) -> String {
  if seconds >= 120 && seconds % 60 == 0 {
    format!("{} min", seconds / 60)
  } else {
    format!("{}s", seconds)
  }
}

fn round_tenth(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

fn round_half(value: f64) -> f64 {
  (value * 2.0).round() / 2.0
}

/// Recovery distance in meters when the recovery text leads with one ("400m jog")
fn recovery_meters(recovery: &str) -> f64 {
  recovery
    .split_whitespace()
    .next()
    .and_then(track_distance_meters)
    .unwrap_or(0.0)
}

struct Frame {
  warmup: f64,
  cooldown: f64,
  main: Option<f64>,
}

impl Frame {
  fn parts(&self, unit: &str, main_parts: Vec<String>) -> String {
    let mut parts = Vec::new();
    if self.warmup > 0.0 {
      parts.push(format!("{} {} warmup", format_distance(self.warmup), unit));
    }
    parts.extend(main_parts);
    if self.cooldown > 0.0 {
      parts.push(format!("{} {} cooldown", format_distance(self.cooldown), unit));
    }
    parts.join(", ")
  }
}

/// Compute the concrete prescription for a template.
///
/// `target` is the day's total distance in the pace set's units. Tempo and
/// long-run workouts need it; interval and hill workouts fall back to the
/// template's minimum repetitions without it.
pub fn prescribe(
  kind: WorkoutKind,
  template: &WorkoutTemplate,
  paces: &PaceSet,
  target: Option<f64>,
) -> Result<Prescription, ResolveError> {
  let target = target.filter(|t| *t > 0.0);
  if target.is_none() && matches!(kind, WorkoutKind::Tempo | WorkoutKind::LongRun) {
    return Err(ResolveError::MissingDistance { kind });
  }

  let frame = Frame {
    warmup: template.warmup,
    cooldown: template.cooldown,
    main: target.map(|t| (t - template.warmup - template.cooldown).max(MIN_MAIN_DISTANCE)),
  };
  let unit = paces.units.abbrev();

  let mut prescription = Prescription {
    template_id: template.id.clone(),
    name: template.name.clone(),
    distance: 0.0,
    summary: String::new(),
    details: substitute_pace_placeholders(&template.description, paces),
    reps: None,
    rep_distance: None,
    rep_seconds: None,
    segments: Vec::new(),
  };

  let main_distance = match &template.structure {
    TemplateStructure::Continuous { zone } => {
      let main = frame.main.ok_or(ResolveError::MissingDistance { kind })?;
      prescription.summary = frame.parts(
        unit,
        vec![format!("{} {} @ {}", format_distance(main), unit, paces.zone_text(*zone))],
      );
      main
    }

    TemplateStructure::Repeats { rep, zone, recovery, min_reps, max_reps } => {
      let rep_meters =
        track_distance_meters(rep).ok_or_else(|| ResolveError::UnknownTrackDistance(rep.clone()))?;
      let split = paces
        .split_for(*zone, rep)
        .ok_or_else(|| ResolveError::UnknownTrackDistance(rep.clone()))?;

      let per_rep = (rep_meters + recovery_meters(recovery)) / paces.units.meters();
      let reps = match frame.main {
        Some(main) => ((main / per_rep).floor() as u32).clamp(*min_reps, *max_reps),
        None => *min_reps,
      };

      let mut set = format!("{} x {} @ {}", reps, rep, split);
      if !recovery.is_empty() {
        set.push_str(&format!(" w/ {}", recovery));
      }
      prescription.summary = frame.parts(unit, vec![set]);
      prescription.reps = Some(reps);
      prescription.rep_distance = Some(rep.clone());
      reps as f64 * per_rep
    }

    TemplateStructure::Segments { segments } => {
      let main = frame.main.ok_or(ResolveError::MissingDistance { kind })?;
      let total_fraction: f64 = segments.iter().map(|s| s.fraction).sum();

      // Every segment but the last rounds to the half unit; the last takes the remainder
      let mut assigned = 0.0;
      let mut prescribed = Vec::with_capacity(segments.len());
      for (i, segment) in segments.iter().enumerate() {
        let distance = if i + 1 == segments.len() {
          round_tenth((main - assigned).max(0.0))
        } else {
          round_half(main * segment.fraction / total_fraction).min((main - assigned).max(0.0))
        };
        assigned += distance;
        if distance > 0.0 {
          prescribed.push(PrescribedSegment {
            label: segment.label.clone(),
            distance,
            pace: paces.zone_text(segment.zone),
          });
        }
      }

      let parts = prescribed
        .iter()
        .map(|s| format!("{} {} {} @ {}", format_distance(s.distance), unit, s.label, s.pace))
        .collect();
      prescription.summary = frame.parts(unit, parts);
      prescription.segments = prescribed;
      main
    }

    TemplateStructure::Timed {
      rep_seconds,
      zone,
      recovery,
      min_reps,
      max_reps,
      reps_per_unit,
    } => {
      let reps = match frame.main {
        Some(main) => ((main * reps_per_unit).round() as u32).clamp(*min_reps, *max_reps),
        None => *min_reps,
      };

      let mut set = format!(
        "{} x {} uphill @ {} effort",
        reps,
        format_duration(*rep_seconds),
        paces.zone_text(*zone)
      );
      if !recovery.is_empty() {
        set.push_str(&format!(", {}", recovery));
      }
      prescription.summary = frame.parts(unit, vec![set]);
      prescription.reps = Some(reps);
      prescription.rep_seconds = Some(*rep_seconds);
      frame.main.unwrap_or(reps as f64 / reps_per_unit)
    }
  };

  prescription.distance = round_tenth(frame.warmup + main_distance + frame.cooldown);
  Ok(prescription)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
