//! Quality-day enforcement
//!
//! The generator does not always honor the runner's designated quality days.
//! After enrichment, any such day that does not hold a tempo, interval, or
//! hill session is overwritten with a small self-contained workout.

use chrono::Weekday;
use tracing::{info, warn};

use crate::catalog::{TemplateStructure, WorkoutTemplate};
use crate::config::RepairConfig;
use crate::models::{
  Diagnostic, DiagnosticKind, EnrichedWeek, EnrichedWorkout, Enrichment, PaceZone, Plan, RunnerProfile,
  WorkoutKind, WorkoutType,
};
use crate::prescribe::{format_distance, prescribe};

/// Kinds handed out to quality days, by the day's position in the profile
const QUALITY_ROTATION: [WorkoutKind; 3] = [WorkoutKind::Tempo, WorkoutKind::Interval, WorkoutKind::Hill];

/// Minimal workout used when a quality day has to be filled in
pub fn fallback_template(kind: WorkoutKind) -> WorkoutTemplate {
  let (id, name, description, structure) = match kind {
    WorkoutKind::Tempo | WorkoutKind::LongRun => (
      "repair_tempo",
      "Tempo Run",
      "Steady running at threshold effort.",
      TemplateStructure::Continuous { zone: PaceZone::Threshold },
    ),
    WorkoutKind::Interval => (
      "repair_intervals",
      "Interval Repeats",
      "800m repeats at interval effort with a 400m jog.",
      TemplateStructure::Repeats {
        rep: "800m".to_string(),
        zone: PaceZone::Interval,
        recovery: "400m jog".to_string(),
        min_reps: 4,
        max_reps: 6,
      },
    ),
    WorkoutKind::Hill => (
      "repair_hills",
      "Hill Repeats",
      "60 second climbs at interval effort. Jog back down.",
      TemplateStructure::Timed {
        rep_seconds: 60,
        zone: PaceZone::Interval,
        recovery: "jog down".to_string(),
        min_reps: 6,
        max_reps: 10,
        reps_per_unit: 2.0,
      },
    ),
  };

  WorkoutTemplate {
    id: id.to_string(),
    name: name.to_string(),
    description: description.to_string(),
    warmup: 1.0,
    cooldown: 1.0,
    structure,
  }
}

enum DayOutcome {
  Complies,
  Applied(Diagnostic),
  Skipped(Diagnostic),
}

/// Overwrite quality days that lack a qualifying workout.
/// Returns the number of days replaced.
pub fn fix_hard_day_violations(plan: &mut Plan, profile: &RunnerProfile, config: &RepairConfig) -> usize {
  let mut repaired = 0;
  let first_week = plan.weeks.iter().map(|w| w.week_number).min();

  for week in plan.weeks.iter_mut() {
    let partial = Some(week.week_number) == first_week;

    for (position, day) in profile.quality_days.iter().enumerate() {
      let kind = QUALITY_ROTATION[position % QUALITY_ROTATION.len()];
      match repair_day(week, *day, kind, partial, config) {
        DayOutcome::Complies => {}
        DayOutcome::Applied(diagnostic) => {
          repaired += 1;
          plan.diagnostics.push(diagnostic);
        }
        DayOutcome::Skipped(diagnostic) => plan.diagnostics.push(diagnostic),
      }
    }

    week.recompute_distance();
  }

  if repaired > 0 {
    info!(repaired, "Repaired quality-day violations");
  }
  repaired
}

fn repair_day(
  week: &mut EnrichedWeek,
  day: Weekday,
  kind: WorkoutKind,
  partial: bool,
  config: &RepairConfig,
) -> DayOutcome {
  let week_number = week.week_number;
  let skipped = |reason: &str| DiagnosticKind::RepairSkipped {
    week: week_number,
    day,
    reason: reason.to_string(),
  };

  let Some(slot) = week.workouts.iter().position(|w| w.day == day) else {
    // Plans often start mid-week; a missing day there is expected
    return DayOutcome::Skipped(if partial {
      Diagnostic::info(skipped("day not in this partial week"))
    } else {
      warn!(week = week_number, day = %day, "Quality day missing from week");
      Diagnostic::warning(skipped("day missing from week"))
    });
  };

  let current = &week.workouts[slot];
  if current.workout_type.is_quality() {
    return DayOutcome::Complies;
  }
  if config.protect_long_run && current.workout_type == WorkoutType::LongRun {
    warn!(week = week_number, day = %day, "Quality day holds the long run; not replaced");
    return DayOutcome::Skipped(Diagnostic::warning(skipped("day holds the week's long run")));
  }

  let target = current
    .distance
    .filter(|d| *d > 0.0)
    .unwrap_or_else(|| config.default_distance(week.paces.units));

  let prescription = match prescribe(kind, &fallback_template(kind), &week.paces, Some(target)) {
    Ok(prescription) => prescription,
    Err(e) => {
      warn!(week = week_number, day = %day, error = %e, "Could not build replacement workout");
      return DayOutcome::Skipped(Diagnostic::warning(skipped(&e.to_string())));
    }
  };

  let replaced = current.text.clone();
  info!(week = week_number, day = %day, kind = %kind, replaced = %replaced, "Replacing quality day");

  week.workouts[slot] = EnrichedWorkout {
    day,
    text: format!(
      "{} {} {}",
      prescription.name,
      format_distance(target),
      week.paces.units.abbrev()
    ),
    workout_type: kind.workout_type(),
    distance: Some(target),
    reference: None,
    prescription: Some(prescription),
    enrichment: Enrichment::Repaired,
  };

  DayOutcome::Applied(Diagnostic::info(DiagnosticKind::RepairApplied {
    week: week_number,
    day,
    replaced,
  }))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::LibraryCatalog;
  use crate::enrich::{Enricher, PlanPaces};
  use crate::models::Severity;
  use crate::paces::BlendCurve;
  use crate::parser::parse_plan;
  use crate::test_utils::{goal_paces, sample_profile, synthetic_plan_text};

  fn plan_from(text: &str) -> Plan {
    let library = LibraryCatalog::builtin().unwrap();
    let parsed = parse_plan(text, &sample_profile(), None);
    Enricher::new(library, PlanPaces::Static(goal_paces()), BlendCurve::default()).enrich(parsed)
  }

  fn repair_kinds(plan: &Plan) -> Vec<&DiagnosticKind> {
    plan
      .diagnostics
      .iter()
      .filter(|d| matches!(d.kind, DiagnosticKind::RepairApplied { .. } | DiagnosticKind::RepairSkipped { .. }))
      .map(|d| &d.kind)
      .collect()
  }

  #[test]
  fn test_easy_quality_day_replaced() {
    let mut plan = plan_from(
      "Week 1 - 20 miles\nMon: Rest\nTue: Easy 4 miles\nWed: Easy 3 miles\nThu: [interval_VO2MAX_0] Track 7 miles\nFri: Rest\nSat: Easy 3 miles\nSun: Long run 8 miles\n",
    );
    let repaired = fix_hard_day_violations(&mut plan, &sample_profile(), &RepairConfig::default());
    assert_eq!(repaired, 1);

    let week = &plan.weeks[0];
    let tue = week.workout_on(Weekday::Tue).unwrap();
    assert_eq!(tue.workout_type, WorkoutType::Tempo);
    assert_eq!(tue.enrichment, Enrichment::Repaired);
    assert_eq!(tue.distance, Some(4.0));
    assert_eq!(tue.text, "Tempo Run 4 mi");
    assert!(tue.prescription.as_ref().unwrap().summary.contains("8:29/mi"));

    // Thursday already complied
    assert!(week.workout_on(Weekday::Thu).unwrap().is_enriched());

    assert_eq!(
      repair_kinds(&plan),
      vec![&DiagnosticKind::RepairApplied {
        week: 1,
        day: Weekday::Tue,
        replaced: "Easy 4 miles".to_string(),
      }]
    );
    assert_eq!(week.computed_distance, 7.0 + 4.0 + 3.0 + 3.0 + 8.0);
  }

  #[test]
  fn test_rotation_across_quality_days() {
    let mut plan = plan_from("Week 1\nTue: Rest\nThu: Rest\nSat: Rest\n");
    let mut profile = sample_profile();
    profile.quality_days = vec![Weekday::Tue, Weekday::Thu, Weekday::Sat];

    assert_eq!(fix_hard_day_violations(&mut plan, &profile, &RepairConfig::default()), 3);
    let types: Vec<WorkoutType> = plan.weeks[0].workouts.iter().map(|w| w.workout_type).collect();
    assert_eq!(types, vec![WorkoutType::Tempo, WorkoutType::Intervals, WorkoutType::Hills]);
    // Rest days have no distance; the configured default applies
    assert_eq!(plan.weeks[0].workouts[0].distance, Some(5.0));
  }

  #[test]
  fn test_long_run_protected() {
    let mut plan = plan_from("Week 1\nTue: Long run 10 miles\nThu: [tempo_THRESHOLD_0] Tempo 6 miles\n");
    assert_eq!(fix_hard_day_violations(&mut plan, &sample_profile(), &RepairConfig::default()), 0);
    assert_eq!(plan.weeks[0].workouts[0].workout_type, WorkoutType::LongRun);
    let skipped = plan.diagnostics.last().unwrap();
    assert_eq!(skipped.severity, Severity::Warning);
    assert!(matches!(skipped.kind, DiagnosticKind::RepairSkipped { day: Weekday::Tue, .. }));

    let config = RepairConfig {
      protect_long_run: false,
      ..RepairConfig::default()
    };
    assert_eq!(fix_hard_day_violations(&mut plan, &sample_profile(), &config), 1);
    assert_eq!(plan.weeks[0].workouts[0].workout_type, WorkoutType::Tempo);
  }

  #[test]
  fn test_missing_day_severity_by_week() {
    // Week 1 is partial (Fri-Sun), week 2 omits Thursday
    let mut plan = plan_from(
      "Week 1\nFri: Rest\nSat: Easy 3 miles\nSun: Long run 6 miles\nWeek 2\nMon: Rest\nTue: [tempo_THRESHOLD_0] Tempo 5 miles\nSun: Long run 7 miles\n",
    );
    assert_eq!(fix_hard_day_violations(&mut plan, &sample_profile(), &RepairConfig::default()), 0);

    let skipped: Vec<&Diagnostic> = plan
      .diagnostics
      .iter()
      .filter(|d| matches!(d.kind, DiagnosticKind::RepairSkipped { .. }))
      .collect();
    assert_eq!(skipped.len(), 3);
    assert!(skipped[..2].iter().all(|d| d.severity == Severity::Info));
    assert_eq!(skipped[2].severity, Severity::Warning);
    assert!(matches!(skipped[2].kind, DiagnosticKind::RepairSkipped { week: 2, day: Weekday::Thu, .. }));
  }

  #[test]
  fn test_unresolved_reference_on_quality_day_repaired() {
    let mut plan = plan_from("Week 1\nTue: [tempo_NOPE_0] Tempo 6 miles\nThu: [hill_SHORT_HILLS_0] Hills 6 miles\n");
    assert_eq!(fix_hard_day_violations(&mut plan, &sample_profile(), &RepairConfig::default()), 1);
    let tue = plan.weeks[0].workout_on(Weekday::Tue).unwrap();
    assert_eq!(tue.enrichment, Enrichment::Repaired);
    assert_eq!(tue.distance, Some(6.0));
  }

  #[test]
  fn test_synthetic_full_weeks_all_comply_after_repair() {
    let mut plan = plan_from(&synthetic_plan_text(3, 7));
    fix_hard_day_violations(&mut plan, &sample_profile(), &RepairConfig::default());
    for week in &plan.weeks {
      for day in [Weekday::Tue, Weekday::Thu] {
        assert!(week.workout_on(day).unwrap().workout_type.is_quality(), "week {}", week.week_number);
      }
    }
  }
}
