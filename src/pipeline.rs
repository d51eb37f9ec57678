//! End-to-end plan compilation: parse, price, enrich, repair

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::WorkoutCatalog;
use crate::config::PipelineConfig;
use crate::enrich::{Enricher, PlanPaces};
use crate::models::{Diagnostic, DiagnosticKind, PaceSet, Plan, RunnerProfile};
use crate::paces::{PaceError, PaceTable, ProgressiveGoal};
use crate::parser::{parse_plan, ParsedPlan};
use crate::repair::fix_hard_day_violations;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum PlanError {
  #[error(transparent)]
  Pace(#[from] PaceError),
}

/// Current-fitness paces in the profile's units, from a recent race or,
/// failing that, the training-volume estimate
pub fn current_fitness_paces(table: &PaceTable, profile: &RunnerProfile) -> Result<Option<PaceSet>, PaceError> {
  let current = if let Some(race) = &profile.recent_race {
    table.derive(race.distance, race.time)?
  } else if let Some(fitness) = &profile.fitness {
    let estimate = table.estimate_race_time_from_fitness(
      profile.units.to_miles(fitness.long_run_distance),
      profile.units.to_miles(fitness.weekly_distance),
      profile.goal.distance,
    )?;
    info!(vdot = estimate.vdot, time = %estimate.time, "Estimated current fitness from training volume");
    table.derive(profile.goal.distance, estimate.time)?
  } else {
    return Ok(None);
  };
  Ok(Some(current.for_units(profile.units)))
}

fn plan_paces(
  table: &PaceTable,
  profile: &RunnerProfile,
  goal: PaceSet,
  parsed: &ParsedPlan,
  diagnostics: &mut Vec<Diagnostic>,
) -> PlanPaces {
  let total_weeks = profile
    .plan_weeks
    .or_else(|| parsed.weeks.iter().map(|w| w.week_number).max())
    .unwrap_or(1);

  match current_fitness_paces(table, profile) {
    Ok(Some(current)) => PlanPaces::Progressive(ProgressiveGoal { current, goal, total_weeks }),
    Ok(None) => PlanPaces::Static(goal),
    Err(e) => {
      warn!(error = %e, "Current fitness paces unavailable; using goal paces throughout");
      diagnostics.push(Diagnostic::warning(DiagnosticKind::CurrentFitnessUnavailable {
        reason: e.to_string(),
      }));
      PlanPaces::Static(goal)
    }
  }
}

/// Compile generated plan text into an enriched, repaired plan.
///
/// Fails only when the goal itself cannot be priced; everything else the
/// text gets wrong is tolerated and reported in `Plan::diagnostics`.
/// With `starting_week`, weeks before it are dropped so the result can be
/// spliced into an existing plan with `Plan::splice_regenerated`.
pub fn compile_plan<C: WorkoutCatalog + ?Sized>(
  raw_text: &str,
  profile: &RunnerProfile,
  catalog: &C,
  config: &PipelineConfig,
  starting_week: Option<u32>,
) -> Result<Plan, PlanError> {
  let table = PaceTable::builtin()?;
  let goal = table
    .derive(profile.goal.distance, profile.goal.target_time)?
    .for_units(profile.units);

  let mut parsed = parse_plan(raw_text, profile, starting_week);
  let mut diagnostics = std::mem::take(&mut parsed.diagnostics);
  let paces = plan_paces(table, profile, goal, &parsed, &mut diagnostics);
  parsed.diagnostics = diagnostics;

  let mut plan = Enricher::new(catalog, paces, config.blend).enrich(parsed);
  let repaired = fix_hard_day_violations(&mut plan, profile, &config.repair);

  info!(
    weeks = plan.weeks.len(),
    repaired,
    diagnostics = plan.diagnostics.len(),
    "Compiled plan"
  );
  Ok(plan)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
