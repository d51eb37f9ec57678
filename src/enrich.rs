//! Reference resolution and enrichment
//!
//! Hydrates every `kind_CATEGORY_index` reference in a parsed plan into a
//! concrete prescription using the week's paces. A reference that cannot be
//! resolved only affects its own workout: the literal text is kept and the
//! type falls back to keyword inference.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogReader, WorkoutCatalog};
use crate::models::{
  Diagnostic, DiagnosticKind, EnrichedWeek, EnrichedWorkout, Enrichment, PaceSet, ParsedWorkout, Plan,
  Prescription, WorkoutKind, WorkoutReference, WorkoutType,
};
use crate::paces::{BlendCurve, ProgressiveGoal};
use crate::parser::ParsedPlan;
use crate::prescribe::prescribe;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ResolveError {
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("A {kind} workout needs a target distance")]
  MissingDistance { kind: WorkoutKind },

  #[error("Unknown track distance: {0}")]
  UnknownTrackDistance(String),
}

/// ---------------------------------------------------------------------------
/// Plan Paces
/// ---------------------------------------------------------------------------

/// Where each week's paces come from
#[derive(Debug, Clone, PartialEq)]
pub enum PlanPaces {
  /// Goal paces for every week
  Static(PaceSet),
  /// Blend from current fitness toward the goal across the plan
  Progressive(ProgressiveGoal),
}

impl PlanPaces {
  pub fn goal(&self) -> &PaceSet {
    match self {
      PlanPaces::Static(set) => set,
      PlanPaces::Progressive(progressive) => &progressive.goal,
    }
  }

  pub fn for_week(&self, week_number: u32, curve: &BlendCurve) -> PaceSet {
    match self {
      PlanPaces::Static(set) => set.clone(),
      PlanPaces::Progressive(progressive) => progressive.for_week(week_number, curve),
    }
  }
}

/// Coarse type for a workout that has no resolved template.
/// Unclassified text with a distance is an easy run.
pub fn normalize_type(inferred: WorkoutType, distance: Option<f64>) -> WorkoutType {
  match (inferred, distance) {
    (WorkoutType::Unresolved, Some(_)) => WorkoutType::Easy,
    (other, _) => other,
  }
}

/// ---------------------------------------------------------------------------
/// Enricher
/// ---------------------------------------------------------------------------

pub struct Enricher<'a, C: WorkoutCatalog + ?Sized> {
  reader: CatalogReader<'a, C>,
  paces: PlanPaces,
  curve: BlendCurve,
}

impl<'a, C: WorkoutCatalog + ?Sized> Enricher<'a, C> {
  pub fn new(catalog: &'a C, paces: PlanPaces, curve: BlendCurve) -> Self {
    Self {
      reader: CatalogReader::new(catalog),
      paces,
      curve,
    }
  }

  /// Resolve one reference against the catalog and prescribe it
  pub fn resolve(
    &self,
    reference: &WorkoutReference,
    paces: &PaceSet,
    target: Option<f64>,
  ) -> Result<Prescription, ResolveError> {
    let template = self.reader.template(reference)?;
    prescribe(reference.kind, &template, paces, target)
  }

  pub fn enrich(&self, parsed: ParsedPlan) -> Plan {
    let mut diagnostics = parsed.diagnostics;
    let mut weeks = Vec::with_capacity(parsed.weeks.len());

    for week in parsed.weeks {
      let paces = self.paces.for_week(week.week_number, &self.curve);
      let workouts = week
        .workouts
        .into_iter()
        .map(|workout| self.enrich_workout(week.week_number, workout, &paces, &mut diagnostics))
        .collect();

      let mut enriched = EnrichedWeek {
        week_number: week.week_number,
        total_distance: week.total_distance,
        computed_distance: 0.0,
        paces,
        workouts,
      };
      enriched.recompute_distance();
      weeks.push(enriched);
    }

    let goal = self.paces.goal();
    Plan {
      weeks,
      paces: goal.clone(),
      track_intervals: goal.track.clone(),
      raw_text: parsed.full_text,
      pace_hints: parsed.pace_hints,
      diagnostics,
    }
  }

  fn enrich_workout(
    &self,
    week_number: u32,
    workout: ParsedWorkout,
    paces: &PaceSet,
    diagnostics: &mut Vec<Diagnostic>,
  ) -> EnrichedWorkout {
    let Some(reference) = workout.reference else {
      return EnrichedWorkout {
        day: workout.day,
        workout_type: normalize_type(workout.inferred_type, workout.distance),
        text: workout.text,
        distance: workout.distance,
        reference: None,
        prescription: None,
        enrichment: Enrichment::Literal,
      };
    };

    match self.resolve(&reference, paces, workout.distance) {
      Ok(prescription) => {
        debug!(week = week_number, reference = %reference, "Resolved workout reference");
        EnrichedWorkout {
          day: workout.day,
          text: workout.text,
          workout_type: reference.kind.workout_type(),
          distance: workout.distance.or(Some(prescription.distance)),
          reference: Some(reference),
          prescription: Some(prescription),
          enrichment: Enrichment::Enriched,
        }
      }
      Err(e) => {
        warn!(week = week_number, reference = %reference, error = %e, "Workout reference unresolved");
        diagnostics.push(
          Diagnostic::warning(DiagnosticKind::ReferenceUnresolved {
            week: week_number,
            day: workout.day,
            reference: reference.to_string(),
            reason: e.to_string(),
          })
          .at_line(workout.line),
        );
        EnrichedWorkout {
          day: workout.day,
          workout_type: normalize_type(workout.inferred_type, workout.distance),
          text: workout.text,
          distance: workout.distance,
          reference: Some(reference),
          prescription: None,
          enrichment: Enrichment::Unresolved { reason: e.to_string() },
        }
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
