pub mod day;
pub mod diagnostic;
pub mod pace;
pub mod plan;
pub mod race;
pub mod workout;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use pace::{InterpolationBounds, Pace, PaceSet, PaceZone, TrackIntervals, ZonePaces};
pub use plan::{EnrichedWeek, EnrichedWorkout, Enrichment, Plan, PrescribedSegment, Prescription};
pub use race::{FitnessSnapshot, RaceDistance, RaceGoal, RaceResult, RaceTime, RunnerProfile, Units};
pub use workout::{ParsedWeek, ParsedWorkout, WorkoutKind, WorkoutReference, WorkoutType};
