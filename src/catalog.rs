//! Workout library boundary
//!
//! The library is an external, read-only collaborator queried by
//! (kind, category). Its objects come in two shapes (flat, or nested under
//! `workout`); `CatalogReader` normalizes them into `WorkoutTemplate` on
//! retrieval and memoizes per category so positional indexes stay stable for
//! the whole enrichment pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::models::{PaceZone, WorkoutKind, WorkoutReference};

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum CatalogError {
  #[error("No {kind} templates in category {category}")]
  UnknownCategory { kind: WorkoutKind, category: String },

  #[error("Template index out of range for {reference} ({len} available)")]
  IndexOutOfRange { reference: String, len: usize },

  #[error("Malformed template {reference}: {reason}")]
  Malformed { reference: String, reason: String },

  #[error("Workout library error: {0}")]
  Library(String),
}

/// ---------------------------------------------------------------------------
/// Canonical Template
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSegment {
  pub label: String,
  pub fraction: f64,
  pub zone: PaceZone,
}

fn default_reps_per_unit() -> f64 {
  2.0
}

/// Generic workout structure; paces are zones, not numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateStructure {
  /// One continuous block at a zone
  Continuous { zone: PaceZone },
  /// Track-style reps of a fixed distance
  Repeats {
    rep: String,
    zone: PaceZone,
    #[serde(default)]
    recovery: String,
    min_reps: u32,
    max_reps: u32,
  },
  /// Fractions of the total distance at different zones
  Segments { segments: Vec<TemplateSegment> },
  /// Reps of a fixed duration (hills)
  Timed {
    rep_seconds: u32,
    zone: PaceZone,
    #[serde(default)]
    recovery: String,
    min_reps: u32,
    max_reps: u32,
    #[serde(default = "default_reps_per_unit")]
    reps_per_unit: f64,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
  pub id: String,
  pub name: String,
  /// Free text; may contain effort placeholders like "threshold effort"
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub warmup: f64,
  #[serde(default)]
  pub cooldown: f64,
  pub structure: TemplateStructure,
}

/// Template fields as authored
#[derive(Debug, Deserialize)]
struct TemplateBody {
  #[serde(default)]
  id: Option<String>,
  name: String,
  #[serde(default)]
  description: String,
  #[serde(default)]
  warmup: f64,
  #[serde(default)]
  cooldown: f64,
  structure: TemplateStructure,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTemplate {
  Nested {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    workout: TemplateBody,
  },
  Flat(TemplateBody),
}

/// Normalize one library object into the canonical shape
pub fn normalize_template(raw: &Value, fallback_id: &str) -> Result<WorkoutTemplate, String> {
  let raw: RawTemplate = serde_json::from_value(raw.clone()).map_err(|e| e.to_string())?;

  let (outer_id, outer_name, body) = match raw {
    RawTemplate::Nested { id, name, workout } => (id, name, workout),
    RawTemplate::Flat(body) => (None, None, body),
  };

  let template = WorkoutTemplate {
    id: outer_id
      .or(body.id)
      .unwrap_or_else(|| fallback_id.to_string()),
    name: outer_name.unwrap_or(body.name),
    description: body.description,
    warmup: body.warmup.max(0.0),
    cooldown: body.cooldown.max(0.0),
    structure: body.structure,
  };

  validate_structure(&template.structure)?;
  Ok(template)
}

fn validate_structure(structure: &TemplateStructure) -> Result<(), String> {
  match structure {
    TemplateStructure::Repeats { min_reps, max_reps, .. } => check_rep_range(*min_reps, *max_reps)?,
    TemplateStructure::Timed {
      min_reps,
      max_reps,
      reps_per_unit,
      ..
    } => {
      check_rep_range(*min_reps, *max_reps)?;
      if !(reps_per_unit.is_finite() && *reps_per_unit > 0.0) {
        return Err(format!("reps_per_unit must be positive, got {}", reps_per_unit));
      }
    }
    TemplateStructure::Segments { segments } => {
      let total: f64 = segments.iter().map(|s| s.fraction).sum();
      if segments.is_empty() || total <= 0.0 || segments.iter().any(|s| s.fraction < 0.0) {
        return Err("segment fractions must be non-negative and sum above zero".to_string());
      }
    }
    TemplateStructure::Continuous { .. } => {}
  }
  Ok(())
}

fn check_rep_range(min_reps: u32, max_reps: u32) -> Result<(), String> {
  if min_reps == 0 || min_reps > max_reps {
    return Err(format!("invalid rep range {}..{}", min_reps, max_reps));
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Catalog Interface
/// ---------------------------------------------------------------------------

/// Read-only workout library
pub trait WorkoutCatalog {
  /// Library objects under (kind, category), in a stable order.
  /// None when the category does not exist.
  fn templates_by_category(&self, kind: WorkoutKind, category: &str) -> Option<Vec<Value>>;
}

/// Library backed by a JSON document: `{kind: {CATEGORY: [template, ...]}}`
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
  entries: HashMap<WorkoutKind, HashMap<String, Vec<Value>>>,
}

const WORKOUT_LIBRARY_JSON: &str = include_str!("../data/workout_library.json");

static BUILTIN_LIBRARY: LazyLock<Result<LibraryCatalog, CatalogError>> =
  LazyLock::new(|| LibraryCatalog::from_json(WORKOUT_LIBRARY_JSON));

impl LibraryCatalog {
  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let raw: HashMap<WorkoutKind, HashMap<String, Vec<Value>>> =
      serde_json::from_str(json).map_err(|e| CatalogError::Library(e.to_string()))?;

    // Categories match case-insensitively
    let entries = raw
      .into_iter()
      .map(|(kind, categories)| {
        let categories = categories
          .into_iter()
          .map(|(name, templates)| (name.to_uppercase(), templates))
          .collect();
        (kind, categories)
      })
      .collect();

    Ok(Self { entries })
  }

  /// Library shipped with the crate
  pub fn builtin() -> Result<&'static LibraryCatalog, CatalogError> {
    BUILTIN_LIBRARY.as_ref().map_err(Clone::clone)
  }

  pub fn categories(&self, kind: WorkoutKind) -> Vec<String> {
    let mut names: Vec<String> = self
      .entries
      .get(&kind)
      .map(|c| c.keys().cloned().collect())
      .unwrap_or_default();
    names.sort();
    names
  }
}

impl WorkoutCatalog for LibraryCatalog {
  fn templates_by_category(&self, kind: WorkoutKind, category: &str) -> Option<Vec<Value>> {
    self
      .entries
      .get(&kind)
      .and_then(|c| c.get(&category.to_uppercase()))
      .cloned()
  }
}

/// ---------------------------------------------------------------------------
/// Memoizing Reader
/// ---------------------------------------------------------------------------

type CategoryTemplates = Rc<Vec<Result<WorkoutTemplate, String>>>;

/// Normalizing, memoizing view over a catalog. Scoped to one plan.
pub struct CatalogReader<'a, C: WorkoutCatalog + ?Sized> {
  catalog: &'a C,
  cache: RefCell<HashMap<(WorkoutKind, String), CategoryTemplates>>,
}

impl<'a, C: WorkoutCatalog + ?Sized> CatalogReader<'a, C> {
  pub fn new(catalog: &'a C) -> Self {
    Self {
      catalog,
      cache: RefCell::new(HashMap::new()),
    }
  }

  fn category(&self, kind: WorkoutKind, category: &str) -> Result<CategoryTemplates, CatalogError> {
    let key = (kind, category.to_uppercase());
    if let Some(cached) = self.cache.borrow().get(&key) {
      return Ok(Rc::clone(cached));
    }

    let raw = self
      .catalog
      .templates_by_category(kind, category)
      .ok_or_else(|| CatalogError::UnknownCategory {
        kind,
        category: category.to_string(),
      })?;

    debug!(kind = %kind, category, count = raw.len(), "Loaded template category");

    let templates: CategoryTemplates = Rc::new(
      raw
        .iter()
        .enumerate()
        .map(|(index, value)| {
          normalize_template(value, &format!("{}_{}_{}", kind, key.1, index))
        })
        .collect(),
    );

    self.cache.borrow_mut().insert(key, Rc::clone(&templates));
    Ok(templates)
  }

  /// Resolve a reference to its canonical template
  pub fn template(&self, reference: &WorkoutReference) -> Result<WorkoutTemplate, CatalogError> {
    let templates = self.category(reference.kind, &reference.category)?;
    match templates.get(reference.index) {
      Some(Ok(template)) => Ok(template.clone()),
      Some(Err(reason)) => Err(CatalogError::Malformed {
        reference: reference.to_string(),
        reason: reason.clone(),
      }),
      None => Err(CatalogError::IndexOutOfRange {
        reference: reference.to_string(),
        len: templates.len(),
      }),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
