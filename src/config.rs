//! Pipeline configuration from environment variables

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::models::Units;
use crate::paces::BlendCurve;

/// ---------------------------------------------------------------------------
/// Configuration Keys
/// ---------------------------------------------------------------------------

const EARLY_BREAKPOINT_KEY: &str = "PLAN_BLEND_EARLY_BREAKPOINT";
const LATE_BREAKPOINT_KEY: &str = "PLAN_BLEND_LATE_BREAKPOINT";
const EARLY_SLOPE_KEY: &str = "PLAN_BLEND_EARLY_SLOPE";
const MIDDLE_SLOPE_KEY: &str = "PLAN_BLEND_MIDDLE_SLOPE";
const LATE_SLOPE_KEY: &str = "PLAN_BLEND_LATE_SLOPE";
const REPAIR_DISTANCE_MI_KEY: &str = "PLAN_REPAIR_DISTANCE_MI";
const REPAIR_DISTANCE_KM_KEY: &str = "PLAN_REPAIR_DISTANCE_KM";
const PROTECT_LONG_RUN_KEY: &str = "PLAN_PROTECT_LONG_RUN";

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

/// Settings for the quality-day repair pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
  /// Default distance of a synthesized workout for mile-based plans
  pub distance_mi: f64,
  /// Default distance of a synthesized workout for kilometer-based plans
  pub distance_km: f64,
  /// Never overwrite the week's long run
  pub protect_long_run: bool,
}

impl Default for RepairConfig {
  fn default() -> Self {
    Self {
      distance_mi: 5.0,
      distance_km: 8.0,
      protect_long_run: true,
    }
  }
}

impl RepairConfig {
  pub fn default_distance(&self, units: Units) -> f64 {
    match units {
      Units::Miles => self.distance_mi,
      Units::Kilometers => self.distance_km,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
  pub blend: BlendCurve,
  pub repair: RepairConfig,
}

impl PipelineConfig {
  /// Read overrides from the environment; unset keys keep their defaults
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let blend = BlendCurve {
      early_breakpoint: read_var(EARLY_BREAKPOINT_KEY, defaults.blend.early_breakpoint)?,
      late_breakpoint: read_var(LATE_BREAKPOINT_KEY, defaults.blend.late_breakpoint)?,
      early_slope: read_var(EARLY_SLOPE_KEY, defaults.blend.early_slope)?,
      middle_slope: read_var(MIDDLE_SLOPE_KEY, defaults.blend.middle_slope)?,
      late_slope: read_var(LATE_SLOPE_KEY, defaults.blend.late_slope)?,
    };

    if !(0.0 < blend.early_breakpoint
      && blend.early_breakpoint < blend.late_breakpoint
      && blend.late_breakpoint < 1.0)
    {
      return Err(ConfigError::Invalid {
        key: format!("{}/{}", EARLY_BREAKPOINT_KEY, LATE_BREAKPOINT_KEY),
        value: format!("{}/{}", blend.early_breakpoint, blend.late_breakpoint),
      });
    }
    for (key, slope) in [
      (EARLY_SLOPE_KEY, blend.early_slope),
      (MIDDLE_SLOPE_KEY, blend.middle_slope),
      (LATE_SLOPE_KEY, blend.late_slope),
    ] {
      if slope < 0.0 {
        return Err(ConfigError::Invalid { key: key.to_string(), value: slope.to_string() });
      }
    }

    let repair = RepairConfig {
      distance_mi: read_positive(REPAIR_DISTANCE_MI_KEY, defaults.repair.distance_mi)?,
      distance_km: read_positive(REPAIR_DISTANCE_KM_KEY, defaults.repair.distance_km)?,
      protect_long_run: read_flag(PROTECT_LONG_RUN_KEY, defaults.repair.protect_long_run)?,
    };

    Ok(Self { blend, repair })
  }
}

fn read_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
  match env::var(key) {
    Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
      key: key.to_string(),
      value,
    }),
    Err(_) => Ok(default),
  }
}

fn read_positive(key: &str, default: f64) -> Result<f64, ConfigError> {
  let value = read_var(key, default)?;
  if value > 0.0 {
    Ok(value)
  } else {
    Err(ConfigError::Invalid { key: key.to_string(), value: value.to_string() })
  }
}

fn read_flag(key: &str, default: bool) -> Result<bool, ConfigError> {
  match env::var(key) {
    Ok(value) => match value.trim().to_lowercase().as_str() {
      "1" | "true" | "yes" | "on" => Ok(true),
      "0" | "false" | "no" | "off" => Ok(false),
      _ => Err(ConfigError::Invalid { key: key.to_string(), value }),
    },
    Err(_) => Ok(default),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_KEYS: [&str; 8] = [
    EARLY_BREAKPOINT_KEY,
    LATE_BREAKPOINT_KEY,
    EARLY_SLOPE_KEY,
    MIDDLE_SLOPE_KEY,
    LATE_SLOPE_KEY,
    REPAIR_DISTANCE_MI_KEY,
    REPAIR_DISTANCE_KM_KEY,
    PROTECT_LONG_RUN_KEY,
  ];

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(ALL_KEYS, || {
      let config = PipelineConfig::from_env().unwrap();
      assert_eq!(config, PipelineConfig::default());
      assert_eq!(config.blend, BlendCurve::default());
      assert_eq!(config.repair.default_distance(Units::Miles), 5.0);
      assert_eq!(config.repair.default_distance(Units::Kilometers), 8.0);
    });
  }

  #[test]
  #[serial]
  fn test_overrides() {
    temp_env::with_vars(
      [
        (EARLY_BREAKPOINT_KEY, Some("0.25")),
        (MIDDLE_SLOPE_KEY, Some(" 1.6 ")),
        (REPAIR_DISTANCE_KM_KEY, Some("10")),
        (PROTECT_LONG_RUN_KEY, Some("false")),
      ],
      || {
        let config = PipelineConfig::from_env().unwrap();
        assert_eq!(config.blend.early_breakpoint, 0.25);
        assert_eq!(config.blend.middle_slope, 1.6);
        assert_eq!(config.blend.late_breakpoint, 0.7);
        assert_eq!(config.repair.distance_km, 10.0);
        assert!(!config.repair.protect_long_run);
      },
    );
  }

  #[test]
  #[serial]
  fn test_malformed_value() {
    temp_env::with_var(REPAIR_DISTANCE_MI_KEY, Some("five"), || {
      assert_eq!(
        PipelineConfig::from_env(),
        Err(ConfigError::Invalid {
          key: REPAIR_DISTANCE_MI_KEY.to_string(),
          value: "five".to_string(),
        })
      );
    });
  }

  #[test]
  #[serial]
  fn test_breakpoints_must_be_ordered() {
    temp_env::with_vars(
      [(EARLY_BREAKPOINT_KEY, Some("0.8")), (LATE_BREAKPOINT_KEY, Some("0.6"))],
      || {
        assert!(PipelineConfig::from_env().is_err());
      },
    );
  }

  #[test]
  #[serial]
  fn test_non_positive_distance_rejected() {
    temp_env::with_var(REPAIR_DISTANCE_MI_KEY, Some("0"), || {
      assert!(PipelineConfig::from_env().is_err());
    });
  }
}
