//! Threshold classifier.

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::{Error, Result};

/// Severity tier of a reading, ordered `Normal < Critical < Danger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Normal,
    Critical,
    Danger,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Critical => "critical",
            Self::Danger => "danger",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "safe" => Some(Self::Normal),
            "critical" => Some(Self::Critical),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a concentration against two thresholds.
///
/// A value equal to a threshold maps to the lower tier. NaN compares false
/// everywhere and lands in `Normal`.
pub fn classify(check_value: f64, critical: f64, danger: f64) -> Tier {
    if check_value > danger {
        Tier::Danger
    } else if check_value > critical {
        Tier::Critical
    } else {
        Tier::Normal
    }
}

/// Per-account alert thresholds in PPM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub critical: f64,
    pub danger: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical: defaults::CRITICAL_PPM,
            danger: defaults::DANGER_PPM,
        }
    }
}

impl Thresholds {
    pub fn new(critical: f64, danger: f64) -> Self {
        Self { critical, danger }
    }

    pub fn classify(&self, check_value: f64) -> Tier {
        classify(check_value, self.critical, self.danger)
    }

    /// Both thresholds must be finite and non-negative, with `danger >= critical`.
    pub fn validate(&self) -> Result<()> {
        if !self.critical.is_finite() || !self.danger.is_finite() {
            return Err(Error::Validation("Thresholds must be finite numbers".into()));
        }
        if self.critical < 0.0 || self.danger < 0.0 {
            return Err(Error::Validation("Thresholds must not be negative".into()));
        }
        if self.danger < self.critical {
            return Err(Error::Validation(format!(
                "Danger threshold ({}) must not be below critical threshold ({})",
                self.danger, self.critical
            )));
        }
        Ok(())
    }
}
