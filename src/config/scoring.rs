//! Severity scoring weights.
//!
//! `score = type_errors*w1 + lint_issues*w2 + avg_complexity*w3
//!          + (100 - coverage_pct)*w4`. All weights must be strictly
//! positive so the score never decreases when a risk input grows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeverityWeights {
    #[serde(default = "default_type_errors_weight")]
    pub type_errors: f64,

    #[serde(default = "default_lint_issues_weight")]
    pub lint_issues: f64,

    #[serde(default = "default_complexity_weight")]
    pub complexity: f64,

    #[serde(default = "default_coverage_deficit_weight")]
    pub coverage_deficit: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            type_errors: default_type_errors_weight(),
            lint_issues: default_lint_issues_weight(),
            complexity: default_complexity_weight(),
            coverage_deficit: default_coverage_deficit_weight(),
        }
    }
}

impl SeverityWeights {
    // Pure function: a usable weight is finite and strictly positive
    pub fn is_valid_weight(weight: f64) -> bool {
        weight.is_finite() && weight > 0.0
    }

    pub fn validate_weight(weight: f64, name: &str) -> Result<(), String> {
        if Self::is_valid_weight(weight) {
            Ok(())
        } else {
            Err(format!("{} weight must be a positive number, got {}", name, weight))
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        Self::validate_weight(self.type_errors, "Type errors")?;
        Self::validate_weight(self.lint_issues, "Lint issues")?;
        Self::validate_weight(self.complexity, "Complexity")?;
        Self::validate_weight(self.coverage_deficit, "Coverage deficit")?;
        Ok(())
    }
}

fn default_type_errors_weight() -> f64 {
    3.0
}

fn default_lint_issues_weight() -> f64 {
    1.0
}

fn default_complexity_weight() -> f64 {
    2.0
}

fn default_coverage_deficit_weight() -> f64 {
    0.5
}
