//! Comparison-policy configuration for expected-output checks.
//!
//! Policies are JSON documents. When no file is supplied the built-in policy is used:
//! risk narratives must match exactly and every other derived column is compared
//! under a tight numeric tolerance.

use crate::domain::ModelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_POLICY_VERSION: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    ExactText,
    NumericTolerance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    #[default]
    FirstMatch,
}

/// Absolute and relative bounds for `numeric_tolerance` columns. The relative bound
/// is taken against `max(|expected|, relative_floor)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericTolerance {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub relative_floor: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComparisonPolicy {
    #[serde(rename = "policyVersion", default = "default_policy_version")]
    pub policy_version: String,
    #[serde(rename = "defaultMode")]
    pub default_mode: ComparisonMode,
    #[serde(rename = "defaultTolerance", default)]
    pub default_tolerance: Option<NumericTolerance>,
    #[serde(rename = "matchStrategy", default)]
    pub match_strategy: MatchStrategy,
    #[serde(default)]
    pub categories: Vec<PolicyCategory>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicyCategory {
    pub id: String,
    pub mode: ComparisonMode,
    #[serde(rename = "columnGlobs", default)]
    pub column_globs: Vec<String>,
    pub tolerance: Option<NumericTolerance>,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self {
            policy_version: default_policy_version(),
            default_mode: ComparisonMode::ExactText,
            default_tolerance: None,
            match_strategy: MatchStrategy::FirstMatch,
            categories: vec![
                PolicyCategory {
                    id: "risk-narratives".to_string(),
                    mode: ComparisonMode::ExactText,
                    column_globs: vec!["out_*_loc_*".to_string()],
                    tolerance: None,
                },
                PolicyCategory {
                    id: "derived-quantities".to_string(),
                    mode: ComparisonMode::NumericTolerance,
                    column_globs: vec!["out_*".to_string()],
                    tolerance: Some(NumericTolerance {
                        abs_tol: 1.0e-9,
                        rel_tol: 1.0e-6,
                        relative_floor: 1.0e-12,
                    }),
                },
            ],
        }
    }
}

fn default_policy_version() -> String {
    DEFAULT_POLICY_VERSION.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ComparisonPolicyError {
    #[error("failed to read comparison policy '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse comparison policy '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<ComparisonPolicyError> for ModelError {
    fn from(error: ComparisonPolicyError) -> Self {
        let message = error.to_string();
        match error {
            ComparisonPolicyError::Read { .. } => {
                ModelError::io_system("IO.COMPARISON_POLICY", message)
            }
            ComparisonPolicyError::Parse { .. } => {
                ModelError::input_validation("INPUT.COMPARATOR_POLICY", message)
            }
        }
    }
}

pub fn load_comparison_policy(
    policy_path: impl AsRef<Path>,
) -> Result<ComparisonPolicy, ComparisonPolicyError> {
    let policy_path = policy_path.as_ref();
    let source = fs::read_to_string(policy_path).map_err(|source| ComparisonPolicyError::Read {
        path: policy_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| ComparisonPolicyError::Parse {
        path: policy_path.to_path_buf(),
        source,
    })
}
