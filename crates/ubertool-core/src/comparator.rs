//! Column-by-column comparison of computed outputs against an expected table.

use crate::config::{ComparisonMode, ComparisonPolicy, MatchStrategy, NumericTolerance};
use crate::domain::ModelError;
use crate::table::{CellValue, Column, Table};
use globset::{Glob, GlobMatcher};
use serde::Serialize;

pub struct Comparator {
    default_mode: ComparisonMode,
    default_tolerance: Option<NumericTolerance>,
    match_strategy: MatchStrategy,
    categories: Vec<CompiledCategory>,
}

struct CompiledCategory {
    id: String,
    mode: ComparisonMode,
    tolerance: Option<NumericTolerance>,
    matchers: Vec<GlobMatcher>,
}

impl CompiledCategory {
    fn matches(&self, column: &str) -> bool {
        self.matchers.iter().any(|matcher| matcher.is_match(column))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRule {
    pub mode: ComparisonMode,
    pub category_id: Option<String>,
    pub tolerance: Option<NumericTolerance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnComparison {
    pub column: String,
    pub mode: ComparisonMode,
    pub matched_category: Option<String>,
    pub passed: bool,
    pub compared_rows: usize,
    /// Index labels of the rows that did not match.
    pub failing_rows: Vec<String>,
    pub max_abs_diff: f64,
    pub max_rel_diff: f64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub passed: bool,
    pub columns: Vec<ColumnComparison>,
}

/// Distance between one expected and one computed value.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Deviation {
    abs: f64,
    rel: f64,
    within: bool,
}

impl NumericTolerance {
    fn deviation(&self, expected: f64, actual: f64) -> Deviation {
        let abs = (actual - expected).abs();
        let scale = expected.abs().max(self.relative_floor);
        Deviation {
            abs,
            rel: abs / scale,
            within: abs <= self.abs_tol || abs <= self.rel_tol * scale,
        }
    }
}

impl Comparator {
    pub fn from_policy(policy: &ComparisonPolicy) -> Result<Self, ComparatorError> {
        let mut categories = Vec::with_capacity(policy.categories.len());
        for category in &policy.categories {
            let mut matchers = Vec::with_capacity(category.column_globs.len());
            for pattern in &category.column_globs {
                let matcher = Glob::new(pattern)
                    .map_err(|source| ComparatorError::InvalidGlob {
                        pattern: pattern.clone(),
                        source,
                    })?
                    .compile_matcher();
                matchers.push(matcher);
            }

            let tolerance = category.tolerance.or(policy.default_tolerance);
            if category.mode == ComparisonMode::NumericTolerance && tolerance.is_none() {
                return Err(ComparatorError::InvalidPolicy(format!(
                    "category '{}' uses numeric_tolerance but does not define tolerance",
                    category.id
                )));
            }

            categories.push(CompiledCategory {
                id: category.id.clone(),
                mode: category.mode,
                tolerance,
                matchers,
            });
        }

        if policy.default_mode == ComparisonMode::NumericTolerance
            && policy.default_tolerance.is_none()
        {
            return Err(ComparatorError::InvalidPolicy(
                "defaultMode is numeric_tolerance but defaultTolerance is missing".to_string(),
            ));
        }

        Ok(Self {
            default_mode: policy.default_mode,
            default_tolerance: policy.default_tolerance,
            match_strategy: policy.match_strategy,
            categories,
        })
    }

    pub fn resolve_rule_for_column(&self, column: &str) -> ResolvedRule {
        match self.match_strategy {
            MatchStrategy::FirstMatch => {
                for category in &self.categories {
                    if category.matches(column) {
                        return ResolvedRule {
                            mode: category.mode,
                            category_id: Some(category.id.clone()),
                            tolerance: category.tolerance,
                        };
                    }
                }
            }
        }

        ResolvedRule {
            mode: self.default_mode,
            category_id: None,
            tolerance: self.default_tolerance,
        }
    }

    /// Compares every expected column. Computed columns without an expectation are skipped.
    pub fn compare_tables(&self, expected: &Table, actual: &Table) -> ComparisonReport {
        let columns: Vec<ColumnComparison> = expected
            .columns()
            .iter()
            .map(|expected_column| self.compare_column(expected_column, actual))
            .collect();

        ComparisonReport {
            passed: columns.iter().all(|column| column.passed),
            columns,
        }
    }

    fn compare_column(&self, expected: &Column, actual: &Table) -> ColumnComparison {
        let rule = self.resolve_rule_for_column(&expected.name);
        let mut comparison = ColumnComparison {
            column: expected.name.clone(),
            mode: rule.mode,
            matched_category: rule.category_id,
            passed: false,
            compared_rows: 0,
            failing_rows: Vec::new(),
            max_abs_diff: 0.0,
            max_rel_diff: 0.0,
            reason: None,
        };

        let Some(actual_column) = actual.column(&expected.name) else {
            comparison.reason = Some("column is missing from the computed outputs".to_string());
            return comparison;
        };
        if expected.cells.len() != actual_column.cells.len() {
            comparison.reason = Some(format!(
                "row count mismatch (expected={}, actual={})",
                expected.cells.len(),
                actual_column.cells.len()
            ));
            return comparison;
        }

        let mut first_failure: Option<String> = None;
        for ((label, expected_cell), actual_cell) in actual
            .index()
            .iter()
            .zip(expected.cells.iter())
            .zip(actual_column.cells.iter())
        {
            comparison.compared_rows += 1;
            let failure = match (rule.mode, rule.tolerance) {
                (ComparisonMode::NumericTolerance, Some(tolerance)) => {
                    compare_numeric_cells(expected_cell, actual_cell, tolerance, &mut comparison)
                }
                _ => compare_text_cells(expected_cell, actual_cell),
            };

            if let Some(detail) = failure {
                if first_failure.is_none() {
                    first_failure = Some(format!("row '{}': {}", label, detail));
                }
                comparison.failing_rows.push(label.clone());
            }
        }

        comparison.passed = comparison.failing_rows.is_empty();
        if !comparison.passed {
            comparison.reason = Some(format!(
                "{} of {} row(s) differ; first at {}",
                comparison.failing_rows.len(),
                comparison.compared_rows,
                first_failure.unwrap_or_else(|| "an unknown row".to_string())
            ));
        }
        comparison
    }
}

fn compare_text_cells(expected: &CellValue, actual: &CellValue) -> Option<String> {
    if let (Some(expected_value), Some(actual_value)) =
        (numeric_value(expected), numeric_value(actual))
    {
        return (expected_value != actual_value)
            .then(|| format!("expected={expected_value:e} actual={actual_value:e}"));
    }

    (expected != actual).then(|| format!("expected='{}' actual='{}'", expected, actual))
}

fn compare_numeric_cells(
    expected: &CellValue,
    actual: &CellValue,
    tolerance: NumericTolerance,
    comparison: &mut ColumnComparison,
) -> Option<String> {
    if expected.is_null() && actual.is_null() {
        return None;
    }

    let (Some(expected_value), Some(actual_value)) =
        (numeric_value(expected), numeric_value(actual))
    else {
        return Some(format!(
            "expected='{}' actual='{}' is not a numeric pair",
            expected, actual
        ));
    };

    let deviation = tolerance.deviation(expected_value, actual_value);
    comparison.max_abs_diff = comparison.max_abs_diff.max(deviation.abs);
    comparison.max_rel_diff = comparison.max_rel_diff.max(deviation.rel);
    (!deviation.within).then(|| {
        format!(
            "expected={expected_value:e} actual={actual_value:e} abs_diff={:e} rel_diff={:e}",
            deviation.abs, deviation.rel
        )
    })
}

fn numeric_value(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(value) => Some(*value),
        CellValue::Text(text) => text.trim().parse::<f64>().ok(),
        CellValue::Bool(_) | CellValue::Null => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComparatorError {
    #[error("invalid comparison policy: {0}")]
    InvalidPolicy(String),
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },
}

impl From<ComparatorError> for ModelError {
    fn from(error: ComparatorError) -> Self {
        ModelError::input_validation("INPUT.COMPARATOR_POLICY", error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Comparator, ComparatorError};
    use crate::config::{ComparisonMode, ComparisonPolicy, NumericTolerance, PolicyCategory};
    use crate::table::{CellValue, Table};

    fn table(columns: &[(&str, Vec<CellValue>)]) -> Table {
        let rows = columns.first().map_or(0, |(_, cells)| cells.len());
        let mut table = Table::with_row_count(rows);
        for (name, cells) in columns {
            table
                .push_column(*name, cells.clone())
                .expect("column should be accepted");
        }
        table
    }

    #[test]
    fn default_policy_routes_narratives_to_exact_text() {
        let comparator =
            Comparator::from_policy(&ComparisonPolicy::default()).expect("policy should compile");

        let narrative = comparator.resolve_rule_for_column("out_nms_loc_dry");
        assert_eq!(narrative.mode, ComparisonMode::ExactText);
        assert_eq!(narrative.category_id.as_deref(), Some("risk-narratives"));

        let quotient = comparator.resolve_rule_for_column("out_nms_rq_dry");
        assert_eq!(quotient.mode, ComparisonMode::NumericTolerance);
        assert_eq!(quotient.category_id.as_deref(), Some("derived-quantities"));

        let other = comparator.resolve_rule_for_column("chemical_name");
        assert_eq!(other.mode, ComparisonMode::ExactText);
        assert!(other.category_id.is_none());
    }

    #[test]
    fn numeric_columns_pass_within_tolerance_and_report_failing_rows() {
        let comparator =
            Comparator::from_policy(&ComparisonPolicy::default()).expect("policy should compile");
        let expected = table(&[(
            "out_totaldry",
            vec![0.0134.into(), 0.0134.into(), CellValue::Null],
        )]);
        let actual = table(&[(
            "out_totaldry",
            vec![(0.0134 + 1.0e-12).into(), 0.02.into(), CellValue::Null],
        )]);

        let report = comparator.compare_tables(&expected, &actual);
        assert!(!report.passed);
        let column = &report.columns[0];
        assert_eq!(column.compared_rows, 3);
        assert_eq!(column.failing_rows, ["1"]);
        assert!((column.max_abs_diff - 0.0066).abs() < 1.0e-12);
        assert!(column.reason.as_deref().is_some_and(|reason| reason.contains("row '1'")));
    }

    #[test]
    fn exact_text_compares_strings_and_missing_columns_fail() {
        let comparator =
            Comparator::from_policy(&ComparisonPolicy::default()).expect("policy should compile");
        let expected = table(&[
            ("out_nms_loc_dry", vec!["minimal".into(), "risk".into()]),
            ("out_absent", vec![1.0.into(), 2.0.into()]),
        ]);
        let actual = table(&[
            ("out_nms_loc_dry", vec!["minimal".into(), "minimal".into()]),
            ("out_extra", vec![1.0.into(), 2.0.into()]),
        ]);

        let report = comparator.compare_tables(&expected, &actual);
        assert_eq!(report.columns.len(), 2);
        assert_eq!(report.columns[0].failing_rows, ["1"]);
        assert_eq!(
            report.columns[1].reason.as_deref(),
            Some("column is missing from the computed outputs")
        );
        assert!(report.columns.iter().all(|column| !column.passed));
    }

    #[test]
    fn row_count_mismatch_fails_the_column() {
        let comparator =
            Comparator::from_policy(&ComparisonPolicy::default()).expect("policy should compile");
        let expected = table(&[("out_spray", vec![1.0.into()])]);
        let actual = table(&[("out_spray", vec![1.0.into(), 2.0.into()])]);

        let report = comparator.compare_tables(&expected, &actual);
        assert!(!report.passed);
        assert!(
            report.columns[0]
                .reason
                .as_deref()
                .is_some_and(|reason| reason.starts_with("row count mismatch"))
        );
    }

    #[test]
    fn either_absolute_or_relative_bound_accepts_a_value() {
        let tolerance = NumericTolerance {
            abs_tol: 1.0e-9,
            rel_tol: 1.0e-6,
            relative_floor: 1.0e-12,
        };

        assert!(tolerance.deviation(0.0, 5.0e-10).within);
        let relative = tolerance.deviation(1000.0, 1000.0005);
        assert!(relative.within);
        assert!((relative.rel - 5.0e-7).abs() < 1.0e-12);
        assert!(!tolerance.deviation(0.0134, 0.0135).within);
    }

    #[test]
    fn numeric_category_without_tolerance_is_rejected() {
        let mut policy = ComparisonPolicy::default();
        policy.categories.push(PolicyCategory {
            id: "loose".to_string(),
            mode: ComparisonMode::NumericTolerance,
            column_globs: vec!["*".to_string()],
            tolerance: None,
        });
        let error = Comparator::from_policy(&policy)
            .err()
            .expect("policy should be rejected");
        assert!(matches!(error, ComparatorError::InvalidPolicy(_)));

        policy.default_tolerance = Some(NumericTolerance {
            abs_tol: 1.0e-3,
            rel_tol: 0.0,
            relative_floor: 1.0e-12,
        });
        assert!(Comparator::from_policy(&policy).is_ok());
    }

    #[test]
    fn invalid_glob_maps_to_input_validation_error() {
        let mut policy = ComparisonPolicy::default();
        policy.categories[0].column_globs = vec!["out_[".to_string()];
        let error = Comparator::from_policy(&policy)
            .err()
            .expect("glob should be rejected");
        let error: crate::domain::ModelError = error.into();
        assert_eq!(error.placeholder(), "INPUT.COMPARATOR_POLICY");
        assert_eq!(error.exit_code(), 2);
    }
}
