use super::inputs::ScenarioInputs;
use super::loc::{
    ExposureSource, LevelOfConcern, QuotientSpec, RISK_QUOTIENTS, SpeciesClass, ThresholdSource,
};
use super::schema::{
    INCORPORATION_DEPTH, OUT_RUNDRY, OUT_RUNSEMI, OUT_SPRAY, OUT_TOTALDRY, OUT_TOTALSEMI,
    OUTPUT_FIELDS,
};
use crate::domain::{RowError, RowErrorKind};
use crate::table::CellValue;

/// Semi-aquatic areas receive ten times the dry-area runoff.
pub const SEMI_AQUATIC_RUNOFF_FACTOR: f64 = 10.0;

/// Exposure estimates in lbs ai/A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureEstimates {
    pub rundry: f64,
    pub runsemi: f64,
    pub spray: f64,
    pub totaldry: f64,
    pub totalsemi: f64,
}

impl ExposureEstimates {
    pub fn value(&self, source: ExposureSource) -> f64 {
        match source {
            ExposureSource::TotalDry => self.totaldry,
            ExposureSource::TotalSemi => self.totalsemi,
            ExposureSource::Spray => self.spray,
        }
    }

    /// Values keyed by output column, in `OUTPUT_FIELDS` order.
    pub fn columns(&self) -> [(&'static str, f64); 5] {
        [
            (OUT_RUNDRY, self.rundry),
            (OUT_RUNSEMI, self.runsemi),
            (OUT_TOTALDRY, self.totaldry),
            (OUT_TOTALSEMI, self.totalsemi),
            (OUT_SPRAY, self.spray),
        ]
    }
}

/// Returns `None` when the incorporation depth is zero.
pub fn exposure_estimates(inputs: &ScenarioInputs) -> Option<ExposureEstimates> {
    if inputs.incorporation_depth == 0.0 {
        return None;
    }

    let rundry = inputs.application_rate / inputs.incorporation_depth * inputs.runoff_fraction;
    let runsemi = rundry * SEMI_AQUATIC_RUNOFF_FACTOR;
    let spray = inputs.application_rate * inputs.drift_fraction;

    Some(ExposureEstimates {
        rundry,
        runsemi,
        spray,
        totaldry: rundry + spray,
        totalsemi: runsemi + spray,
    })
}

/// Lower of the seedling-emergence and vegetative-vigor thresholds per species class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprayThresholds {
    pub nms: f64,
    pub lms: f64,
    pub nds: f64,
    pub lds: f64,
}

impl SprayThresholds {
    pub fn for_species(&self, species: SpeciesClass) -> f64 {
        match species {
            SpeciesClass::NonListedMonocot => self.nms,
            SpeciesClass::ListedMonocot => self.lms,
            SpeciesClass::NonListedDicot => self.nds,
            SpeciesClass::ListedDicot => self.lds,
        }
    }
}

pub fn spray_thresholds(inputs: &ScenarioInputs) -> SprayThresholds {
    let minimum = |species| {
        let thresholds = inputs.thresholds(species);
        thresholds.seedling_emergence.min(thresholds.vegetative_vigor)
    };

    SprayThresholds {
        nms: minimum(SpeciesClass::NonListedMonocot),
        lms: minimum(SpeciesClass::ListedMonocot),
        nds: minimum(SpeciesClass::NonListedDicot),
        lds: minimum(SpeciesClass::ListedDicot),
    }
}

/// Returns `None` when the threshold is zero.
pub fn risk_quotient(exposure: f64, threshold: f64) -> Option<f64> {
    if threshold == 0.0 {
        None
    } else {
        Some(exposure / threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotientOutcome {
    pub spec: &'static QuotientSpec,
    pub risk_quotient: f64,
    pub level: LevelOfConcern,
}

impl QuotientOutcome {
    pub fn narrative(&self) -> String {
        self.spec.narrative(self.level)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOutputs {
    pub exposure: ExposureEstimates,
    pub spray_minimums: SprayThresholds,
    /// In [`RISK_QUOTIENTS`] order.
    pub quotients: Vec<QuotientOutcome>,
}

impl RowOutputs {
    /// Cells in `OUTPUT_FIELDS` order.
    pub fn cells(&self) -> Vec<CellValue> {
        let mut cells = Vec::with_capacity(OUTPUT_FIELDS.len());
        cells.extend(
            self.exposure
                .columns()
                .map(|(_, value)| CellValue::Number(value)),
        );
        cells.extend(
            [
                self.spray_minimums.nms,
                self.spray_minimums.lms,
                self.spray_minimums.nds,
                self.spray_minimums.lds,
            ]
            .map(CellValue::Number),
        );
        for outcome in &self.quotients {
            cells.push(CellValue::Number(outcome.risk_quotient));
            cells.push(CellValue::Text(outcome.narrative()));
        }
        cells
    }
}

fn threshold_value(
    spec: &QuotientSpec,
    inputs: &ScenarioInputs,
    spray_minimums: &SprayThresholds,
) -> f64 {
    match spec.threshold {
        ThresholdSource::SeedlingEmergence => inputs.thresholds(spec.species).seedling_emergence,
        ThresholdSource::SprayMinimum => spray_minimums.for_species(spec.species),
    }
}

/// Evaluates one bound row. Every zero denominator is reported once, by field name,
/// and every result that overflows to a non-finite value by its output column.
pub fn evaluate_row(
    row: usize,
    index_label: &str,
    inputs: &ScenarioInputs,
) -> Result<RowOutputs, Vec<RowError>> {
    let mut errors: Vec<RowError> = Vec::new();
    let mut fail = |field: &'static str, kind: RowErrorKind| {
        if !errors.iter().any(|error| error.field == field) {
            errors.push(RowError::new(row, index_label, field, kind));
        }
    };

    let exposure = exposure_estimates(inputs);
    match exposure {
        Some(exposure) => {
            for (column, value) in exposure.columns() {
                if !value.is_finite() {
                    fail(column, RowErrorKind::NonFiniteResult);
                }
            }
        }
        None => fail(INCORPORATION_DEPTH, RowErrorKind::DivisionByZero),
    }
    let spray_minimums = spray_thresholds(inputs);

    let mut quotients = Vec::with_capacity(RISK_QUOTIENTS.len());
    for spec in &RISK_QUOTIENTS {
        let threshold = threshold_value(spec, inputs, &spray_minimums);
        let numerator = exposure.map(|exposure| exposure.value(spec.exposure));
        match numerator.map(|numerator| (numerator, risk_quotient(numerator, threshold))) {
            None | Some((_, None)) if threshold == 0.0 => {
                fail(spec.denominator_name(), RowErrorKind::DivisionByZero);
            }
            Some((_, Some(risk_quotient))) if risk_quotient.is_finite() => {
                quotients.push(QuotientOutcome {
                    spec,
                    risk_quotient,
                    level: LevelOfConcern::classify(risk_quotient),
                });
            }
            // An overflowing numerator is already reported under its exposure column.
            Some((numerator, Some(_))) if numerator.is_finite() => {
                fail(spec.rq_column, RowErrorKind::NonFiniteResult);
            }
            _ => {}
        }
    }

    match exposure {
        Some(exposure) if errors.is_empty() => Ok(RowOutputs {
            exposure,
            spray_minimums,
            quotients,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::{RowOutputs, evaluate_row, exposure_estimates, risk_quotient, spray_thresholds};
    use crate::domain::RowErrorKind;
    use crate::modules::terrplant::inputs::{PlantThresholds, ScenarioInputs};
    use crate::modules::terrplant::loc::LevelOfConcern;
    use crate::modules::terrplant::schema::OUTPUT_FIELDS;

    const EPS: f64 = 1.0e-12;

    fn scenario() -> ScenarioInputs {
        ScenarioInputs {
            application_rate: 2.0,
            incorporation_depth: 4.0,
            runoff_fraction: 0.01,
            drift_fraction: 0.0042,
            solubility: 240.0,
            nonlisted_monocot: PlantThresholds {
                seedling_emergence: 4.4,
                vegetative_vigor: 2.9,
            },
            listed_monocot: PlantThresholds {
                seedling_emergence: 0.0123,
                vegetative_vigor: 0.00011,
            },
            nonlisted_dicot: PlantThresholds {
                seedling_emergence: 0.0006,
                vegetative_vigor: 0.005,
            },
            listed_dicot: PlantThresholds {
                seedling_emergence: 0.0044,
                vegetative_vigor: 0.0027,
            },
        }
    }

    #[test]
    fn exposure_estimates_follow_runoff_and_drift_formulas() {
        let exposure = exposure_estimates(&scenario()).expect("depth is non-zero");
        assert!((exposure.rundry - 0.005).abs() < EPS);
        assert!((exposure.runsemi - 0.05).abs() < EPS);
        assert!((exposure.spray - 0.0084).abs() < EPS);
        assert!((exposure.totaldry - 0.0134).abs() < EPS);
        assert!((exposure.totalsemi - 0.0584).abs() < EPS);
    }

    #[test]
    fn spray_minimum_takes_the_lower_threshold() {
        let minimums = spray_thresholds(&scenario());
        assert_eq!(minimums.nms, 2.9);
        assert_eq!(minimums.lms, 0.00011);
        assert_eq!(minimums.nds, 0.0006);
        assert_eq!(minimums.lds, 0.0027);
    }

    #[test]
    fn quotients_use_listing_specific_denominators() {
        let outputs = evaluate_row(0, "0", &scenario()).expect("row should evaluate");
        assert_eq!(outputs.quotients.len(), 12);

        let nms_dry = &outputs.quotients[0];
        assert_eq!(nms_dry.spec.rq_column, "out_nms_rq_dry");
        assert!((nms_dry.risk_quotient - 0.0134 / 4.4).abs() < EPS);
        assert_eq!(nms_dry.level, LevelOfConcern::MinimalRisk);

        let lms_spray = &outputs.quotients[5];
        assert_eq!(lms_spray.spec.rq_column, "out_lms_rq_spray");
        assert!((lms_spray.risk_quotient - 0.0084 / 0.00011).abs() < 1.0e-9);
        assert_eq!(lms_spray.level, LevelOfConcern::PotentialRisk);
    }

    #[test]
    fn quotient_of_exactly_one_is_a_potential_risk() {
        let mut inputs = scenario();
        let totaldry = exposure_estimates(&inputs)
            .expect("depth is non-zero")
            .totaldry;
        inputs.nonlisted_monocot.seedling_emergence = totaldry;
        let outputs = evaluate_row(0, "0", &inputs).expect("row should evaluate");
        assert_eq!(outputs.quotients[0].risk_quotient, 1.0);
        assert_eq!(outputs.quotients[0].level, LevelOfConcern::PotentialRisk);
        assert!(outputs.quotients[0].narrative().ends_with("indicates a potential risk."));
    }

    #[test]
    fn zero_depth_is_a_division_error_for_the_row() {
        let mut inputs = scenario();
        inputs.incorporation_depth = 0.0;
        let errors = evaluate_row(3, "7", &inputs).expect_err("zero depth should fail");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 3);
        assert_eq!(errors[0].index_label, "7");
        assert_eq!(errors[0].field, "incorporation_depth");
        assert_eq!(errors[0].kind, RowErrorKind::DivisionByZero);
    }

    #[test]
    fn zero_threshold_names_input_and_spray_minimum_once_each() {
        let mut inputs = scenario();
        inputs.listed_dicot.seedling_emergence = 0.0;
        let errors = evaluate_row(0, "0", &inputs).expect_err("zero threshold should fail");
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(
            fields,
            ["noaec_listed_seedling_emergence_dicot", "out_min_lds_spray"]
        );
        assert_eq!(risk_quotient(1.0, 0.0), None);
    }

    #[test]
    fn overflowing_runoff_is_reported_per_exposure_column() {
        let mut inputs = scenario();
        inputs.incorporation_depth = 1.0e-308;
        let errors = evaluate_row(0, "0", &inputs).expect_err("overflow should fail the row");
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(
            fields,
            ["out_rundry", "out_runsemi", "out_totaldry", "out_totalsemi"]
        );
        assert!(
            errors
                .iter()
                .all(|error| error.kind == RowErrorKind::NonFiniteResult)
        );
    }

    #[test]
    fn subnormal_threshold_overflow_names_the_quotient_columns() {
        let mut inputs = scenario();
        inputs.nonlisted_monocot.seedling_emergence = 1.0e-320;
        let errors = evaluate_row(0, "0", &inputs).expect_err("overflow should fail the row");
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(
            fields,
            ["out_nms_rq_dry", "out_nms_rq_semi", "out_nms_rq_spray"]
        );
        assert!(
            errors
                .iter()
                .all(|error| error.kind == RowErrorKind::NonFiniteResult)
        );
    }

    #[test]
    fn output_cells_line_up_with_the_output_descriptor() {
        let outputs: RowOutputs = evaluate_row(0, "0", &scenario()).expect("row should evaluate");
        let cells = outputs.cells();
        assert_eq!(cells.len(), OUTPUT_FIELDS.len());
        assert_eq!(cells[2].as_f64(), Some(outputs.exposure.totaldry));
        assert_eq!(cells[4].as_f64(), Some(outputs.exposure.spray));
        assert_eq!(cells[6].as_f64(), Some(0.00011));
        for (position, outcome) in outputs.quotients.iter().enumerate() {
            let rq_position = 9 + position * 2;
            assert_eq!(OUTPUT_FIELDS[rq_position].name, outcome.spec.rq_column);
            assert_eq!(OUTPUT_FIELDS[rq_position + 1].name, outcome.spec.loc_column);
            assert_eq!(
                cells[rq_position + 1].as_text(),
                Some(outcome.narrative().as_str())
            );
        }
    }
}
