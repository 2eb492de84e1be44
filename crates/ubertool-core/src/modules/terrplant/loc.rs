//! Species classes, exposure routes and the level-of-concern narratives.
//!
//! [`RISK_QUOTIENTS`] is the single table that ties each (species class, route) pair
//! to the exposure estimate and toxicity threshold it divides, and to the output
//! columns it fills. The evaluator walks this table instead of carrying one function
//! per combination.

use super::schema::{
    EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT, EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT,
    EC25_NONLISTED_VEGETATIVE_VIGOR_DICOT, EC25_NONLISTED_VEGETATIVE_VIGOR_MONOCOT,
    NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT, NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT,
    NOAEC_LISTED_VEGETATIVE_VIGOR_DICOT, NOAEC_LISTED_VEGETATIVE_VIGOR_MONOCOT, OUT_MIN_LDS_SPRAY,
    OUT_MIN_LMS_SPRAY, OUT_MIN_NDS_SPRAY, OUT_MIN_NMS_SPRAY, OUT_SPRAY, OUT_TOTALDRY,
    OUT_TOTALSEMI,
};
use serde::Serialize;

/// Quotients at or above this value indicate a potential risk.
pub const LEVEL_OF_CONCERN_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesClass {
    NonListedMonocot,
    ListedMonocot,
    NonListedDicot,
    ListedDicot,
}

impl SpeciesClass {
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::NonListedMonocot => "nms",
            Self::ListedMonocot => "lms",
            Self::NonListedDicot => "nds",
            Self::ListedDicot => "lds",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NonListedMonocot => "non-listed monocot",
            Self::ListedMonocot => "listed monocot",
            Self::NonListedDicot => "non-listed dicot",
            Self::ListedDicot => "listed dicot",
        }
    }

    /// EC25 for non-listed classes, NOAEC for listed ones.
    pub const fn seedling_emergence_field(self) -> &'static str {
        match self {
            Self::NonListedMonocot => EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT,
            Self::ListedMonocot => NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT,
            Self::NonListedDicot => EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT,
            Self::ListedDicot => NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT,
        }
    }

    pub const fn spray_minimum_column(self) -> &'static str {
        match self {
            Self::NonListedMonocot => OUT_MIN_NMS_SPRAY,
            Self::ListedMonocot => OUT_MIN_LMS_SPRAY,
            Self::NonListedDicot => OUT_MIN_NDS_SPRAY,
            Self::ListedDicot => OUT_MIN_LDS_SPRAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureRoute {
    RunoffDry,
    RunoffSemiAquatic,
    SprayDrift,
}

impl ExposureRoute {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::RunoffDry => "dry",
            Self::RunoffSemiAquatic => "semi",
            Self::SprayDrift => "spray",
        }
    }

    pub const fn phrase(self) -> &'static str {
        match self {
            Self::RunoffDry => "runoff to dry areas",
            Self::RunoffSemiAquatic => "runoff to semi-aquatic areas",
            Self::SprayDrift => "spray drift",
        }
    }
}

/// Exposure estimate used as a quotient numerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureSource {
    TotalDry,
    TotalSemi,
    Spray,
}

impl ExposureSource {
    pub const fn column(self) -> &'static str {
        match self {
            Self::TotalDry => OUT_TOTALDRY,
            Self::TotalSemi => OUT_TOTALSEMI,
            Self::Spray => OUT_SPRAY,
        }
    }
}

/// Toxicity threshold used as a quotient denominator, relative to the species class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdSource {
    SeedlingEmergence,
    /// Lower of the seedling-emergence and vegetative-vigor thresholds.
    SprayMinimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelOfConcern {
    PotentialRisk,
    MinimalRisk,
}

impl LevelOfConcern {
    pub fn classify(risk_quotient: f64) -> Self {
        if risk_quotient >= LEVEL_OF_CONCERN_THRESHOLD {
            Self::PotentialRisk
        } else {
            Self::MinimalRisk
        }
    }

    const fn conclusion(self) -> &'static str {
        match self {
            Self::PotentialRisk => "indicates a potential risk.",
            Self::MinimalRisk => "indicates that potential risk is minimal.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotientSpec {
    pub species: SpeciesClass,
    pub route: ExposureRoute,
    pub exposure: ExposureSource,
    pub threshold: ThresholdSource,
    pub rq_column: &'static str,
    pub loc_column: &'static str,
}

impl QuotientSpec {
    pub const fn threshold_input_fields(&self) -> &'static [&'static str] {
        match (self.threshold, self.species) {
            (ThresholdSource::SeedlingEmergence, SpeciesClass::NonListedMonocot) => {
                &[EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT]
            }
            (ThresholdSource::SeedlingEmergence, SpeciesClass::ListedMonocot) => {
                &[NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT]
            }
            (ThresholdSource::SeedlingEmergence, SpeciesClass::NonListedDicot) => {
                &[EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT]
            }
            (ThresholdSource::SeedlingEmergence, SpeciesClass::ListedDicot) => {
                &[NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT]
            }
            (ThresholdSource::SprayMinimum, SpeciesClass::NonListedMonocot) => &[
                EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT,
                EC25_NONLISTED_VEGETATIVE_VIGOR_MONOCOT,
            ],
            (ThresholdSource::SprayMinimum, SpeciesClass::ListedMonocot) => &[
                NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT,
                NOAEC_LISTED_VEGETATIVE_VIGOR_MONOCOT,
            ],
            (ThresholdSource::SprayMinimum, SpeciesClass::NonListedDicot) => &[
                EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT,
                EC25_NONLISTED_VEGETATIVE_VIGOR_DICOT,
            ],
            (ThresholdSource::SprayMinimum, SpeciesClass::ListedDicot) => &[
                NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT,
                NOAEC_LISTED_VEGETATIVE_VIGOR_DICOT,
            ],
        }
    }

    /// Derived column holding the denominator, when it is not a raw input.
    pub const fn threshold_output_column(&self) -> Option<&'static str> {
        match self.threshold {
            ThresholdSource::SeedlingEmergence => None,
            ThresholdSource::SprayMinimum => Some(self.species.spray_minimum_column()),
        }
    }

    /// Name reported when the denominator is zero.
    pub const fn denominator_name(&self) -> &'static str {
        match self.threshold {
            ThresholdSource::SeedlingEmergence => self.species.seedling_emergence_field(),
            ThresholdSource::SprayMinimum => self.species.spray_minimum_column(),
        }
    }

    pub fn narrative(&self, level: LevelOfConcern) -> String {
        narrative(self.species, self.route, level)
    }
}

pub fn narrative(species: SpeciesClass, route: ExposureRoute, level: LevelOfConcern) -> String {
    format!(
        "The risk quotient for {} seedlings exposed to the pesticide via {} {}",
        species.label(),
        route.phrase(),
        level.conclusion()
    )
}

const fn quotient(
    species: SpeciesClass,
    route: ExposureRoute,
    rq_column: &'static str,
    loc_column: &'static str,
) -> QuotientSpec {
    let (exposure, threshold) = match route {
        ExposureRoute::RunoffDry => (ExposureSource::TotalDry, ThresholdSource::SeedlingEmergence),
        ExposureRoute::RunoffSemiAquatic => {
            (ExposureSource::TotalSemi, ThresholdSource::SeedlingEmergence)
        }
        ExposureRoute::SprayDrift => (ExposureSource::Spray, ThresholdSource::SprayMinimum),
    };
    QuotientSpec {
        species,
        route,
        exposure,
        threshold,
        rq_column,
        loc_column,
    }
}

pub const RISK_QUOTIENTS: [QuotientSpec; 12] = [
    quotient(
        SpeciesClass::NonListedMonocot,
        ExposureRoute::RunoffDry,
        "out_nms_rq_dry",
        "out_nms_loc_dry",
    ),
    quotient(
        SpeciesClass::NonListedMonocot,
        ExposureRoute::RunoffSemiAquatic,
        "out_nms_rq_semi",
        "out_nms_loc_semi",
    ),
    quotient(
        SpeciesClass::NonListedMonocot,
        ExposureRoute::SprayDrift,
        "out_nms_rq_spray",
        "out_nms_loc_spray",
    ),
    quotient(
        SpeciesClass::ListedMonocot,
        ExposureRoute::RunoffDry,
        "out_lms_rq_dry",
        "out_lms_loc_dry",
    ),
    quotient(
        SpeciesClass::ListedMonocot,
        ExposureRoute::RunoffSemiAquatic,
        "out_lms_rq_semi",
        "out_lms_loc_semi",
    ),
    quotient(
        SpeciesClass::ListedMonocot,
        ExposureRoute::SprayDrift,
        "out_lms_rq_spray",
        "out_lms_loc_spray",
    ),
    quotient(
        SpeciesClass::NonListedDicot,
        ExposureRoute::RunoffDry,
        "out_nds_rq_dry",
        "out_nds_loc_dry",
    ),
    quotient(
        SpeciesClass::NonListedDicot,
        ExposureRoute::RunoffSemiAquatic,
        "out_nds_rq_semi",
        "out_nds_loc_semi",
    ),
    quotient(
        SpeciesClass::NonListedDicot,
        ExposureRoute::SprayDrift,
        "out_nds_rq_spray",
        "out_nds_loc_spray",
    ),
    quotient(
        SpeciesClass::ListedDicot,
        ExposureRoute::RunoffDry,
        "out_lds_rq_dry",
        "out_lds_loc_dry",
    ),
    quotient(
        SpeciesClass::ListedDicot,
        ExposureRoute::RunoffSemiAquatic,
        "out_lds_rq_semi",
        "out_lds_loc_semi",
    ),
    quotient(
        SpeciesClass::ListedDicot,
        ExposureRoute::SprayDrift,
        "out_lds_rq_spray",
        "out_lds_loc_spray",
    ),
];
