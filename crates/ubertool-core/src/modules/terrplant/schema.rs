use super::loc::RISK_QUOTIENTS;
use crate::domain::{FieldSpec, FieldType, ModelError, ModelResult};
use crate::table::Table;
use std::collections::BTreeSet;

pub const VERSION_TERRPLANT: &str = "version_terrplant";
pub const APPLICATION_RATE: &str = "application_rate";
pub const INCORPORATION_DEPTH: &str = "incorporation_depth";
pub const RUNOFF_FRACTION: &str = "runoff_fraction";
pub const DRIFT_FRACTION: &str = "drift_fraction";
pub const CHEMICAL_NAME: &str = "chemical_name";
pub const PC_CODE: &str = "pc_code";
pub const USE: &str = "use";
pub const APPLICATION_METHOD: &str = "application_method";
pub const APPLICATION_FORM: &str = "application_form";
pub const SOLUBILITY: &str = "solubility";
pub const EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT: &str =
    "ec25_nonlisted_seedling_emergence_monocot";
pub const EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT: &str = "ec25_nonlisted_seedling_emergence_dicot";
pub const NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT: &str = "noaec_listed_seedling_emergence_monocot";
pub const NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT: &str = "noaec_listed_seedling_emergence_dicot";
pub const EC25_NONLISTED_VEGETATIVE_VIGOR_MONOCOT: &str = "ec25_nonlisted_vegetative_vigor_monocot";
pub const EC25_NONLISTED_VEGETATIVE_VIGOR_DICOT: &str = "ec25_nonlisted_vegetative_vigor_dicot";
pub const NOAEC_LISTED_VEGETATIVE_VIGOR_MONOCOT: &str = "noaec_listed_vegetative_vigor_monocot";
pub const NOAEC_LISTED_VEGETATIVE_VIGOR_DICOT: &str = "noaec_listed_vegetative_vigor_dicot";

pub const OUT_RUNDRY: &str = "out_rundry";
pub const OUT_RUNSEMI: &str = "out_runsemi";
pub const OUT_TOTALDRY: &str = "out_totaldry";
pub const OUT_TOTALSEMI: &str = "out_totalsemi";
pub const OUT_SPRAY: &str = "out_spray";
pub const OUT_MIN_NMS_SPRAY: &str = "out_min_nms_spray";
pub const OUT_MIN_LMS_SPRAY: &str = "out_min_lms_spray";
pub const OUT_MIN_NDS_SPRAY: &str = "out_min_nds_spray";
pub const OUT_MIN_LDS_SPRAY: &str = "out_min_lds_spray";

pub const INPUT_FIELDS: [FieldSpec; 19] = [
    FieldSpec::category(VERSION_TERRPLANT),
    FieldSpec::float(APPLICATION_RATE),
    FieldSpec::float(INCORPORATION_DEPTH),
    FieldSpec::float(RUNOFF_FRACTION),
    FieldSpec::float(DRIFT_FRACTION),
    FieldSpec::category(CHEMICAL_NAME),
    FieldSpec::category(PC_CODE),
    FieldSpec::category(USE),
    FieldSpec::category(APPLICATION_METHOD),
    FieldSpec::category(APPLICATION_FORM),
    FieldSpec::float(SOLUBILITY),
    FieldSpec::float(EC25_NONLISTED_SEEDLING_EMERGENCE_MONOCOT),
    FieldSpec::float(EC25_NONLISTED_SEEDLING_EMERGENCE_DICOT),
    FieldSpec::float(NOAEC_LISTED_SEEDLING_EMERGENCE_MONOCOT),
    FieldSpec::float(NOAEC_LISTED_SEEDLING_EMERGENCE_DICOT),
    FieldSpec::float(EC25_NONLISTED_VEGETATIVE_VIGOR_MONOCOT),
    FieldSpec::float(EC25_NONLISTED_VEGETATIVE_VIGOR_DICOT),
    FieldSpec::float(NOAEC_LISTED_VEGETATIVE_VIGOR_MONOCOT),
    FieldSpec::float(NOAEC_LISTED_VEGETATIVE_VIGOR_DICOT),
];

pub const OUTPUT_FIELDS: [FieldSpec; 33] = [
    FieldSpec::float(OUT_RUNDRY),
    FieldSpec::float(OUT_RUNSEMI),
    FieldSpec::float(OUT_TOTALDRY),
    FieldSpec::float(OUT_TOTALSEMI),
    FieldSpec::float(OUT_SPRAY),
    FieldSpec::float(OUT_MIN_NMS_SPRAY),
    FieldSpec::float(OUT_MIN_LMS_SPRAY),
    FieldSpec::float(OUT_MIN_NDS_SPRAY),
    FieldSpec::float(OUT_MIN_LDS_SPRAY),
    FieldSpec::float("out_nms_rq_dry"),
    FieldSpec::category("out_nms_loc_dry"),
    FieldSpec::float("out_nms_rq_semi"),
    FieldSpec::category("out_nms_loc_semi"),
    FieldSpec::float("out_nms_rq_spray"),
    FieldSpec::category("out_nms_loc_spray"),
    FieldSpec::float("out_lms_rq_dry"),
    FieldSpec::category("out_lms_loc_dry"),
    FieldSpec::float("out_lms_rq_semi"),
    FieldSpec::category("out_lms_loc_semi"),
    FieldSpec::float("out_lms_rq_spray"),
    FieldSpec::category("out_lms_loc_spray"),
    FieldSpec::float("out_nds_rq_dry"),
    FieldSpec::category("out_nds_loc_dry"),
    FieldSpec::float("out_nds_rq_semi"),
    FieldSpec::category("out_nds_loc_semi"),
    FieldSpec::float("out_nds_rq_spray"),
    FieldSpec::category("out_nds_loc_spray"),
    FieldSpec::float("out_lds_rq_dry"),
    FieldSpec::category("out_lds_loc_dry"),
    FieldSpec::float("out_lds_rq_semi"),
    FieldSpec::category("out_lds_loc_semi"),
    FieldSpec::float("out_lds_rq_spray"),
    FieldSpec::category("out_lds_loc_spray"),
];

/// Cross-checks the static descriptors against the quotient table.
pub fn verify_schema_descriptors() -> ModelResult<()> {
    ensure_unique("input", &INPUT_FIELDS)?;
    ensure_unique("output", &OUTPUT_FIELDS)?;

    for spec in &RISK_QUOTIENTS {
        for threshold in spec.threshold_input_fields() {
            ensure_declared(&INPUT_FIELDS, threshold, FieldType::Float, "input")?;
        }
        ensure_declared(&OUTPUT_FIELDS, spec.exposure.column(), FieldType::Float, "output")?;
        if let Some(minimum_column) = spec.threshold_output_column() {
            ensure_declared(&OUTPUT_FIELDS, minimum_column, FieldType::Float, "output")?;
        }
        ensure_declared(&OUTPUT_FIELDS, spec.rq_column, FieldType::Float, "output")?;
        ensure_declared(&OUTPUT_FIELDS, spec.loc_column, FieldType::Category, "output")?;
    }

    Ok(())
}

/// Order-independent comparison of the supplied column set with [`INPUT_FIELDS`].
pub fn check_input_columns(table: &Table) -> ModelResult<()> {
    let required: BTreeSet<&str> = INPUT_FIELDS.iter().map(|field| field.name).collect();
    let supplied: BTreeSet<&str> = table.column_names().collect();
    if required == supplied {
        return Ok(());
    }

    let missing: Vec<&str> = required.difference(&supplied).copied().collect();
    let unexpected: Vec<&str> = supplied.difference(&required).copied().collect();
    let mut parts = Vec::with_capacity(2);
    if !missing.is_empty() {
        parts.push(format!("missing fields: {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected fields: {}", unexpected.join(", ")));
    }

    Err(ModelError::input_validation(
        "INPUT.SCHEMA_MISMATCH",
        format!(
            "input parameters do not match the terrplant schema ({})",
            parts.join("; ")
        ),
    ))
}

fn ensure_unique(kind: &str, fields: &[FieldSpec]) -> ModelResult<()> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.name) {
            return Err(ModelError::internal(
                "SYS.TERRPLANT_SCHEMA",
                format!("{} field '{}' is declared twice", kind, field.name),
            ));
        }
    }
    Ok(())
}

fn ensure_declared(
    fields: &[FieldSpec],
    name: &str,
    field_type: FieldType,
    kind: &str,
) -> ModelResult<()> {
    match fields.iter().find(|field| field.name == name) {
        Some(field) if field.field_type == field_type => Ok(()),
        Some(field) => Err(ModelError::internal(
            "SYS.TERRPLANT_SCHEMA",
            format!(
                "{} field '{}' is declared as {:?}, expected {:?}",
                kind, name, field.field_type, field_type
            ),
        )),
        None => Err(ModelError::internal(
            "SYS.TERRPLANT_SCHEMA",
            format!("{} field '{}' is not declared", kind, name),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{INPUT_FIELDS, OUTPUT_FIELDS, check_input_columns, verify_schema_descriptors};
    use crate::domain::ModelErrorCategory;
    use crate::table::{CellValue, Table};

    fn table_with_columns<'a>(names: impl IntoIterator<Item = &'a str>) -> Table {
        let mut table = Table::with_row_count(1);
        for name in names {
            table
                .push_column(name, vec![CellValue::Number(1.0)])
                .expect("column should be accepted");
        }
        table
    }

    #[test]
    fn descriptors_are_consistent_with_quotient_table() {
        verify_schema_descriptors().expect("descriptors should be consistent");
        assert_eq!(OUTPUT_FIELDS[0].name, "out_rundry");
        assert_eq!(OUTPUT_FIELDS[32].name, "out_lds_loc_spray");
    }

    #[test]
    fn column_set_comparison_ignores_order() {
        let table = table_with_columns(INPUT_FIELDS.iter().rev().map(|field| field.name));
        check_input_columns(&table).expect("reversed column order should be accepted");
    }

    #[test]
    fn mismatch_names_missing_and_unexpected_fields() {
        let names = INPUT_FIELDS
            .iter()
            .map(|field| field.name)
            .filter(|name| *name != "drift_fraction" && *name != "solubility")
            .chain(["drift"]);
        let table = table_with_columns(names);

        let error = check_input_columns(&table).expect_err("mismatch should be rejected");
        assert_eq!(error.category(), ModelErrorCategory::InputValidationError);
        assert_eq!(error.placeholder(), "INPUT.SCHEMA_MISMATCH");
        assert!(
            error
                .message()
                .contains("missing fields: drift_fraction, solubility; unexpected fields: drift")
        );
    }
}
