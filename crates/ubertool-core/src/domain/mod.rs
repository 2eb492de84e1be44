pub mod errors;

pub use errors::{ModelError, ModelErrorCategory, ModelResult, RowError, RowErrorKind};

use crate::table::Table;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Terrplant,
}

impl ModelKind {
    pub const ALL: [ModelKind; 1] = [ModelKind::Terrplant];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terrplant => "terrplant",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(token.trim()))
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Terrplant => {
                "TerrPLANT provides screening level estimates of exposure to terrestrial plants \
                 from single pesticide applications through runoff or drift. Monocots and dicots \
                 found in dry or semi-aquatic habitats can be evaluated using this model. Exposure \
                 estimates can be generated for both listed and non-listed species using TerrPLANT."
            }
        }
    }
}

impl Display for ModelKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunType {
    #[default]
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Float,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldSpec {
    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Float,
        }
    }

    pub const fn category(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Category,
        }
    }
}

/// One evaluation request as handed over by the boundary layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub run_id: String,
    pub model: ModelKind,
    pub version_tag: String,
    pub run_type: RunType,
    pub inputs: Table,
    pub expected: Option<Table>,
}

impl ModelRequest {
    pub fn new(
        run_id: impl Into<String>,
        model: ModelKind,
        version_tag: impl Into<String>,
        inputs: Table,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            model,
            version_tag: version_tag.into(),
            run_type: RunType::Single,
            inputs,
            expected: None,
        }
    }

    pub fn with_expected(mut self, expected: Table) -> Self {
        self.expected = Some(expected);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelKind, ModelRequest, RunType};
    use crate::table::Table;

    #[test]
    fn model_kind_parses_case_insensitively() {
        assert_eq!(ModelKind::parse("TerrPlant"), Some(ModelKind::Terrplant));
        assert_eq!(ModelKind::parse(" terrplant "), Some(ModelKind::Terrplant));
        assert_eq!(ModelKind::parse("stir"), None);
        assert_eq!(ModelKind::Terrplant.to_string(), "terrplant");
    }

    #[test]
    fn request_defaults_to_single_run_without_expected_table() {
        let request = ModelRequest::new("job-1", ModelKind::Terrplant, "1.2.2", Table::default());
        assert_eq!(request.run_type, RunType::Single);
        assert!(request.expected.is_none());

        let request = request.with_expected(Table::default());
        assert!(request.expected.is_some());
    }
}
