use super::traits::ModelExecutor;
use super::{ModelRun, terrplant};
use crate::config::ComparisonPolicy;
use crate::domain::{FieldSpec, ModelKind, ModelRequest, ModelResult};

/// Runs the requested model, comparing any expected outputs under the built-in policy.
pub fn execute_model(request: &ModelRequest) -> ModelResult<ModelRun> {
    execute_model_with_policy(request, &ComparisonPolicy::default())
}

pub fn execute_model_with_policy(
    request: &ModelRequest,
    policy: &ComparisonPolicy,
) -> ModelResult<ModelRun> {
    match request.model {
        ModelKind::Terrplant => {
            terrplant::TerrplantModule::with_policy(policy.clone()).execute(request)
        }
    }
}

/// Input and output descriptors of a hosted model.
pub fn schema_for_model(model: ModelKind) -> (&'static [FieldSpec], &'static [FieldSpec]) {
    match model {
        ModelKind::Terrplant => (
            &terrplant::schema::INPUT_FIELDS,
            &terrplant::schema::OUTPUT_FIELDS,
        ),
    }
}
