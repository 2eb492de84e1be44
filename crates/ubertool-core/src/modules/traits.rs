use super::ModelRun;
use crate::domain::{ModelRequest, ModelResult};

pub trait ModelExecutor {
    fn execute(&self, request: &ModelRequest) -> ModelResult<ModelRun>;
}
