pub mod terrplant;

mod dispatch;
mod run;
mod traits;

pub use dispatch::{execute_model, execute_model_with_policy, schema_for_model};
pub use run::{ModelRun, ModelRunResponse, RESPONSE_USER_ID};
pub use traits::ModelExecutor;
