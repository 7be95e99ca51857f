pub mod actuator;
pub mod inspector;
pub mod orchestrator;
pub mod report;
pub mod thresholds;

pub use actuator::ReclamationActuator;
pub use inspector::SessionInspector;
pub use orchestrator::{FatalError, RunOrchestrator};
pub use report::{FatalBody, ReclamationOutcome, RunReport, RunResponse, SessionResult};

use std::sync::Arc;

use crate::config::Config;
use crate::directory::DirectoryApi;

/// The single entry point: one full reclamation pass against the directory.
pub async fn run_reclamation(
    api: Arc<dyn DirectoryApi>,
    config: &Config,
) -> Result<RunReport, FatalError> {
    RunOrchestrator::new(api, config).run().await
}
