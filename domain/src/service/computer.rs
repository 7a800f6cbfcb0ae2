use uuid::Uuid;

use crate::model::entity::{ResourceDescriptor, ResourceRequest};
use crate::ConfigurationError;

/// Turns a resource request into the resources the scheduler will allocate.
pub trait Scheduler {
    fn create_job_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<ResourceDescriptor, ConfigurationError>;
}

/// A machine calculations are submitted to.
pub trait Computer {
    fn label(&self) -> &str;
    fn uuid(&self) -> Uuid;
    fn default_mpiprocs_per_machine(&self) -> Option<u64>;
    fn scheduler(&self) -> &(dyn Scheduler + Send + Sync);
    /// Launcher template, e.g. `["mpirun", "-np", "{tot_num_mpiprocs}"]`.
    fn mpirun_command(&self) -> &[String];
}

pub trait SelectComputer {
    fn computer(&self, label: &str) -> Option<&(dyn Computer + Send + Sync)>;
}
