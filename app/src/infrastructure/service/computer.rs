use domain::service::{Computer, Scheduler};
use uuid::Uuid;

use crate::config::{ComputerConfig, TransportConfig};
use crate::infrastructure::command::SshConfig;

/// A computer described in the planner configuration.
pub struct ConfiguredComputer {
    label: String,
    uuid: Uuid,
    default_mpiprocs_per_machine: Option<u64>,
    scheduler: Box<dyn Scheduler + Send + Sync>,
    mpirun_command: Vec<String>,
    ssh: Option<SshConfig>,
}

impl ConfiguredComputer {
    pub fn new(config: &ComputerConfig) -> Self {
        let ssh = match &config.transport {
            TransportConfig::Local => None,
            TransportConfig::Ssh(proxy) => Some(SshConfig::new(proxy)),
        };
        Self {
            label: config.label.clone(),
            uuid: config.uuid,
            default_mpiprocs_per_machine: config.default_mpiprocs_per_machine,
            scheduler: config.scheduler.scheduler(),
            mpirun_command: config.mpirun_command.clone(),
            ssh,
        }
    }

    pub fn ssh(&self) -> Option<&SshConfig> {
        self.ssh.as_ref()
    }
}

impl Computer for ConfiguredComputer {
    fn label(&self) -> &str {
        &self.label
    }

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn default_mpiprocs_per_machine(&self) -> Option<u64> {
        self.default_mpiprocs_per_machine
    }

    fn scheduler(&self) -> &(dyn Scheduler + Send + Sync) {
        self.scheduler.as_ref()
    }

    fn mpirun_command(&self) -> &[String] {
        &self.mpirun_command
    }
}
