use serde::{Deserialize, Serialize};

use crate::model::vo::CommandVector;

/// Handler declarations for the supervisor. Validated by the supervisor
/// itself, never inspected while planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerConfig(pub serde_json::Value);

/// User facing tuning knobs of the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorTuning {
    /// Accepted errors before the calculation is terminated.
    #[serde(default = "SupervisorTuning::default_max_errors")]
    pub max_errors: u32,

    /// Seconds between two checks for completion.
    #[serde(default = "SupervisorTuning::default_polling_time_step")]
    pub polling_time_step: u32,

    /// Polling steps between two error checks.
    #[serde(default = "SupervisorTuning::default_monitor_freq")]
    pub monitor_freq: u32,

    #[serde(default)]
    pub skip_over_errors: bool,
}

/// Configuration consumed by the fault-tolerant wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupervisorSettings {
    /// Command the supervisor uses to start the computation binary.
    pub command: CommandVector,
    pub stdout_name: String,
    pub stderr_name: String,
    pub max_errors: u32,
    pub polling_time_step: u32,
    pub monitor_freq: u32,
    pub skip_over_errors: bool,
    pub handlers: HandlerConfig,
    /// Restartable multi-image run mode instead of a single run.
    pub multi_image: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self(serde_json::Value::Object(Default::default()))
    }
}

impl Default for SupervisorTuning {
    fn default() -> Self {
        Self {
            max_errors: Self::default_max_errors(),
            polling_time_step: Self::default_polling_time_step(),
            monitor_freq: Self::default_monitor_freq(),
            skip_over_errors: false,
        }
    }
}

impl SupervisorTuning {
    pub fn default_max_errors() -> u32 {
        10
    }

    pub fn default_polling_time_step() -> u32 {
        10
    }

    pub fn default_monitor_freq() -> u32 {
        30
    }
}
