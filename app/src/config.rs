use std::path::Path;

use domain::model::vo::PlanDefaults;
use serde::*;
use service::prelude::SchedulerKind;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "Default::default")]
    pub log: LogConfig,

    #[serde(default = "Default::default")]
    pub defaults: PlanDefaults,

    #[serde(default = "Default::default")]
    pub computers: Vec<ComputerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_level")]
    pub level: String,

    #[serde(default = "Default::default")]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComputerConfig {
    pub label: String,

    pub uuid: Uuid,

    #[serde(default = "ComputerConfig::default_scheduler")]
    pub scheduler: SchedulerKind,

    #[serde(default = "Default::default")]
    pub default_mpiprocs_per_machine: Option<u64>,

    #[serde(default = "ComputerConfig::default_mpirun_command")]
    pub mpirun_command: Vec<String>,

    #[serde(default = "Default::default")]
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    #[default]
    Local,
    Ssh(SshProxyConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SshProxyConfig {
    pub host: String,

    pub username: String,

    #[serde(default = "SshProxyConfig::default_port")]
    pub port: u16,
}

/// Layers the configuration file and `CUSP__*` environment variables.
pub fn build_config(path: &Path) -> Result<config::Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("CUSP").separator("__"))
        .build()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

impl LogConfig {
    pub fn default_level() -> String {
        "info".to_owned()
    }
}

impl ComputerConfig {
    pub fn default_scheduler() -> SchedulerKind {
        SchedulerKind::Direct
    }

    pub fn default_mpirun_command() -> Vec<String> {
        ["mpirun", "-np", "{tot_num_mpiprocs}"].map(String::from).to_vec()
    }
}

impl SshProxyConfig {
    pub fn default_port() -> u16 {
        22
    }
}
