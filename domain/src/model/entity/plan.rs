use serde::Serialize;
use uuid::Uuid;

use super::SupervisorSettings;

/// How the codes of a plan are executed relative to each other.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeRunMode {
    #[default]
    Serial,
    Parallel,
}

/// One executable invocation of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub code_uuid: Uuid,
    /// Launcher tokens put in front of the executable, empty unless
    /// `with_mpi` is set.
    pub launcher: Vec<String>,
    pub executable: String,
    pub cmdline_params: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_name: Option<String>,
    pub with_mpi: bool,
}

/// A remote-to-remote copy instruction: `(computer, source, target)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RemoteCopy {
    pub computer_uuid: Uuid,
    /// Absolute path on the remote.
    pub source: String,
    /// Path relative to the new working directory, including the filename.
    pub target: String,
}

/// The supervisor configuration together with the name it is staged under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupervisorSpecFile {
    pub filename: String,
    pub settings: SupervisorSettings,
}

/// Everything needed to submit one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionPlan {
    pub uuid: Uuid,
    pub codes_info: Vec<CodeInfo>,
    pub codes_run_mode: CodeRunMode,
    /// Paths, relative to the staging area, of files written by the
    /// calculation kind.
    pub local_copy_list: Vec<String>,
    pub remote_copy_list: Vec<RemoteCopy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<SupervisorSpecFile>,
}

impl CodeInfo {
    /// The complete command vector as it ends up in the submission script.
    pub fn run_line(&self) -> Vec<String> {
        self.launcher
            .iter()
            .chain(std::iter::once(&self.executable))
            .chain(&self.cmdline_params)
            .cloned()
            .collect()
    }
}

impl ExecutionPlan {
    pub fn new(uuid: Uuid, code_info: CodeInfo) -> Self {
        Self {
            uuid,
            codes_info: vec![code_info],
            codes_run_mode: CodeRunMode::Serial,
            local_copy_list: Vec::new(),
            remote_copy_list: Vec::new(),
            supervisor: None,
        }
    }

    pub fn is_supervised(&self) -> bool {
        self.supervisor.is_some()
    }
}
