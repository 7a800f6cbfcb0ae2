use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use uuid::Uuid;

use crate::model::entity::{HandlerConfig, ResourceRequest, SupervisorTuning};

/// Which family of calculation is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CalculationKindType {
    /// Single VASP run.
    Vasp,
    /// Nudged elastic band run over several images.
    Neb,
}

/// An installed executable on a computer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Code {
    pub uuid: Uuid,
    pub exec_name: String,
    /// Label of the computer the code is installed on.
    pub computer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionOptions {
    #[serde(default)]
    pub resources: ResourceRequest,

    #[serde(default = "SubmissionOptions::default_with_mpi")]
    pub with_mpi: bool,

    /// Extra launcher flags placed between the launcher and the executable.
    #[serde(default)]
    pub mpirun_extra_params: Vec<String>,

    #[serde(default)]
    pub submit_script_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupervisorInput {
    pub code: Code,

    #[serde(default)]
    pub handlers: HandlerConfig,

    #[serde(default)]
    pub settings: SupervisorTuning,
}

/// A working directory of a previous run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFolderRef {
    pub computer: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestartInput {
    pub folder: RemoteFolderRef,

    /// Stage the previous final structure as the new initial structure.
    #[serde(default = "RestartInput::default_contcar_to_poscar")]
    pub contcar_to_poscar: bool,
}

/// A request to prepare one calculation for submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submission {
    #[serde(default = "Uuid::new_v4")]
    pub uuid: Uuid,

    pub kind: CalculationKindType,

    pub code: Code,

    #[serde(default)]
    pub options: SubmissionOptions,

    #[serde(default)]
    pub supervisor: Option<SupervisorInput>,

    #[serde(default)]
    pub restart: Option<RestartInput>,

    /// Local input files, keyed by their path relative to the working
    /// directory.
    #[serde(default)]
    pub inputs: BTreeMap<String, PathBuf>,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            resources: ResourceRequest::default(),
            with_mpi: Self::default_with_mpi(),
            mpirun_extra_params: Vec::new(),
            submit_script_filename: None,
        }
    }
}

impl SubmissionOptions {
    /// VASP is normally run in parallel.
    pub fn default_with_mpi() -> bool {
        true
    }
}

impl RestartInput {
    pub fn default_contcar_to_poscar() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn deserialize_minimal() {
        let s = indoc! {r#"
            kind: vasp
            code:
              uuid: 46099d7c-a982-41a0-9370-cac6df35114e
              exec_name: vasp_std
              computer: cluster
        "#};
        let submission: Submission = serde_yaml::from_str(s).unwrap();
        assert_eq!(submission.kind, CalculationKindType::Vasp);
        assert!(submission.options.with_mpi);
        assert!(submission.supervisor.is_none());
        assert!(submission.restart.is_none());
    }

    #[test]
    fn deserialize_supervised_restart() {
        let s = indoc! {r#"
            kind: neb
            code:
              uuid: 46099d7c-a982-41a0-9370-cac6df35114e
              exec_name: vasp_std
              computer: cluster
            options:
              resources:
                num_machines: 2
              mpirun_extra_params: ["--bind-to", "core"]
            supervisor:
              code:
                uuid: 10b712f0-5577-4f79-a582-330b51abbc13
                exec_name: cstdn
                computer: cluster
              handlers:
                VaspErrorHandler: {}
              settings:
                max_errors: 3
            restart:
              folder:
                computer: cluster
                path: /scratch/run/1
        "#};
        let submission: Submission = serde_yaml::from_str(s).unwrap();
        let supervisor = submission.supervisor.unwrap();
        assert_eq!(supervisor.settings.max_errors, 3);
        assert_eq!(supervisor.settings.monitor_freq, 30);
        let restart = submission.restart.unwrap();
        assert!(restart.contcar_to_poscar);
        assert_eq!(restart.folder.path, "/scratch/run/1");
        assert_eq!(submission.options.mpirun_extra_params, ["--bind-to", "core"]);
    }
}
