use serde::Deserialize;

/// Filenames shared between the planner and the rest of the submission
/// machinery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanDefaults {
    #[serde(default = "PlanDefaults::default_stdout_name")]
    pub stdout_name: String,

    #[serde(default = "PlanDefaults::default_stderr_name")]
    pub stderr_name: String,

    #[serde(default = "PlanDefaults::default_supervisor_spec_name")]
    pub supervisor_spec_name: String,

    /// Final structure written by a finished run.
    #[serde(default = "PlanDefaults::default_continuation_output_name")]
    pub continuation_output_name: String,

    /// Structure read by a fresh run.
    #[serde(default = "PlanDefaults::default_initial_input_name")]
    pub initial_input_name: String,

    #[serde(default = "PlanDefaults::default_submit_script_name")]
    pub submit_script_name: String,

    #[serde(default = "PlanDefaults::default_job_template_name")]
    pub job_template_name: String,

    #[serde(default = "PlanDefaults::default_calc_info_name")]
    pub calc_info_name: String,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            stdout_name: Self::default_stdout_name(),
            stderr_name: Self::default_stderr_name(),
            supervisor_spec_name: Self::default_supervisor_spec_name(),
            continuation_output_name: Self::default_continuation_output_name(),
            initial_input_name: Self::default_initial_input_name(),
            submit_script_name: Self::default_submit_script_name(),
            job_template_name: Self::default_job_template_name(),
            calc_info_name: Self::default_calc_info_name(),
        }
    }
}

impl PlanDefaults {
    pub fn default_stdout_name() -> String {
        "aiida.out".to_owned()
    }

    pub fn default_stderr_name() -> String {
        "aiida.err".to_owned()
    }

    pub fn default_supervisor_spec_name() -> String {
        "cstdn_spec.yaml".to_owned()
    }

    pub fn default_continuation_output_name() -> String {
        "CONTCAR".to_owned()
    }

    pub fn default_initial_input_name() -> String {
        "POSCAR".to_owned()
    }

    pub fn default_submit_script_name() -> String {
        "_aiidasubmit.sh".to_owned()
    }

    pub fn default_job_template_name() -> String {
        "job_tmpl.json".to_owned()
    }

    pub fn default_calc_info_name() -> String {
        "calcinfo.json".to_owned()
    }
}
