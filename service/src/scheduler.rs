use domain::{
    model::entity::{resource::DEFAULT_MPIPROCS_KEY, ResourceDescriptor, ResourceRequest},
    service::Scheduler,
    ConfigurationError,
};
use serde::Deserialize;

/// Scheduler families known to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchedulerKind {
    Direct,
    Slurm,
    Pbspro,
    Torque,
    Lsf,
    Sge,
}

/// Resources given as machines and processes per machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeNumberScheduler;

/// Resources given as a parallel environment and a slot count.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParEnvScheduler;

/// Resources given as a total process count.
#[derive(Debug, Default, Clone, Copy)]
pub struct LsfScheduler;

impl SchedulerKind {
    pub fn scheduler(self) -> Box<dyn Scheduler + Send + Sync> {
        match self {
            Self::Direct | Self::Slurm | Self::Pbspro | Self::Torque => Box::new(NodeNumberScheduler),
            Self::Lsf => Box::new(LsfScheduler),
            Self::Sge => Box::new(ParEnvScheduler),
        }
    }
}

const NODE_NUMBER_FIELDS: &[&str] = &[
    "num_machines",
    "num_mpiprocs_per_machine",
    "tot_num_mpiprocs",
    "num_cores_per_machine",
    "num_cores_per_mpiproc",
    DEFAULT_MPIPROCS_KEY,
];

const PAR_ENV_FIELDS: &[&str] = &["parallel_env", "tot_num_mpiprocs", DEFAULT_MPIPROCS_KEY];

const LSF_FIELDS: &[&str] = &[
    "tot_num_mpiprocs",
    "num_machines",
    "use_num_machines",
    DEFAULT_MPIPROCS_KEY,
];

impl Scheduler for NodeNumberScheduler {
    fn create_job_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<ResourceDescriptor, ConfigurationError> {
        check_known_fields(request, NODE_NUMBER_FIELDS)?;

        let num_machines = positive(request, "num_machines")?;
        let tot_num_mpiprocs = positive(request, "tot_num_mpiprocs")?;
        let num_mpiprocs_per_machine = match positive(request, "num_mpiprocs_per_machine")? {
            Some(n) => Some(n),
            None => positive(request, DEFAULT_MPIPROCS_KEY)?,
        };

        let (num_machines, num_mpiprocs_per_machine) =
            match (num_machines, num_mpiprocs_per_machine, tot_num_mpiprocs) {
                (Some(machines), Some(per_machine), tot) => {
                    let product = machines.checked_mul(per_machine).ok_or_else(|| {
                        ConfigurationError::invalid(
                            "num_machines",
                            format!(
                                "{machines} * {per_machine} processes exceed the supported total"
                            ),
                        )
                    })?;
                    if let Some(tot) = tot {
                        if tot != product {
                            return Err(ConfigurationError::invalid(
                                "tot_num_mpiprocs",
                                format!(
                                    "{tot} is not num_machines * num_mpiprocs_per_machine \
                                     ({machines} * {per_machine})"
                                ),
                            ));
                        }
                    }
                    (machines, per_machine)
                }
                (None, Some(per_machine), Some(tot)) => {
                    if tot % per_machine != 0 {
                        return Err(ConfigurationError::invalid(
                            "tot_num_mpiprocs",
                            format!(
                                "{tot} is not a multiple of num_mpiprocs_per_machine ({per_machine})"
                            ),
                        ));
                    }
                    (tot / per_machine, per_machine)
                }
                (Some(machines), None, Some(tot)) => {
                    if tot % machines != 0 {
                        return Err(ConfigurationError::invalid(
                            "tot_num_mpiprocs",
                            format!("{tot} is not a multiple of num_machines ({machines})"),
                        ));
                    }
                    (machines, tot / machines)
                }
                _ => {
                    return Err(ConfigurationError::invalid(
                        "num_machines",
                        "at least two of num_machines, num_mpiprocs_per_machine and \
                         tot_num_mpiprocs must be given",
                    ))
                }
            };

        let num_cores_per_machine = positive(request, "num_cores_per_machine")?;
        let num_cores_per_mpiproc = positive(request, "num_cores_per_mpiproc")?;
        if let (Some(per_machine), Some(per_proc)) = (num_cores_per_machine, num_cores_per_mpiproc) {
            if per_proc.checked_mul(num_mpiprocs_per_machine) != Some(per_machine) {
                return Err(ConfigurationError::invalid(
                    "num_cores_per_machine",
                    format!(
                        "{per_machine} is not num_cores_per_mpiproc * num_mpiprocs_per_machine \
                         ({per_proc} * {num_mpiprocs_per_machine})"
                    ),
                ));
            }
        }

        Ok(ResourceDescriptor::NodeNumber {
            num_machines,
            num_mpiprocs_per_machine,
            num_cores_per_machine,
            num_cores_per_mpiproc,
        })
    }
}

impl Scheduler for ParEnvScheduler {
    fn create_job_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<ResourceDescriptor, ConfigurationError> {
        check_known_fields(request, PAR_ENV_FIELDS)?;

        let parallel_env = request
            .get_text("parallel_env")?
            .ok_or_else(|| ConfigurationError::invalid("parallel_env", "must be given"))?;
        let tot_num_mpiprocs = positive(request, "tot_num_mpiprocs")?
            .ok_or_else(|| ConfigurationError::invalid("tot_num_mpiprocs", "must be given"))?;

        Ok(ResourceDescriptor::ParEnv {
            parallel_env: parallel_env.to_owned(),
            tot_num_mpiprocs,
        })
    }
}

impl Scheduler for LsfScheduler {
    fn create_job_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<ResourceDescriptor, ConfigurationError> {
        check_known_fields(request, LSF_FIELDS)?;

        let tot_num_mpiprocs = positive(request, "tot_num_mpiprocs")?
            .ok_or_else(|| ConfigurationError::invalid("tot_num_mpiprocs", "must be given"))?;
        let num_machines = positive(request, "num_machines")?;
        let use_num_machines = request.get_bool("use_num_machines")?.unwrap_or(false);
        if use_num_machines && num_machines.is_none() {
            return Err(ConfigurationError::invalid(
                "num_machines",
                "must be given when use_num_machines is set",
            ));
        }

        Ok(ResourceDescriptor::Lsf {
            tot_num_mpiprocs,
            num_machines,
            use_num_machines,
        })
    }
}

fn check_known_fields(request: &ResourceRequest, known: &[&str]) -> Result<(), ConfigurationError> {
    match request.keys().find(|key| !known.contains(key)) {
        Some(key) => Err(ConfigurationError::UnknownResource(key.to_owned())),
        None => Ok(()),
    }
}

fn positive(request: &ResourceRequest, key: &str) -> Result<Option<u64>, ConfigurationError> {
    match request.get_u64(key)? {
        Some(0) => Err(ConfigurationError::invalid(key, "must be at least 1")),
        n => Ok(n),
    }
}
