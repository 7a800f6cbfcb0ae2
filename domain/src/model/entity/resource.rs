use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Key under which a computer's default per-node process count is handed to
/// the scheduler.
pub const DEFAULT_MPIPROCS_KEY: &str = "default_mpiprocs_per_machine";

/// A single user supplied resource value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    Bool(bool),
    Int(u64),
    Text(String),
}

/// Resources as requested by the submitter, e.g.
/// `{num_machines: 2, num_mpiprocs_per_machine: 16}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRequest(BTreeMap<String, ResourceValue>);

/// Resources after the scheduler has validated the request and filled in the
/// derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceDescriptor {
    /// Machines times processes per machine (direct, slurm, pbspro, torque).
    NodeNumber {
        num_machines: u64,
        num_mpiprocs_per_machine: u64,
        num_cores_per_machine: Option<u64>,
        num_cores_per_mpiproc: Option<u64>,
    },
    /// A named parallel environment with a total slot count (sge).
    ParEnv {
        parallel_env: String,
        tot_num_mpiprocs: u64,
    },
    /// Total process count with an optional machine count (lsf).
    Lsf {
        tot_num_mpiprocs: u64,
        num_machines: Option<u64>,
        use_num_machines: bool,
    },
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl ResourceRequest {
    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ResourceValue) -> Option<ResourceValue> {
        self.0.insert(key.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ResourceValue::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(ConfigurationError::invalid(
                key,
                format!("expected a non-negative integer, got `{other}`"),
            )),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ResourceValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ConfigurationError::invalid(
                key,
                format!("expected a boolean, got `{other}`"),
            )),
        }
    }

    pub fn get_text(&self, key: &str) -> Result<Option<&str>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ResourceValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(ConfigurationError::invalid(
                key,
                format!("expected text, got `{other}`"),
            )),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, ResourceValue)> for ResourceRequest {
    fn from_iter<T: IntoIterator<Item = (K, ResourceValue)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl ResourceDescriptor {
    /// Total number of processes the scheduler will allocate.
    pub fn tot_num_mpiprocs(&self) -> u64 {
        match self {
            Self::NodeNumber {
                num_machines,
                num_mpiprocs_per_machine,
                ..
            } => num_machines.saturating_mul(*num_mpiprocs_per_machine),
            Self::ParEnv {
                tot_num_mpiprocs, ..
            }
            | Self::Lsf {
                tot_num_mpiprocs, ..
            } => *tot_num_mpiprocs,
        }
    }

    pub fn num_mpiprocs_per_machine(&self) -> Option<u64> {
        match self {
            Self::NodeNumber {
                num_mpiprocs_per_machine,
                ..
            } => Some(*num_mpiprocs_per_machine),
            _ => None,
        }
    }

    /// Every field set on the resource, rendered for launcher templates.
    /// Unset optional fields are left out.
    pub fn fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        match self {
            Self::NodeNumber {
                num_machines,
                num_mpiprocs_per_machine,
                num_cores_per_machine,
                num_cores_per_mpiproc,
            } => {
                fields.insert("num_machines", num_machines.to_string());
                fields.insert("num_mpiprocs_per_machine", num_mpiprocs_per_machine.to_string());
                if let Some(n) = num_cores_per_machine {
                    fields.insert("num_cores_per_machine", n.to_string());
                }
                if let Some(n) = num_cores_per_mpiproc {
                    fields.insert("num_cores_per_mpiproc", n.to_string());
                }
            }
            Self::ParEnv {
                parallel_env,
                tot_num_mpiprocs,
            } => {
                fields.insert("parallel_env", parallel_env.clone());
                fields.insert("tot_num_mpiprocs", tot_num_mpiprocs.to_string());
            }
            Self::Lsf {
                tot_num_mpiprocs,
                num_machines,
                use_num_machines,
            } => {
                fields.insert("tot_num_mpiprocs", tot_num_mpiprocs.to_string());
                if let Some(n) = num_machines {
                    fields.insert("num_machines", n.to_string());
                }
                fields.insert("use_num_machines", use_num_machines.to_string());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn deserialize_request() {
        let s = indoc! {r#"
            num_machines: 2
            parallel_env: mpi
            use_num_machines: true
        "#};
        let request: ResourceRequest = serde_yaml::from_str(s).unwrap();
        assert_eq!(request.get_u64("num_machines").unwrap(), Some(2));
        assert_eq!(request.get_text("parallel_env").unwrap(), Some("mpi"));
        assert_eq!(request.get_bool("use_num_machines").unwrap(), Some(true));
        assert!(request.get_u64("parallel_env").is_err());
    }

    #[test]
    fn node_number_fields() {
        let resource = ResourceDescriptor::NodeNumber {
            num_machines: 2,
            num_mpiprocs_per_machine: 8,
            num_cores_per_machine: None,
            num_cores_per_mpiproc: Some(1),
        };
        assert_eq!(resource.tot_num_mpiprocs(), 16);
        let fields = resource.fields();
        assert_eq!(fields["num_machines"], "2");
        assert_eq!(fields["num_cores_per_mpiproc"], "1");
        assert!(!fields.contains_key("num_cores_per_machine"));
    }

    #[test]
    fn total_does_not_wrap() {
        let resource = ResourceDescriptor::NodeNumber {
            num_machines: u64::MAX,
            num_mpiprocs_per_machine: 2,
            num_cores_per_machine: None,
            num_cores_per_mpiproc: None,
        };
        assert_eq!(resource.tot_num_mpiprocs(), u64::MAX);
    }
}
