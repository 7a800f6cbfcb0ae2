use std::error::Error as StdError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors surfaced while preparing a submission. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Missing or invalid resource / launcher configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Transport failure while listing the restart folder.
    #[error("cannot access remote path `{path}`: {source}")]
    RemoteAccess {
        path: String,
        #[source]
        source: BoxError,
    },

    /// The calculation kind does not implement the requested branch.
    #[error("calculation kind `{kind}` does not support {operation}")]
    UnsupportedOperation {
        kind: String,
        operation: &'static str,
    },

    /// Local staging area could not be written.
    #[error("cannot prepare staging path `{path}`: {source}")]
    Staging {
        path: String,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("launcher template references `{0}` which the job resource does not define")]
    MissingTemplateField(String),

    #[error("malformed launcher template token `{0}`")]
    MalformedTemplate(String),

    #[error("unknown resource field `{0}`")]
    UnknownResource(String),

    #[error("invalid resource `{field}`: {reason}")]
    InvalidResource { field: String, reason: String },

    #[error("no computer labelled `{0}` is configured")]
    UnknownComputer(String),

    #[error("restart folder `{0}` is not a directory")]
    RestartRootNotDirectory(String),
}

impl PlanError {
    pub fn remote_access(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::RemoteAccess {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn staging(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Staging {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl ConfigurationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
