use domain::{
    model::vo::{CommandVector, SubmissionOptions},
    service::Computer,
    ConfigurationError,
};

use crate::resource::negotiate;

/// The invocation of the computation binary, split into launcher and
/// executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLine {
    /// Base launcher tokens followed by the user's extra launcher flags.
    pub launcher: Vec<String>,
    pub executable: String,
}

impl RunLine {
    /// `launcher ++ extra ++ [executable]` when running in parallel, just
    /// `[executable]` otherwise. The launcher is only negotiated when needed.
    pub fn compose(
        computer: &dyn Computer,
        options: &SubmissionOptions,
        executable: &str,
    ) -> Result<Self, ConfigurationError> {
        let launcher = if options.with_mpi {
            let mut launcher = negotiate(computer, &options.resources)?.base;
            launcher.extend(options.mpirun_extra_params.iter().cloned());
            launcher
        } else {
            Vec::new()
        };

        Ok(Self {
            launcher,
            executable: executable.to_owned(),
        })
    }

    pub fn command(&self) -> CommandVector {
        self.launcher
            .iter()
            .chain(std::iter::once(&self.executable))
            .map(String::as_str)
            .collect()
    }
}
