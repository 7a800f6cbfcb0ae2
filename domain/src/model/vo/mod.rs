pub mod command;
pub mod defaults;
pub mod submission;

#[rustfmt::skip]
pub use self::{
    command::CommandVector,
    defaults::PlanDefaults,
    submission::{
        CalculationKindType, Code, RemoteFolderRef, RestartInput, Submission, SubmissionOptions,
        SupervisorInput,
    },
};
