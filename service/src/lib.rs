pub mod plan;
pub mod resource;
pub mod restart;
pub mod run_line;
pub mod scheduler;
pub mod supervisor;

pub mod prelude {
    #[rustfmt::skip]
    pub use super::{
        plan::{ExecutionPlanServiceImpl, ExecutionPlanState},
        restart::{ExclusionSet, RemoteTreeSynchronizer, RenameRule},
        run_line::RunLine,
        scheduler::SchedulerKind,
    };
}
