mod calculation_kind;
mod computer;
mod execution_plan_service;
mod remote_folder;
mod staging_folder;

#[rustfmt::skip]
pub use self::{
    calculation_kind::{CalculationKind, InputContext, SelectCalculationKind},
    computer::{Computer, Scheduler, SelectComputer},
    execution_plan_service::ExecutionPlanService,
    remote_folder::{OpenRemoteFolder, RemoteFolder},
    staging_folder::StagingFolder,
};
