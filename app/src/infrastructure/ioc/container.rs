use service::prelude::ExecutionPlanState;
use typed_builder::TypedBuilder;

use crate::infrastructure::service::{ConfiguredComputer, VaspCalculation};

#[derive(derive_more::AsRef, TypedBuilder)]
pub struct Container {
    #[as_ref]
    pub(super) plan: ExecutionPlanState,

    pub(super) computers: Vec<ConfiguredComputer>,

    #[builder(default = VaspCalculation::single())]
    pub(super) vasp: VaspCalculation,

    #[builder(default = VaspCalculation::neb())]
    pub(super) neb: VaspCalculation,
}
