use crate::model::entity::ExecutionPlan;
use crate::model::vo::{CalculationKindType, PlanDefaults, Submission};
use crate::service::StagingFolder;
use crate::PlanError;

pub struct InputContext<'a> {
    pub submission: &'a Submission,
    pub staging: &'a (dyn StagingFolder + Send + Sync),
    pub defaults: &'a PlanDefaults,
}

/// Writes the calculation specific inputs into the staging area.
#[async_trait::async_trait]
pub trait CalculationKind {
    /// Whether the calculation runs several images in one job.
    fn multi_image(&self) -> bool;

    fn supports_restart(&self) -> bool {
        true
    }

    async fn build_fresh_inputs(
        &self,
        ctx: &InputContext<'_>,
        plan: &mut ExecutionPlan,
    ) -> Result<(), PlanError>;

    /// Inputs complementing the files copied over from the restart folder.
    async fn build_restart_inputs(
        &self,
        ctx: &InputContext<'_>,
        plan: &mut ExecutionPlan,
    ) -> Result<(), PlanError>;
}

pub trait SelectCalculationKind {
    fn select(&self, kind: CalculationKindType) -> &(dyn CalculationKind + Send + Sync);
}
