use crate::model::entity::ExecutionPlan;
use crate::model::vo::Submission;
use crate::service::StagingFolder;
use crate::PlanError;

#[async_trait::async_trait]
pub trait ExecutionPlanService {
    async fn prepare(
        &self,
        submission: &Submission,
        staging: &(dyn StagingFolder + Send + Sync),
    ) -> Result<ExecutionPlan, PlanError>;
}
