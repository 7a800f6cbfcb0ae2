use std::path::Path;

use domain::{
    model::entity::ExecutionPlan,
    service::{CalculationKind, InputContext},
    PlanError,
};

/// VASP inputs supplied as local files. The multi-image flavour prepares
/// nudged elastic band runs, one subfolder per image.
#[derive(Debug, Clone, Copy)]
pub struct VaspCalculation {
    multi_image: bool,
}

impl VaspCalculation {
    pub fn single() -> Self {
        Self { multi_image: false }
    }

    pub fn neb() -> Self {
        Self { multi_image: true }
    }

    async fn stage(
        &self,
        ctx: &InputContext<'_>,
        plan: &mut ExecutionPlan,
        skip_name: Option<&str>,
    ) -> Result<(), PlanError> {
        if ctx.submission.inputs.is_empty() {
            tracing::warn!(calc = %ctx.submission.uuid, "No input files to stage");
        }
        for (target, source) in &ctx.submission.inputs {
            let name = Path::new(target).file_name().and_then(|name| name.to_str());
            if skip_name.is_some() && name == skip_name {
                tracing::debug!(%target, "Supplied by the restart folder");
                continue;
            }
            ctx.staging
                .copy_file(source, target)
                .await
                .map_err(|e| PlanError::staging(target.as_str(), e))?;
            plan.local_copy_list.push(target.clone());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CalculationKind for VaspCalculation {
    fn multi_image(&self) -> bool {
        self.multi_image
    }

    async fn build_fresh_inputs(
        &self,
        ctx: &InputContext<'_>,
        plan: &mut ExecutionPlan,
    ) -> Result<(), PlanError> {
        self.stage(ctx, plan, None).await
    }

    async fn build_restart_inputs(
        &self,
        ctx: &InputContext<'_>,
        plan: &mut ExecutionPlan,
    ) -> Result<(), PlanError> {
        let renamed = ctx
            .submission
            .restart
            .as_ref()
            .is_some_and(|restart| restart.contcar_to_poscar);
        let skip_name = renamed.then_some(ctx.defaults.initial_input_name.as_str());
        self.stage(ctx, plan, skip_name).await
    }
}
