use domain::{
    model::{
        entity::ExecutionPlan,
        vo::{CalculationKindType, RemoteFolderRef, Submission},
    },
    service::{
        CalculationKind, Computer, ExecutionPlanService, OpenRemoteFolder, RemoteFolder,
        SelectCalculationKind, SelectComputer, StagingFolder,
    },
    ConfigurationError, PlanError,
};
use service::prelude::*;

use super::Container;
use crate::infrastructure::service::{ConfiguredComputer, LocalRemoteFolder, ShellRemoteFolder};

impl Container {
    fn configured(&self, label: &str) -> Option<&ConfiguredComputer> {
        self.computers.iter().find(|computer| computer.label() == label)
    }
}

impl SelectComputer for Container {
    fn computer(&self, label: &str) -> Option<&(dyn Computer + Send + Sync)> {
        self.configured(label)
            .map(|computer| computer as &(dyn Computer + Send + Sync))
    }
}

impl SelectCalculationKind for Container {
    fn select(&self, kind: CalculationKindType) -> &(dyn CalculationKind + Send + Sync) {
        match kind {
            CalculationKindType::Vasp => &self.vasp,
            CalculationKindType::Neb => &self.neb,
        }
    }
}

impl OpenRemoteFolder for Container {
    fn open_remote_folder(
        &self,
        folder: &RemoteFolderRef,
    ) -> Result<Box<dyn RemoteFolder + Send + Sync>, PlanError> {
        let computer = self
            .configured(&folder.computer)
            .ok_or_else(|| ConfigurationError::UnknownComputer(folder.computer.clone()))?;
        let remote: Box<dyn RemoteFolder + Send + Sync> = match computer.ssh() {
            None => Box::new(LocalRemoteFolder::new(computer.uuid(), folder.path.as_str())),
            Some(ssh) => Box::new(ShellRemoteFolder::new(
                computer.uuid(),
                folder.path.as_str(),
                Some(ssh.clone()),
            )),
        };
        Ok(remote)
    }
}

#[async_trait::async_trait]
impl ExecutionPlanService for Container {
    async fn prepare(
        &self,
        submission: &Submission,
        staging: &(dyn StagingFolder + Send + Sync),
    ) -> Result<ExecutionPlan, PlanError> {
        ExecutionPlanServiceImpl::inj_ref(self).prepare(submission, staging).await
    }
}
