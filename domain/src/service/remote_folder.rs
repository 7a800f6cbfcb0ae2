use uuid::Uuid;

use crate::model::entity::RemoteListing;
use crate::model::vo::RemoteFolderRef;
use crate::PlanError;

/// A directory living on a computer, reachable through some transport.
#[async_trait::async_trait]
pub trait RemoteFolder {
    fn computer_uuid(&self) -> Uuid;
    /// Absolute path of the folder root on the remote.
    fn remote_path(&self) -> &str;
    /// Lists `relpath`, relative to the folder root.
    async fn list(&self, relpath: &str) -> RemoteListing;
}

pub trait OpenRemoteFolder {
    fn open_remote_folder(
        &self,
        folder: &RemoteFolderRef,
    ) -> Result<Box<dyn RemoteFolder + Send + Sync>, PlanError>;
}
