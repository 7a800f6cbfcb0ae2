use std::path::Path;

/// Local sandbox that is mirrored into the new remote working directory
/// before any remote copy runs.
#[async_trait::async_trait]
pub trait StagingFolder {
    fn abspath(&self) -> &Path;
    /// Creates `relpath` with all its parents. Succeeds if it already exists.
    async fn ensure_dir(&self, relpath: &str) -> anyhow::Result<()>;
    async fn write_file(&self, relpath: &str, contents: &[u8]) -> anyhow::Result<()>;
    async fn copy_file(&self, source: &Path, relpath: &str) -> anyhow::Result<()>;
}
