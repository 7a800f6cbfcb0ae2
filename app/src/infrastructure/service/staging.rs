use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use domain::service::StagingFolder;

/// The sandbox on the planner's disk mirrored into the new working directory.
pub struct LocalStagingFolder {
    root: PathBuf,
}

impl LocalStagingFolder {
    pub async fn create(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Unable to create staging folder {}", root.display()))?;
        Ok(Self { root })
    }

    fn resolve(&self, relpath: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(relpath);
        if !relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            anyhow::bail!("`{relpath}` is not inside the staging folder");
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_parent(path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StagingFolder for LocalStagingFolder {
    fn abspath(&self) -> &Path {
        &self.root
    }

    async fn ensure_dir(&self, relpath: &str) -> anyhow::Result<()> {
        let path = self.resolve(relpath)?;
        tokio::fs::create_dir_all(&path)
            .await
            .with_context(|| format!("Unable to create {}", path.display()))
    }

    async fn write_file(&self, relpath: &str, contents: &[u8]) -> anyhow::Result<()> {
        let path = self.resolve(relpath)?;
        Self::ensure_parent(&path).await?;
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Unable to write {}", path.display()))
    }

    async fn copy_file(&self, source: &Path, relpath: &str) -> anyhow::Result<()> {
        let path = self.resolve(relpath)?;
        Self::ensure_parent(&path).await?;
        tokio::fs::copy(source, &path)
            .await
            .with_context(|| format!("Unable to copy {} to {}", source.display(), path.display()))?;
        Ok(())
    }
}
