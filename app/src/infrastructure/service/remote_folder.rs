use std::io::ErrorKind;
use std::path::Path;

use anyhow::{anyhow, Context};
use domain::model::entity::RemoteListing;
use domain::service::RemoteFolder;
use uuid::Uuid;

use crate::infrastructure::command::{shell_quote, MaybeSsh, SshConfig};

/// A folder on a computer sharing the planner's filesystem.
pub struct LocalRemoteFolder {
    computer_uuid: Uuid,
    root: String,
}

/// A folder listed through a shell, over ssh when the computer needs it.
#[derive(derive_more::AsRef)]
pub struct ShellRemoteFolder {
    #[as_ref]
    ssh: Option<SshConfig>,
    computer_uuid: Uuid,
    root: String,
}

impl LocalRemoteFolder {
    pub fn new(computer_uuid: Uuid, root: impl Into<String>) -> Self {
        Self {
            computer_uuid,
            root: root.into(),
        }
    }
}

impl ShellRemoteFolder {
    pub fn new(computer_uuid: Uuid, root: impl Into<String>, ssh: Option<SshConfig>) -> Self {
        Self {
            ssh,
            computer_uuid,
            root: root.into(),
        }
    }
}

#[async_trait::async_trait]
impl RemoteFolder for LocalRemoteFolder {
    fn computer_uuid(&self) -> Uuid {
        self.computer_uuid
    }

    fn remote_path(&self) -> &str {
        &self.root
    }

    async fn list(&self, relpath: &str) -> RemoteListing {
        let path = Path::new(&self.root).join(relpath);
        let mut dir = match tokio::fs::read_dir(&path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotADirectory => return RemoteListing::File,
            Err(e) => {
                return RemoteListing::TransportError(
                    anyhow!(e).context(format!("Unable to read {}", path.display())),
                )
            }
        };

        let mut names = Vec::new();
        loop {
            match dir.next_entry().await {
                Ok(Some(entry)) => names.push(entry.file_name().to_string_lossy().into_owned()),
                Ok(None) => break,
                Err(e) => return RemoteListing::TransportError(e.into()),
            }
        }
        names.sort();
        RemoteListing::Directory(names)
    }
}

#[async_trait::async_trait]
impl RemoteFolder for ShellRemoteFolder {
    fn computer_uuid(&self) -> Uuid {
        self.computer_uuid
    }

    fn remote_path(&self) -> &str {
        &self.root
    }

    async fn list(&self, relpath: &str) -> RemoteListing {
        let path = if relpath == "." {
            self.root.clone()
        } else {
            format!("{}/{relpath}", self.root.trim_end_matches('/'))
        };
        tracing::debug!(%path, ssh = self.is_ssh(), "Listing remote path");

        let out = self
            .shell(&listing_script(&path))
            .output()
            .await
            .context("Unable to spawn the listing shell");
        match out {
            Ok(out) => classify(out.status.success(), &out.stdout, &out.stderr),
            Err(e) => RemoteListing::TransportError(e),
        }
    }
}

/// The trailing slash makes `ls` refuse files instead of printing them. The
/// C locale keeps its error messages in English for `classify`.
fn listing_script(path: &str) -> String {
    format!("LC_ALL=C ls -1A -- {}", shell_quote(&format!("{path}/")))
}

fn classify(success: bool, stdout: &[u8], stderr: &[u8]) -> RemoteListing {
    if success {
        return RemoteListing::Directory(
            String::from_utf8_lossy(stdout)
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        );
    }
    let stderr = String::from_utf8_lossy(stderr);
    if stderr.contains("Not a directory") {
        RemoteListing::File
    } else {
        RemoteListing::TransportError(anyhow!("listing failed: {}", stderr.trim()))
    }
}
