use std::collections::{BTreeSet, HashSet};

use domain::{
    model::entity::{join_relpath, RemoteCopy, RemoteFileEntry, RemoteListing},
    service::{RemoteFolder, StagingFolder},
    ConfigurationError, PlanError,
};

/// Filenames never copied from a restart folder, matched by name only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<String>);

/// Renames the continuation output to the initial input when enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
    pub enabled: bool,
}

/// Builds the remote-to-remote copy list of a restarted calculation.
#[derive(Debug, Clone)]
pub struct RemoteTreeSynchronizer {
    pub exclusions: ExclusionSet,
    pub rename: RenameRule,
}

impl ExclusionSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl RenameRule {
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        if self.enabled && name == self.from {
            &self.to
        } else {
            name
        }
    }
}

impl RemoteTreeSynchronizer {
    /// Walks `folder`, filters and renames its files, and makes sure every
    /// target directory exists in `staging` before the copy list is returned.
    pub async fn synchronize(
        &self,
        folder: &(dyn RemoteFolder + Send + Sync),
        staging: &(dyn StagingFolder + Send + Sync),
    ) -> Result<Vec<RemoteCopy>, PlanError> {
        let files = remote_filelist(folder).await?;
        let manifest = self.manifest(folder, &files);

        let parents: BTreeSet<&str> = files
            .iter()
            .filter(|entry| !self.exclusions.contains(&entry.name) && entry.relpath != ".")
            .map(|entry| entry.relpath.as_str())
            .collect();
        for relpath in parents {
            staging
                .ensure_dir(relpath)
                .await
                .map_err(|e| PlanError::staging(relpath, e))?;
        }

        tracing::info!(
            remote = folder.remote_path(),
            files = files.len(),
            copies = manifest.len(),
            "Restart folder synchronized"
        );
        Ok(manifest)
    }

    /// Copy instructions for `files`. Each entry is decided on its own,
    /// except that a renamed file replaces the file it is renamed to.
    pub fn manifest(
        &self,
        folder: &(dyn RemoteFolder + Send + Sync),
        files: &[RemoteFileEntry],
    ) -> Vec<RemoteCopy> {
        let computer_uuid = folder.computer_uuid();
        let renamed_dirs: HashSet<&str> = files
            .iter()
            .filter(|entry| {
                self.rename.enabled
                    && entry.name == self.rename.from
                    && !self.exclusions.contains(&entry.name)
            })
            .map(|entry| entry.relpath.as_str())
            .collect();
        files
            .iter()
            .filter(|entry| {
                if self.exclusions.contains(&entry.name) {
                    tracing::debug!(file = %entry.abspath, "Excluded from restart copy");
                    return false;
                }
                let shadowed = self.rename.enabled
                    && entry.name == self.rename.to
                    && renamed_dirs.contains(entry.relpath.as_str());
                if shadowed {
                    tracing::debug!(file = %entry.abspath, "Replaced by the renamed file");
                }
                !shadowed
            })
            .map(|entry| RemoteCopy {
                computer_uuid,
                source: entry.abspath.clone(),
                target: entry.target(self.rename.apply(&entry.name)),
            })
            .collect()
    }
}

/// Every file below `folder`, depth first in listing order.
pub async fn remote_filelist(
    folder: &(dyn RemoteFolder + Send + Sync),
) -> Result<Vec<RemoteFileEntry>, PlanError> {
    let root = folder.remote_path().trim_end_matches('/');
    let mut pending: Vec<(String, String)> = match folder.list(".").await {
        RemoteListing::Directory(entries) => children(".", entries).collect(),
        RemoteListing::File => {
            return Err(ConfigurationError::RestartRootNotDirectory(root.to_owned()).into())
        }
        RemoteListing::TransportError(e) => return Err(PlanError::remote_access(root, e)),
    };

    let mut files = Vec::new();
    while let Some((relpath, name)) = pending.pop() {
        let subpath = join_relpath(&relpath, &name);
        match folder.list(&subpath).await {
            RemoteListing::Directory(entries) => pending.extend(children(&subpath, entries)),
            RemoteListing::File => {
                tracing::debug!(%subpath, "Found remote file");
                files.push(RemoteFileEntry {
                    abspath: format!("{root}/{subpath}"),
                    name,
                    relpath,
                });
            }
            RemoteListing::TransportError(e) => {
                tracing::error!(%subpath, "Listing restart folder failed: {e}");
                return Err(PlanError::remote_access(format!("{root}/{subpath}"), e));
            }
        }
    }
    Ok(files)
}

/// Stack entries for the entries of `relpath`, reversed so that popping
/// yields them in listing order.
fn children(relpath: &str, entries: Vec<String>) -> impl Iterator<Item = (String, String)> + '_ {
    entries
        .into_iter()
        .rev()
        .map(move |name| (relpath.to_owned(), name))
}
