/// Outcome of listing a single path of a remote folder.
#[derive(Debug)]
pub enum RemoteListing {
    /// The path is a directory holding these entry names.
    Directory(Vec<String>),
    /// The path cannot be listed because it is a file.
    File,
    /// The transport failed; nothing can be said about the path.
    TransportError(anyhow::Error),
}

/// A file found while walking a remote folder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RemoteFileEntry {
    pub name: String,
    /// Absolute path of the file on the remote.
    pub abspath: String,
    /// Directory holding the file, relative to the folder root. `.` for the
    /// root itself, never with a leading `./`.
    pub relpath: String,
}

impl RemoteFileEntry {
    /// Joins `relpath` and `name`, dropping the root marker.
    pub fn target(&self, name: &str) -> String {
        join_relpath(&self.relpath, name)
    }
}

/// Joins a folder-relative directory and a name. `.` is the folder root.
pub fn join_relpath(relpath: &str, name: &str) -> String {
    if relpath == "." {
        name.to_owned()
    } else {
        format!("{relpath}/{name}")
    }
}
