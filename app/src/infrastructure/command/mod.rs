mod ssh_proxy;

pub use self::ssh_proxy::{shell_quote, MaybeSsh, SshConfig};
