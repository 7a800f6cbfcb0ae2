use tokio::process::Command;

use crate::config::SshProxyConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    pub port: String,
    pub username_host: String,
}

/// An ssh proxy for command. It's transparent if not using ssh.
pub trait MaybeSsh {
    /// Runs `script` through a POSIX shell, remote or local.
    fn shell(&self, script: &str) -> Command;
    fn is_ssh(&self) -> bool;
}

impl<Ctx> MaybeSsh for Ctx
where
    Ctx: AsRef<Option<SshConfig>>,
{
    fn shell(&self, script: &str) -> Command {
        let Some(ssh) = self.as_ref() else {
            let mut command = Command::new("sh");
            command.args(["-c", script]);
            return command;
        };

        let mut command = Command::new("ssh");
        command.args(["-p", &ssh.port, "-o", "BatchMode=yes", &ssh.username_host, script]);
        command
    }

    fn is_ssh(&self) -> bool {
        self.as_ref().is_some()
    }
}

impl SshConfig {
    pub fn new(config: &SshProxyConfig) -> Self {
        let SshProxyConfig {
            host,
            username,
            port,
        } = config;

        Self {
            port: port.to_string(),
            username_host: format!("{username}@{host}"),
        }
    }
}

/// Single-quotes `word` for a POSIX shell.
pub fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}
