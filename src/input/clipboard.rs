//! Clipboard collaborator used by the chat flow

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as AsyncCommand;

#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`
    async fn set(&self, text: &str) -> anyhow::Result<()>;
}

/// Clipboard that pipes text into an external command (xclip, wl-copy, ...)
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Build from a whitespace-separated command line, e.g. `xclip -selection clipboard`
    pub fn from_command_line(command: &str) -> anyhow::Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("Clipboard command is empty"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn set(&self, text: &str) -> anyhow::Result<()> {
        let mut child = AsyncCommand::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::null())
            // xclip forks a daemon that keeps inherited pipes open
            .stderr(std::process::Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // Closing stdin lets the command see EOF
            drop(stdin);
        }

        let status = child.wait().await?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", self.program, status);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_split() {
        let clipboard = CommandClipboard::from_command_line("xclip -selection clipboard").unwrap();
        assert_eq!(clipboard.program, "xclip");
        assert_eq!(clipboard.args, ["-selection", "clipboard"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandClipboard::from_command_line("   ").is_err());
    }
}
