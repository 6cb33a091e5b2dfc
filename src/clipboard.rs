use anyhow::{Context, Result};
use std::io::Write;
use std::time::{Duration, Instant};

/// How long the copy button shows its result before going back to "Copy"
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Copy-button state for the active panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    Idle,
    Copied(Instant),
    Failed(Instant),
}

impl CopyStatus {
    /// Label as of `now`; any result older than `COPY_FEEDBACK` reads as idle.
    pub fn label(&self, now: Instant) -> &'static str {
        match self.settle(now) {
            CopyStatus::Idle => "Copy",
            CopyStatus::Copied(_) => "Copied!",
            CopyStatus::Failed(_) => "Failed to copy",
        }
    }

    /// Drop an expired result
    pub fn settle(self, now: Instant) -> CopyStatus {
        match self {
            CopyStatus::Copied(at) | CopyStatus::Failed(at)
                if now.saturating_duration_since(at) >= COPY_FEEDBACK =>
            {
                CopyStatus::Idle
            }
            other => other,
        }
    }
}

/// Pipe text into the platform clipboard command.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let (cmd, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("pbcopy", vec![])
    } else if cfg!(target_os = "windows") {
        ("clip", vec![])
    } else {
        // Linux: try xclip, fall back to xsel
        if std::process::Command::new("which")
            .arg("xclip")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            ("xclip", vec!["-selection", "clipboard"])
        } else {
            ("xsel", vec!["--clipboard", "--input"])
        }
    };

    pipe_to_command(cmd, &args, text)
}

/// Write `text` to the command's stdin. The child is always waited on, even when the write fails.
fn pipe_to_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = std::process::Command::new(cmd)
        .args(args)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to open clipboard command `{}`", cmd))?;

    // Dropping stdin closes the pipe so the child sees EOF
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    let status = child.wait().context("Clipboard command failed")?;
    written.with_context(|| format!("Failed to write to `{}`", cmd))?;
    if !status.success() {
        anyhow::bail!("`{}` exited with {}", cmd, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_label() {
        assert_eq!(CopyStatus::Idle.label(Instant::now()), "Copy");
    }

    #[test]
    fn copied_label_within_window() {
        let at = Instant::now();
        let status = CopyStatus::Copied(at);
        assert_eq!(status.label(at + Duration::from_millis(1999)), "Copied!");
    }

    #[test]
    fn failed_label_within_window() {
        let at = Instant::now();
        assert_eq!(CopyStatus::Failed(at).label(at), "Failed to copy");
    }

    #[test]
    fn resets_after_two_seconds_regardless_of_outcome() {
        let at = Instant::now();
        let later = at + COPY_FEEDBACK;
        assert_eq!(CopyStatus::Copied(at).label(later), "Copy");
        assert_eq!(CopyStatus::Failed(at).label(later), "Copy");
        assert_eq!(CopyStatus::Failed(at).settle(later), CopyStatus::Idle);
    }

    #[cfg(unix)]
    #[test]
    fn pipe_succeeds_when_command_reads_everything() {
        assert!(pipe_to_command("cat", &[], "int main() {}").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_still_reaps_child() {
        // `true` exits without reading, so a large write hits a closed pipe
        let big = "x".repeat(4 * 1024 * 1024);
        let err = pipe_to_command("true", &[], &big).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to write to `true`"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_error() {
        assert!(pipe_to_command("false", &[], "").is_err());
    }
}
