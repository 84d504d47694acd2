use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::session::{Completion, CompletionCause, Phase};

pub const TITLE: &str = "Pomodoro";

/// Best-effort user notification.
pub trait Notifier {
    fn notify(&mut self, title: &str, body: &str);
}

/// Desktop notification through `notify-send`, falling back to the terminal
/// bell when it cannot be started. The helper is never waited on by the
/// caller, so a stuck notification daemon cannot stall the clock.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    program: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::with_program("notify-send")
    }
}

impl DesktopNotifier {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn send(&self, title: &str, body: &str) -> io::Result<()> {
        let mut child = Command::new(&self.program)
            .args([title, body])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => debug!(%status, "notify-send failed"),
            Ok(_) => {}
            Err(err) => debug!(error = %err, "cannot wait for notify-send"),
        });
        Ok(())
    }

    fn bell() {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, body: &str) {
        if let Err(err) = self.send(title, body) {
            debug!(error = %err, "desktop notification unavailable, ringing bell");
            Self::bell();
        }
    }
}

/// Discards notifications. Used by headless runs.
#[derive(Debug, Clone, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, _title: &str, _body: &str) {}
}

/// Message body announcing a phase end.
pub fn completion_message(completion: &Completion) -> &'static str {
    match (completion.finished, completion.cause) {
        (Phase::Focus, CompletionCause::Elapsed) => "Focus finished, time for a break",
        (Phase::Focus, CompletionCause::Skipped) => "Focus skipped, going to break",
        (Phase::Break, CompletionCause::Elapsed) => "Break finished, start next focus",
        (Phase::Break, CompletionCause::Skipped) => "Break skipped, going to focus",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_cover_every_completion() {
        let msg = |finished, cause| completion_message(&Completion { finished, cause });
        assert_eq!(
            msg(Phase::Focus, CompletionCause::Elapsed),
            "Focus finished, time for a break"
        );
        assert_eq!(
            msg(Phase::Break, CompletionCause::Skipped),
            "Break skipped, going to focus"
        );
        assert_ne!(
            msg(Phase::Focus, CompletionCause::Skipped),
            msg(Phase::Break, CompletionCause::Elapsed)
        );
    }

    #[cfg(unix)]
    #[test]
    fn slow_notifier_does_not_block() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow-notify");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut notifier = DesktopNotifier::with_program(script.to_string_lossy());
        let started = Instant::now();
        notifier.notify(TITLE, "Focus finished, time for a break");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn missing_notifier_falls_back_quietly() {
        let mut notifier = DesktopNotifier::with_program("/nonexistent/pomoclock-notify");
        notifier.notify(TITLE, "body");
    }

    #[test]
    fn silent_notifier_accepts_anything() {
        let mut notifier = SilentNotifier;
        notifier.notify(TITLE, "body");
    }
}
