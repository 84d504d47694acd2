use std::{
    io::{self, stdin, Stdout},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use pomoclock::{
    app::{self, App, AppError, Collaborators},
    app_dirs::AppDirs,
    config::{self, Configuration},
    dispatch::CommandDispatcher,
    event_log::CsvEventLog,
    logging,
    notify::DesktopNotifier,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
};

const LONG_ABOUT: &str = "\
A tty-clock style pomodoro timer. Alternates focus and break phases and can
launch a command, detached, every time a break ends.

Duration formats:
  25            minutes
  10m 10min 10 minutes
  2h 2hr 2 hours
  1:30          hours:minutes

Examples:
  pomoclock                         25m focus, 5m break
  pomoclock 50 10                   50m focus, 10m break
  pomoclock 1:30 0:10               1h30m focus, 10m break
  pomoclock 50 -c make test         run `make test` after each break
  pomoclock \"nmap -Pn target\"       a non-duration is taken as the command

The command runs through the shell, so pipes and redirects work. Its output
goes to a timestamped file next to the event log.

Keys: space pause/resume, n skip, r reset, q quit";

/// tty-clock style pomodoro timer with an optional post-break command
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// focus duration, or the start of a command (e.g. 25, 50m, 2h, 1:30)
    #[clap(value_name = "FOCUS")]
    focus: Option<String>,

    /// break duration, or the start of a command (e.g. 5, 10m, 0:10)
    #[clap(value_name = "BREAK")]
    break_duration: Option<String>,

    /// any further words of an unquoted command
    #[clap(value_name = "REST", hide = true)]
    rest: Vec<String>,

    /// command to run after every break; consumes all remaining arguments
    #[clap(short = 'c', long = "cmd", num_args = 1.., allow_hyphen_values = true, value_name = "COMMAND")]
    cmd: Option<Vec<String>>,

    /// directory for the event log and command output
    #[clap(long, env = "POMOCLOCK_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// Positional tokens in the order they were given.
    fn tokens(&self) -> Vec<String> {
        self.focus
            .iter()
            .chain(self.break_duration.iter())
            .chain(self.rest.iter())
            .cloned()
            .collect()
    }

    fn explicit_command(&self) -> Option<String> {
        self.cmd.as_ref().map(|parts| parts.join(" "))
    }

    fn configuration(&self) -> Configuration {
        config::resolve(&self.tokens(), self.explicit_command().as_deref())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pomoclock: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = cli.configuration();
    let dirs = AppDirs::resolve(cli.log_dir.as_deref());
    let event_log = CsvEventLog::new(dirs.event_log_path());

    let mut terminal = setup_terminal().map_err(AppError::TerminalInit)?;

    let mut app = App::new(
        config,
        Collaborators {
            dispatcher: CommandDispatcher::new(dirs.command_output_dir()),
            event_log_path: Some(event_log.path().to_path_buf()),
            event_log: Box::new(event_log),
            notifier: Box::new(DesktopNotifier::default()),
        },
        Instant::now(),
    );
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    app::run(&mut terminal, &mut app, &runner);

    restore_terminal(&mut terminal);
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide) {
        let _ = disable_raw_mode();
        return Err(err);
    }

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).inspect_err(|_| {
        let mut stdout = io::stdout();
        let _ = disable_raw_mode();
        let _ = execute!(stdout, LeaveAlternateScreen, Show);
    })
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen, Show) {
        warn!(error = %err, "failed to leave alternate screen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pomoclock").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = parse(&[]);
        assert!(cli.focus.is_none());
        assert!(cli.break_duration.is_none());
        assert!(cli.cmd.is_none());
        assert_eq!(cli.configuration(), Configuration::default());
    }

    #[test]
    fn test_cli_focus_and_break() {
        let cli = parse(&["50", "10"]);
        assert_eq!(cli.tokens(), vec!["50".to_string(), "10".to_string()]);
        let cfg = cli.configuration();
        assert_eq!((cfg.focus_secs, cfg.break_secs, cfg.command), (3000, 600, None));
    }

    #[test]
    fn test_cli_explicit_command_consumes_the_rest() {
        let cli = parse(&["50", "10", "-c", "echo", "hi"]);
        assert_eq!(cli.explicit_command().as_deref(), Some("echo hi"));
        let cfg = cli.configuration();
        assert_eq!(
            (cfg.focus_secs, cfg.break_secs, cfg.command.as_deref()),
            (3000, 600, Some("echo hi"))
        );
    }

    #[test]
    fn test_cli_explicit_command_keeps_hyphen_words() {
        let cli = parse(&["--cmd", "nmap", "-Pn", "target"]);
        assert_eq!(cli.explicit_command().as_deref(), Some("nmap -Pn target"));
    }

    #[test]
    fn test_cli_quoted_command_in_break_slot() {
        let cfg = parse(&["50", "nmap -Pn target"]).configuration();
        assert_eq!(
            (cfg.focus_secs, cfg.break_secs, cfg.command.as_deref()),
            (3000, 300, Some("nmap -Pn target"))
        );
    }

    #[test]
    fn test_cli_unquoted_command_words() {
        let cli = parse(&["50", "ping", "localhost"]);
        assert_eq!(cli.rest, vec!["localhost".to_string()]);
        assert_eq!(cli.configuration().command.as_deref(), Some("ping localhost"));
    }

    #[test]
    fn test_cli_command_in_focus_slot() {
        let cfg = parse(&["nmap -Pn target"]).configuration();
        assert_eq!(cfg.focus_secs, 1500);
        assert_eq!(cfg.command.as_deref(), Some("nmap -Pn target"));
    }

    #[test]
    fn test_cli_log_dir() {
        let cli = parse(&["--log-dir", "/tmp/pomo"]);
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/pomo")));
    }

    #[test]
    fn test_cli_command_requires_a_value() {
        assert!(Cli::try_parse_from(["pomoclock", "-c"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
