use std::io;
use std::path::PathBuf;
use std::time::Instant;

use ratatui::{backend::Backend, Terminal};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Configuration;
use crate::dispatch::CommandDispatcher;
use crate::event_log::{EventKind, EventLog};
use crate::notify::{self, Notifier};
use crate::runtime::{Action, PomoEvent, PomoEventSource, Runner, Ticker};
use crate::session::{Completion, CompletionCause, Phase, PhaseStateMachine};
use crate::ui::Snapshot;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot initialize terminal: {0}")]
    TerminalInit(#[source] io::Error),
}

/// Whether the loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Side-effecting collaborators of a session.
pub struct Collaborators {
    pub dispatcher: CommandDispatcher,
    pub event_log: Box<dyn EventLog>,
    pub notifier: Box<dyn Notifier>,
    /// Shown on screen; `None` when events are not persisted.
    pub event_log_path: Option<PathBuf>,
}

/// Composition root of a running timer. Owns the configuration and the only
/// mutable session state.
pub struct App {
    config: Configuration,
    machine: PhaseStateMachine,
    dispatcher: CommandDispatcher,
    event_log: Box<dyn EventLog>,
    notifier: Box<dyn Notifier>,
    event_log_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: Configuration, collaborators: Collaborators, now: Instant) -> Self {
        let Collaborators {
            dispatcher,
            mut event_log,
            notifier,
            event_log_path,
        } = collaborators;

        event_log.record(
            EventKind::AppStart,
            &format!(
                "focus={}s break={}s cmd={}",
                config.focus_secs,
                config.break_secs,
                if config.has_command() { "yes" } else { "no" }
            ),
        );
        info!(
            focus_secs = config.focus_secs,
            break_secs = config.break_secs,
            command = config.has_command(),
            "session started"
        );

        Self {
            machine: PhaseStateMachine::new(&config, now),
            config,
            dispatcher,
            event_log,
            notifier,
            event_log_path,
        }
    }

    pub fn machine(&self) -> &PhaseStateMachine {
        &self.machine
    }

    /// Run the one-second gate against the wall clock.
    pub fn advance(&mut self, now: Instant) -> Option<Completion> {
        let completion = self.machine.tick_if_due(now)?;
        self.on_completion(completion);
        Some(completion)
    }

    pub fn handle(&mut self, action: Action, now: Instant) -> Flow {
        match action {
            Action::Quit => {
                self.event_log.record(
                    EventKind::AppQuit,
                    &format!("sessions={}", self.machine.sessions_completed()),
                );
                info!(sessions = self.machine.sessions_completed(), "session quit");
                return Flow::Quit;
            }
            Action::TogglePause => {
                self.machine.toggle_pause();
                let kind = if self.machine.is_paused() {
                    EventKind::Pause
                } else {
                    self.machine.rearm(now);
                    EventKind::Resume
                };
                let detail = self.position();
                self.event_log.record(kind, &detail);
            }
            Action::Skip => {
                let detail = self.position();
                self.event_log.record(EventKind::Skip, &detail);
                let completion = self.machine.skip();
                self.on_completion(completion);
            }
            Action::Reset => {
                self.machine.reset();
                self.machine.rearm(now);
                self.event_log.record(EventKind::Reset, "");
            }
        }
        Flow::Continue
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let state = self.machine.state();
        Snapshot {
            phase: state.phase,
            remaining_secs: state.remaining_secs,
            paused: state.paused,
            sessions_completed: state.sessions_completed,
            focus_secs: self.config.focus_secs,
            break_secs: self.config.break_secs,
            command: self.config.command.as_deref(),
            log_path: self.event_log_path.as_deref(),
        }
    }

    fn position(&self) -> String {
        format!(
            "mode={} rem={}s",
            self.machine.phase(),
            self.machine.remaining_secs()
        )
    }

    fn on_completion(&mut self, completion: Completion) {
        let (kind, length) = match (completion.finished, completion.cause) {
            (Phase::Focus, CompletionCause::Elapsed) => (EventKind::FocusEnd, self.config.focus_secs),
            (Phase::Break, CompletionCause::Elapsed) => (EventKind::BreakEnd, self.config.break_secs),
            (Phase::Focus, CompletionCause::Skipped) => (EventKind::FocusEndSkipped, 0),
            (Phase::Break, CompletionCause::Skipped) => (EventKind::BreakEndSkipped, 0),
        };
        let detail = match completion.cause {
            CompletionCause::Elapsed => format!("{length}s"),
            CompletionCause::Skipped => String::new(),
        };
        self.event_log.record(kind, &detail);
        self.notifier
            .notify(notify::TITLE, notify::completion_message(&completion));

        if completion.command_eligible() {
            self.dispatcher
                .dispatch(self.config.command.as_deref(), self.event_log.as_mut());
        }
    }
}

/// Drive `app` until the user quits: poll input at the runner's cadence,
/// gate state ticks on the wall clock and redraw every cycle.
///
/// A failed draw is logged and skipped; the loop itself only ends on quit.
pub fn run<B, E, T>(terminal: &mut Terminal<B>, app: &mut App, runner: &Runner<E, T>)
where
    B: Backend,
    E: PomoEventSource,
    T: Ticker,
{
    loop {
        draw(terminal, app);

        match runner.step() {
            PomoEvent::Key(key) => {
                if let Some(action) = Action::from_key(&key) {
                    if app.handle(action, Instant::now()) == Flow::Quit {
                        break;
                    }
                }
            }
            // the next draw picks up the new size
            PomoEvent::Resize | PomoEvent::Tick => {}
        }

        app.advance(Instant::now());
    }
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App) {
    let snapshot = app.snapshot();
    if let Err(err) = terminal.draw(|f| f.render_widget(&snapshot, f.area())) {
        warn!(error = %err, "draw failed");
    }
}
