use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Loop cadence: input is polled at roughly 20 Hz.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Unified event type consumed by the session loop
#[derive(Clone, Debug)]
pub enum PomoEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// What a key press asks the session loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePause,
    Skip,
    Reset,
}

impl Action {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Self::Quit),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char(' ') => Some(Self::TogglePause),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Self::Skip),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait PomoEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError>;
}

/// Production event source using crossterm. A reader thread owns the
/// terminal input and forwards events over a single-consumer channel.
pub struct CrosstermEventSource {
    rx: Receiver<PomoEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(PomoEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(PomoEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PomoEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<PomoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PomoEvent>) -> Self {
        Self { rx }
    }
}

impl PomoEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: PomoEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: PomoEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout.
    /// A closed channel also yields Tick so the countdown keeps running.
    pub fn step(&self) -> PomoEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => PomoEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                // recv returns immediately once closed; keep the cadence
                std::thread::sleep(self.ticker.interval());
                PomoEvent::Tick
            }
        }
    }

    /// Non-blocking view of [`Runner::step`]: the next key action, if any.
    pub fn poll_action(&self) -> Option<Action> {
        match self.step() {
            PomoEvent::Key(key) => Action::from_key(&key),
            PomoEvent::Resize | PomoEvent::Tick => None,
        }
    }
}
