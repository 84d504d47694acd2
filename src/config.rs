use itertools::Itertools;
use tracing::debug;

use crate::duration;

pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

/// Timer settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub focus_secs: u64,
    pub break_secs: u64,
    pub command: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            focus_secs: DEFAULT_FOCUS_SECS,
            break_secs: DEFAULT_BREAK_SECS,
            command: None,
        }
    }
}

impl Configuration {
    pub fn has_command(&self) -> bool {
        self.command.is_some()
    }
}

/// Which row of the resolution table produced a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Both positional slots held durations (or were absent).
    Durations,
    /// Focus parsed; everything after it is the command.
    FocusThenCommand,
    /// Focus parsed; an unparseable break token was dropped in favour of `-c`.
    FocusIgnoringBreak,
    /// Nothing parsed; every token together is the command.
    WholeCommand,
    /// Nothing parsed and `-c` was given, so the tokens are dropped.
    ExplicitOnly,
}

impl ResolutionPath {
    /// The decision table. `focus_ok`/`break_ok` are true for absent tokens.
    fn classify(focus_ok: bool, break_ok: bool, explicit: bool) -> Self {
        match (focus_ok, break_ok, explicit) {
            (true, true, _) => Self::Durations,
            (true, false, false) => Self::FocusThenCommand,
            (true, false, true) => Self::FocusIgnoringBreak,
            (false, _, false) => Self::WholeCommand,
            (false, _, true) => Self::ExplicitOnly,
        }
    }
}

/// Resolve positional tokens and an optional `-c` command into a
/// configuration. Never fails: unusable input falls back to defaults.
pub fn resolve(tokens: &[String], explicit_command: Option<&str>) -> Configuration {
    resolve_with_path(tokens, explicit_command).0
}

pub fn resolve_with_path(
    tokens: &[String],
    explicit_command: Option<&str>,
) -> (Configuration, ResolutionPath) {
    let explicit = non_empty(explicit_command.map(str::to_string));

    let focus = parse_slot(tokens.first(), DEFAULT_FOCUS_SECS);
    let brk = parse_slot(tokens.get(1), DEFAULT_BREAK_SECS);

    let path = ResolutionPath::classify(focus.is_some(), brk.is_some(), explicit.is_some());
    let config = match path {
        ResolutionPath::Durations => Configuration {
            focus_secs: focus.unwrap_or(DEFAULT_FOCUS_SECS),
            break_secs: brk.unwrap_or(DEFAULT_BREAK_SECS),
            command: explicit,
        },
        ResolutionPath::FocusThenCommand => Configuration {
            focus_secs: focus.unwrap_or(DEFAULT_FOCUS_SECS),
            break_secs: DEFAULT_BREAK_SECS,
            command: non_empty(Some(tokens[1..].iter().join(" "))),
        },
        ResolutionPath::FocusIgnoringBreak => Configuration {
            focus_secs: focus.unwrap_or(DEFAULT_FOCUS_SECS),
            break_secs: DEFAULT_BREAK_SECS,
            command: explicit,
        },
        ResolutionPath::WholeCommand => Configuration {
            command: non_empty(Some(tokens.iter().join(" "))),
            ..Configuration::default()
        },
        ResolutionPath::ExplicitOnly => Configuration {
            command: explicit,
            ..Configuration::default()
        },
    };

    debug!(?path, ?config, "resolved arguments");
    (config, path)
}

/// Absent slots count as a successful parse of the default.
fn parse_slot(token: Option<&String>, default: u64) -> Option<u64> {
    match token {
        None => Some(default),
        Some(token) => duration::parse(token).ok(),
    }
}

fn non_empty(command: Option<String>) -> Option<String> {
    command
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
