use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static BARE_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static MINUTE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s*(?:m|min|mins|minutes)$").expect("valid regex")
});
static HOUR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\s*(?:h|hr|hour|hours)$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("unrecognized duration format: {input:?}")]
    InvalidFormat { input: String },
    #[error("duration out of range: {input:?}")]
    OutOfRange { input: String },
}

/// Parse a duration token into whole seconds.
///
/// Shapes are tried in order: `H:M`, a bare integer (minutes), an integer
/// with a minute suffix (`m`, `min`, `mins`, `minutes`) and an integer with
/// an hour suffix (`h`, `hr`, `hour`, `hours`). Matching ignores case and
/// surrounding whitespace.
pub fn parse(token: &str) -> Result<u64, ParseDurationError> {
    let normalized = token.trim().to_lowercase();
    let invalid = || ParseDurationError::InvalidFormat {
        input: token.to_string(),
    };
    let out_of_range = || ParseDurationError::OutOfRange {
        input: token.to_string(),
    };

    if normalized.contains(':') {
        let mut fields = normalized.split(':');
        let (Some(hours), Some(minutes), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };
        let hours = colon_field(hours).ok_or_else(invalid)?;
        let minutes = colon_field(minutes).ok_or_else(invalid)?;
        return hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .and_then(|total| total.checked_mul(60))
            .ok_or_else(out_of_range);
    }

    let (amount, unit_secs) = if BARE_MINUTES.is_match(&normalized) {
        (normalized.as_str(), 60)
    } else if let Some(caps) = MINUTE_SUFFIX.captures(&normalized) {
        (caps.get(1).map_or("", |m| m.as_str()), 60)
    } else if let Some(caps) = HOUR_SUFFIX.captures(&normalized) {
        (caps.get(1).map_or("", |m| m.as_str()), 3600)
    } else {
        return Err(invalid());
    };

    amount
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(unit_secs))
        .ok_or_else(out_of_range)
}

/// One side of an `H:M` token. Empty counts as zero.
fn colon_field(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
