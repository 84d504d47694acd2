use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "POMOCLOCK_LOG";

/// Initialize diagnostic tracing to a file.
///
/// The terminal belongs to the clock, so nothing is logged unless
/// `POMOCLOCK_LOG` names a file path. The actual file is
/// `{path}.{timestamp}.{pid}` so concurrent instances never share one.
/// Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let Some(log_path) = std::env::var(LOG_ENV).ok().filter(|p| !p.is_empty()) else {
        return;
    };

    let unique_path = format!(
        "{}.{}.{}",
        log_path,
        chrono::Local::now().format("%Y%m%dT%H%M%S"),
        std::process::id()
    );

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
