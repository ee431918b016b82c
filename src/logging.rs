//! stderr logging for the CLI.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable that overrides the `-v` count. Takes `EnvFilter`
/// directives, e.g. `debug` or `ffkit::engine=trace,warn`.
pub const LOG_ENV: &str = "FFKIT_LOG";

/// Map `-v` repetitions to a level: none is `warn`, `-v` info, `-vv` debug, more is trace
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `FFKIT_LOG` wins over the flag when it holds valid directives
pub fn resolve_filter(verbosity: u8, env_value: Option<&str>) -> EnvFilter {
    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| {
            EnvFilter::default().add_directive(LevelFilter::from_level(level_for(verbosity)).into())
        })
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8) {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = resolve_filter(verbosity, env_value.as_deref());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
