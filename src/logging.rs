//! logging
//!
//! Diagnostic logging setup.
//!
//! # Design
//!
//! Library code only emits `tracing` events. Nothing is printed until the
//! entry point calls [`init`], which installs a stderr subscriber for as
//! long as the returned [`LogGuard`] lives.
//!
//! The filter comes from `DATASTUDIO_LOG` when set (any `EnvFilter`
//! directive, e.g. `datastudio=debug`), otherwise from the level passed in.
//!
//! # Example
//!
//! ```
//! let _guard = datastudio::logging::init("warn");
//! tracing::warn!("visible");
//! tracing::info!("filtered out");
//! ```

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "DATASTUDIO_LOG";

/// Keeps the subscriber installed. Logging stops when dropped.
#[must_use = "logging stops when the guard is dropped"]
pub struct LogGuard {
    _guard: DefaultGuard,
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard").finish_non_exhaustive()
    }
}

/// Install a stderr subscriber at `level` for the current thread.
pub fn init(level: &str) -> LogGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    LogGuard {
        _guard: tracing::subscriber::set_default(subscriber),
    }
}

/// The effective filter: `DATASTUDIO_LOG` if valid, else `level`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_scopes_subscriber() {
        {
            let _guard = init("debug");
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        }
        assert!(!tracing::enabled!(tracing::Level::DEBUG));
    }

    #[test]
    fn invalid_level_falls_back() {
        // Never panics on a bad directive
        let _ = filter("not a level!!");
    }
}
