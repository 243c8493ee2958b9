use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (app_filter, env_filter) = build_filters(verbose, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .init();
}

/// A valid `RUST_LOG` replaces the `--verbose` switch entirely.
fn build_filters(verbose: bool, rust_log: Option<&str>) -> (Option<Targets>, EnvFilter) {
    if let Some(env_filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return (None, env_filter);
    }

    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    let app_filter = Targets::new().with_target("coinconv", level_filter);
    (Some(app_filter), EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn debug_enabled(verbose: bool, rust_log: Option<&str>) -> bool {
        let (app_filter, env_filter) = build_filters(verbose, rust_log);
        let subscriber = tracing_subscriber::registry()
            .with(app_filter)
            .with(env_filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "coinconv", Level::DEBUG)
        })
    }

    #[test]
    fn test_logging_filters() {
        assert!(!debug_enabled(false, None));
        assert!(debug_enabled(true, None));

        // RUST_LOG turns logging on without --verbose and overrides it with.
        assert!(debug_enabled(false, Some("debug")));
        assert!(debug_enabled(false, Some("coinconv=debug")));
        assert!(!debug_enabled(true, Some("coinconv=warn")));

        // Unparseable directives fall back to the --verbose switch.
        assert!(!debug_enabled(false, Some("coinconv=loud")));
        assert!(debug_enabled(true, Some("coinconv=loud")));
    }
}
