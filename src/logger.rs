use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. `--verbose` opens up our own debug
/// events and actix's request-level info.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "grade_predictor=debug,actix_web=info"
    } else {
        "grade_predictor=info,actix_web=warn"
    }
}

// Events go to stderr so `predict --json` and `batch --json` keep stdout parseable.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let events = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    if tracing_subscriber::registry().with(filter).with(events).try_init().is_err() {
        tracing::debug!("Logger already installed");
    }
}
