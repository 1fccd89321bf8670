use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr so the report on stdout stays clean.
pub(crate) fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
