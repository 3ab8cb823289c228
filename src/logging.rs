use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber for a binary. `RUST_LOG` takes precedence over
/// `level`, which applies to the calling binary and to this library.
///
/// Logs go to stderr so that tables printed on stdout stay pipeable.
pub fn init_tracing(crate_name: &str, level: &str) {
    let library = env!("CARGO_CRATE_NAME");

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{crate_name}={level},{library}={level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}
