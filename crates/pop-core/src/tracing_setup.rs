//! Tracing subscriber setup shared by the daemon and the CLI surfaces.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr fmt subscriber. `POP_LOG` overrides the default `info`
/// filter (standard env-filter syntax).
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_env("POP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!(service = service_name, "tracing initialized");
}
