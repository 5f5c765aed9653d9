//! Tracing setup.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the filter; the default keeps service crates at
/// debug and silences the rest.
pub fn init_telemetry() {
    // Console: compact format, no targets or timestamps (container runtimes add their own)
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "imgscale_api=debug,imgscale_core=debug,imgscale_storage=debug,imgscale_processing=debug"
                .into()
        }))
        .with(console_fmt)
        .init();
}
