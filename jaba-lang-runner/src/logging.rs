use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr subscriber, but only when `RUST_LOG` is set, e.g.
/// `RUST_LOG=jaba_lang_interpreter=trace` to follow every call.
pub fn init() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}
