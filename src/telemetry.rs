//! Tracing setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber writing to stderr. `RUST_LOG` wins over
/// `default_level`. Calling it twice is harmless.
pub fn init(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,slidecast={default_level}")))
        .unwrap_or_else(|_| EnvFilter::new("warn,slidecast=info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
