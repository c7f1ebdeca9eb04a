pub mod config;
pub mod export;
pub mod query;
pub mod report;
pub mod source;
pub mod view;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the `fmt` subscriber on stderr. `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}
