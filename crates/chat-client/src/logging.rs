use tracing::Level;
use tracing_subscriber::{filter::Targets, prelude::*, EnvFilter};

use crate::config::Env;

/// Install the global tracing subscriber for `env`.
///
/// `RUST_LOG`, when set, replaces the default level filter.
pub fn init(env: Env) {
    let registry = tracing_subscriber::registry()
        .with(
            Targets::default()
                .with_target("hyper", Level::ERROR)
                .with_target("tokio_tungstenite", Level::ERROR)
                .with_target("tungstenite", Level::ERROR)
                .with_default(Level::TRACE),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(env)));

    match env {
        Env::Local => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        Env::Dev => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
        Env::Prod => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn default_filter(env: Env) -> EnvFilter {
    EnvFilter::new(default_level(env).as_str())
}

fn default_level(env: Env) -> Level {
    match env {
        Env::Local | Env::Dev => Level::DEBUG,
        Env::Prod => Level::INFO,
    }
}
