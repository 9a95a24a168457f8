use std::env;
use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};

fn get_rust_log(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::OFF => "",
        LevelFilter::ERROR => "ERROR",
        LevelFilter::WARN => "WARN",
        LevelFilter::INFO => {
            "INFO,\
             hyper=WARN,\
             reqwest=WARN"
        }
        LevelFilter::DEBUG => {
            "INFO,\
             hyper=WARN,\
             aqi_cache=DEBUG"
        }
        LevelFilter::TRACE => {
            "INFO,\
             hyper=WARN,\
             aqi_cache=TRACE"
        }
    }
}

/// Initializes logging.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &Config) {
    let rust_log =
        env::var("RUST_LOG").unwrap_or_else(|_| get_rust_log(config.log_level).to_string());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&rust_log))
        .with_target(true);

    match (config.log_format, std::io::stdout().is_terminal()) {
        (LogFormat::Auto, true) | (LogFormat::Pretty, _) => builder.pretty().init(),
        (LogFormat::Auto, false) | (LogFormat::Compact, _) => {
            builder.compact().with_ansi(false).init()
        }
        (LogFormat::Json, _) => builder
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .init(),
    }
}
