/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialises tracing for the non-interactive commands.
///
/// Logs go to stderr so replies on stdout stay clean.
pub fn init_logging() {
    use tracing_subscriber::{
        fmt::{self, time::UtcTime},
        prelude::*,
        EnvFilter,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::{filter::LevelFilter, EnvFilter};

    use super::*;

    #[test]
    fn default_filter_is_info() {
        let filter = EnvFilter::new(DEFAULT_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
