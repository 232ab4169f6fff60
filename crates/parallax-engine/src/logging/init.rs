use std::sync::Once;

/// Crates whose info-level output drowns out the loop's own messages.
const NOISY_TARGETS: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax
/// (e.g. "parallax_engine=debug,wgpu=warn"). When unset, `RUST_LOG` is
/// consulted, then `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter string handed to `env_logger`. GPU backend crates are capped
    /// at `warn` unless the filter names them.
    fn filters(&self, rust_log: Option<String>) -> String {
        let base = self
            .env_filter
            .clone()
            .or(rust_log)
            .unwrap_or_else(|| self.default_level.to_string().to_lowercase());

        let mut filters = base;
        for target in NOISY_TARGETS {
            if !filters.contains(target) {
                filters.push_str(&format!(",{target}=warn"));
            }
        }
        filters
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filters = config.filters(std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filters);
        builder.write_style(config.write_style);
        builder.format_timestamp_millis();
        builder.init();

        log::debug!("logging initialized ({filters})");
    });
}
