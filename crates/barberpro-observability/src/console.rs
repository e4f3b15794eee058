use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Workspace crates whose events pass the default filter at `LOG_LEVEL`.
const APP_TARGETS: [&str; 5] = [
    "barberpro",
    "barberpro_cli",
    "barberpro_backend",
    "barberpro_db",
    "barberpro_observability",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Filter used when `RUST_LOG` is unset: application crates at `level`,
/// noisy dependencies at warn.
pub fn default_filter(level: &str) -> String {
    let mut directives: Vec<String> = APP_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    directives.push("tower_http=warn,hyper=warn,reqwest=warn,sqlx=warn".to_string());
    directives.join(",")
}

/// Initialize console logging.
///
/// - **Filter**: `RUST_LOG` when set, otherwise [`default_filter`] with
///   `LOG_LEVEL` (default "info")
/// - **Format**: compact with ANSI colors, or one JSON object per line when
///   `LOG_FORMAT=json`
///
/// Calling it twice leaves the first subscriber in place.
pub fn init_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&log_level)));
    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_ansi(true),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("⚠️  Logging already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_app_crates() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("barberpro=debug,"));
        assert!(filter.contains("barberpro_cli=debug"));
        assert!(filter.contains("sqlx=warn"));
        assert!(EnvFilter::try_new(&filter).is_ok());
    }

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Compact);
    }
}
