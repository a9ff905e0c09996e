use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values take defaults; Loki is on only for `LOKI_ENABLED=true` or `1`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            loki_enabled: lookup("LOKI_ENABLED")
                .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
                .unwrap_or(false),
            loki_url: lookup("LOKI_URL").filter(|v| !v.trim().is_empty()),
            service_name: or_default("SERVICE_NAME", "stock-facade"),
            environment: or_default("ENVIRONMENT", "development"),
            log_level: or_default("RUST_LOG", "info"),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "loki")]
    let registry = registry.with(loki_layer(&config)?);

    registry.try_init()?;

    tracing::info!(
        "📊 Logging initialized for {} ({}) at level {}",
        config.service_name, config.environment, config.log_level
    );
    Ok(())
}

/// `None` unless Loki shipping is switched on.
#[cfg(feature = "loki")]
fn loki_layer(
    config: &LoggingConfig,
) -> Result<Option<tracing_loki::Layer>, Box<dyn std::error::Error + Send + Sync>> {
    let loki_url = match (&config.loki_url, config.loki_enabled) {
        (Some(url), true) => url::Url::parse(url)?,
        _ => return Ok(None),
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(loki_url)?;

    // Ships buffered log lines to Loki for the lifetime of the process
    tokio::spawn(task);
    Ok(Some(layer))
}
