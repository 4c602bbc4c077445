//! Provides utilities to initialize logging and OpenTelemetry tracing for a relayer process.
use std::env;

use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding the OTLP collector endpoint.
pub const OTLP_URL_ENVVAR: &str = "BRIDGE_RELAYER_OTLP_URL";

/// Environment variable holding a label that is appended to the whoami string, useful to tell
/// apart the relayers of a single deployment.
pub const SVC_LABEL_ENVVAR: &str = "BRIDGE_RELAYER_SVC_LABEL";

/// The filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Errors that can occur while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter directive: {0}")]
    InvalidDirective(String),

    /// The OTLP exporter could not be built.
    #[error("could not build otlp exporter: {0}")]
    Exporter(String),

    /// A global subscriber was already installed.
    #[error("could not install subscriber: {0}")]
    Install(String),
}

/// Configuration for the logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Identifies the service in logs and traces.
    whoami: String,

    /// Filter directive applied when `RUST_LOG` is absent.
    default_directive: String,

    /// The OpenTelemetry URL for exporting traces.
    otel_url: Option<String>,
}

impl LoggerConfig {
    /// Creates a new instance with whoami set and the default directive.
    pub fn new(whoami: String) -> Self {
        Self {
            whoami,
            default_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
            otel_url: None,
        }
    }

    /// Creates a new instance whose whoami is derived from `base` and the service label envvar.
    pub fn with_base_name(base: &str) -> Self {
        let mut config = Self::new(get_whoami_string(base));
        if let Some(url) = get_otlp_url_from_env() {
            config.set_otlp_url(url);
        }

        config
    }

    /// Sets the filter directive used when `RUST_LOG` is not set, e.g. `"debug"` or
    /// `"bridge_relayer_protocol=trace,info"`.
    pub fn with_default_directive(mut self, directive: &str) -> Self {
        self.default_directive = directive.to_string();
        self
    }

    /// Sets the opentelemetry URL to the provided string.
    pub fn set_otlp_url(&mut self, url: String) {
        self.otel_url = Some(url);
    }

    /// Returns the whoami string.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_base_name("bridge-relayer")
    }
}

/// Installs the global subscriber described by `config`.
///
/// Logs go to stdout in the compact format. Setting `LOG_FILE=1` or `LOG_LINE_NUM=1` adds the
/// source location to every event.
pub fn init(config: LoggerConfig) -> Result<(), LoggingError> {
    let filter = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives),
        Err(_) => EnvFilter::try_new(&config.default_directive),
    }
    .map_err(|e| LoggingError::InvalidDirective(e.to_string()))?;

    let log_file = env::var("LOG_FILE").is_ok_and(|v| v == "1");
    let log_line_num = env::var("LOG_LINE_NUM").is_ok_and(|v| v == "1");

    let stdout_sub = tracing_subscriber::fmt::layer()
        .compact()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(log_file)
                .with_line_number(log_line_num),
        )
        .with_filter(filter);

    match &config.otel_url {
        Some(otel_url) => {
            let resource = Resource::builder()
                .with_attribute(KeyValue::new("service.name", config.whoami().to_owned()))
                .build();

            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(otel_url)
                .build()
                .map_err(|e| LoggingError::Exporter(e.to_string()))?;

            let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build();

            let otel_sub =
                tracing_opentelemetry::layer().with_tracer(provider.tracer("bridge-relayer"));

            tracing_subscriber::registry()
                .with(stdout_sub)
                .with(otel_sub)
                .try_init()
        }
        None => tracing_subscriber::registry().with(stdout_sub).try_init(),
    }
    .map_err(|e| LoggingError::Install(e.to_string()))?;

    info!(whoami = %config.whoami(), "logging started");

    Ok(())
}

/// Gets the OTLP URL from the standard envvar.
pub fn get_otlp_url_from_env() -> Option<String> {
    env::var(OTLP_URL_ENVVAR).ok()
}

/// Gets the service label from the standard envvar.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string, `base%label` when a service label is set.
pub fn get_whoami_string(base: &str) -> String {
    match get_service_label_from_env() {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
