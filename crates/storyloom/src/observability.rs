//! Logging and optional OpenTelemetry span export.
//!
//! Log lines go to stderr so they never interleave with REPL output on
//! stdout. With the `observability` feature, spans are also exported to
//! stdout through an OpenTelemetry tracer provider.

#[cfg(feature = "observability")]
use opentelemetry::{KeyValue, global, trace::TracerProvider};
#[cfg(feature = "observability")]
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Error type returned by subscriber setup.
pub type ObservabilityError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for logging and span export.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info")
    pub log_level: String,
    /// JSON-formatted log lines
    pub json_logs: bool,
    /// Export spans via OpenTelemetry (needs the `observability` feature)
    pub export_spans: bool,
}

impl ObservabilityConfig {
    /// Configuration for `service_name` at info level.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            export_spans: false,
        }
    }

    /// Set the fallback log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Enable OpenTelemetry span export.
    pub fn with_span_export(mut self, enabled: bool) -> Self {
        self.export_spans = enabled;
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, ObservabilityError> {
        match env::var("RUST_LOG") {
            Ok(directives) if !directives.trim().is_empty() => Ok(EnvFilter::try_new(directives)?),
            _ => Ok(EnvFilter::try_new(&self.log_level)?),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Keeps the tracer provider alive; flushes and shuts it down on drop.
#[derive(Debug, Default)]
pub struct ObservabilityGuard {
    #[cfg(feature = "observability")]
    provider: Option<SdkTracerProvider>,
}

impl ObservabilityGuard {
    #[cfg(feature = "observability")]
    fn shutdown(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shut down tracer provider: {e}");
        }
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        #[cfg(feature = "observability")]
        self.shutdown();
    }
}

/// Install the global tracing subscriber.
///
/// Hold the returned guard until exit.
///
/// # Errors
///
/// Fails on an unparsable filter directive or when a global subscriber is
/// already installed.
pub fn init_observability(
    config: &ObservabilityConfig,
) -> Result<ObservabilityGuard, ObservabilityError> {
    let env_filter = config.env_filter()?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    #[cfg(feature = "observability")]
    if config.export_spans {
        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .with_attributes(vec![KeyValue::new(
                "service.version",
                config.service_version.clone(),
            )])
            .build();

        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .with_resource(resource)
            .build();
        global::set_tracer_provider(provider.clone());

        let tracer = provider.tracer(config.service_name.clone());
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;

        return Ok(ObservabilityGuard {
            provider: Some(provider),
        });
    }

    #[cfg(not(feature = "observability"))]
    if config.export_spans {
        eprintln!("Span export requested but the `observability` feature is not enabled");
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(ObservabilityGuard::default())
}
