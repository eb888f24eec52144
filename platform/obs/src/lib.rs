//! Process-wide tracing setup.
//!
//! Human-readable logs always go to stdout; spans are additionally exported
//! over OTLP/HTTP when an endpoint is configured.

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "info,tower_http=warn";
pub const SERVICE_NAME: &str = "hub-server";

static INIT: OnceCell<()> = OnceCell::new();

#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    /// Overrides `RUST_LOG` when set.
    pub env_filter: Option<String>,
    /// Overrides `OTLP_ENDPOINT` when set.
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: SERVICE_NAME,
            env_filter: None,
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    pub fn with_otlp_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.otlp_endpoint = endpoint;
        self
    }
}

/// Keeps the OTLP pipeline alive; dropping it flushes pending spans.
#[must_use = "dropping the guard shuts the exporter down"]
pub struct TracingGuard {
    provider: Option<SdkTracerProvider>,
}

impl TracingGuard {
    pub fn exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                warn!(error = %err, "otlp exporter shutdown failed");
            }
        }
    }
}

/// First non-blank candidate, else [`DEFAULT_FILTER`].
fn resolve_filter(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .into_iter()
        .chain(from_env)
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn resolve_endpoint(explicit: Option<String>, from_env: Option<String>) -> Option<String> {
    explicit
        .or(from_env)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn otlp_provider(service_name: &'static str, endpoint: String) -> Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()
        .context("building OTLP span exporter")?;
    let resource = Resource::builder().with_service_name(service_name).build();
    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}

/// Install the global subscriber. Safe to call twice; the second call is a
/// no-op returning a guard without an exporter.
pub fn init_tracing(config: ObsConfig) -> Result<TracingGuard> {
    if INIT.get().is_some() {
        return Ok(TracingGuard { provider: None });
    }

    let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());
    let env_filter = EnvFilter::try_new(&filter).with_context(|| format!("invalid log filter `{filter}`"))?;
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    let endpoint = resolve_endpoint(config.otlp_endpoint, std::env::var("OTLP_ENDPOINT").ok());
    let provider = match endpoint {
        Some(endpoint) => {
            let provider = otlp_provider(config.service_name, endpoint)?;
            let tracer = provider.tracer(config.service_name);
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
            Some(provider)
        }
        None => {
            registry.try_init()?;
            None
        }
    };

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(TracingGuard { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_environment() {
        let filter = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(filter, "debug");
    }

    #[test]
    fn blank_filters_fall_back_to_default() {
        assert_eq!(resolve_filter(Some("  ".into()), None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, Some("".into())), DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, Some("hub=trace".into())), "hub=trace");
    }

    #[test]
    fn blank_endpoint_disables_export() {
        assert_eq!(resolve_endpoint(None, Some(" ".into())), None);
        assert_eq!(
            resolve_endpoint(None, Some("http://collector:4318/v1/traces".into())),
            Some("http://collector:4318/v1/traces".to_string())
        );
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
