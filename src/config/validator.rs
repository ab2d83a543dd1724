//! Downgrades malformed configuration options to warnings.

use crate::config::Settings;
use crate::domain::EngineError;
use tracing::warn;

/// Drops options the server cannot honor, logging each as a non-fatal
/// diagnostic. Configuration mistakes here should never abort startup.
pub fn sanitize(settings: &mut Settings) {
    if let Some(latency) = settings.latency {
        if latency.min_ms > latency.max_ms {
            warn!(
                "{}",
                EngineError::InvalidConfiguration(format!(
                    "latency range {}-{}ms is inverted; disabling latency injection",
                    latency.min_ms, latency.max_ms
                ))
            );
            settings.latency = None;
        }
    }

    if let Some(upstream) = &settings.upstream {
        if reqwest::Url::parse(&upstream.url).is_err() {
            warn!(
                "{}",
                EngineError::InvalidConfiguration(format!(
                    "upstream URL '{}' is not a valid URL; disabling forwarding",
                    upstream.url
                ))
            );
            settings.upstream = None;
        }
    }
}
