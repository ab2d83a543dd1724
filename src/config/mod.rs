use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod validator;

use crate::cli::Cli;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub sources: SourceSettings,
    /// Base URL of a real backend; unresolved routes are forwarded there.
    #[serde(default)]
    pub upstream: Option<UpstreamSettings>,
    /// Uniform artificial latency applied to every mocked/forwarded request.
    #[serde(default)]
    pub latency: Option<LatencySettings>,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Ordered definition sources. The primary directory has highest priority;
/// `additional` directories follow in listed order. On a type-name collision
/// the earliest directory wins.
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceSettings {
    #[serde(default = "default_source_dir")]
    pub dir: String,
    #[serde(default)]
    pub additional: Vec<String>,
}

fn default_source_dir() -> String {
    "./interfaces".to_string()
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            dir: default_source_dir(),
            additional: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpstreamSettings {
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct LatencySettings {
    pub min_ms: u64,
    pub max_ms: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
        }
    }
}

impl Settings {
    /// Loads `proteus.toml` (optional), then applies CLI overrides
    /// (CLI > env vars > config file), then drops any malformed options with
    /// a warning.
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(cli.config.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.apply_cli_overrides(cli);
        validator::sanitize(&mut settings);
        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(dir) = &cli.dir {
            self.sources.dir = dir.clone();
        }
        if !cli.include.is_empty() {
            self.sources.additional = cli.include.clone();
        }
        if let Some(url) = &cli.upstream {
            self.upstream = Some(UpstreamSettings { url: url.clone() });
        }
        if let Some(spec) = &cli.latency {
            match parse_latency(spec) {
                Some(latency) => self.latency = Some(latency),
                // Malformed ranges are ignored, not fatal.
                None => tracing::warn!("Ignoring malformed latency range '{}'", spec),
            }
        }
        if cli.no_cache == Some(true) {
            self.cache.enabled = false;
        }
    }

    /// Primary directory first, then the additional directories in order;
    /// index 0 is the highest-priority source.
    pub fn directories(&self) -> Vec<PathBuf> {
        std::iter::once(PathBuf::from(&self.sources.dir))
            .chain(self.sources.additional.iter().map(PathBuf::from))
            .collect()
    }
}

/// Parses a "min-max" millisecond range, e.g. "50-200".
fn parse_latency(spec: &str) -> Option<LatencySettings> {
    let (min, max) = spec.split_once('-')?;
    let min_ms = min.trim().parse().ok()?;
    let max_ms = max.trim().parse().ok()?;
    Some(LatencySettings { min_ms, max_ms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_without_config_file() -> anyhow::Result<()> {
        let cli = Cli::parse_from(["proteus", "--config", "/nonexistent/proteus.toml"]);
        let settings = Settings::new_with_cli(&cli)?;
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.sources.dir, "./interfaces");
        assert!(settings.sources.additional.is_empty());
        assert!(settings.upstream.is_none());
        assert!(settings.cache.enabled);
        Ok(())
    }

    #[test]
    fn test_cli_overrides() -> anyhow::Result<()> {
        let cli = Cli::parse_from([
            "proteus",
            "--config",
            "/nonexistent/proteus.toml",
            "--port",
            "8080",
            "--dir",
            "./models",
            "--include",
            "./shared",
            "--include",
            "./vendor-types",
            "--upstream",
            "http://localhost:9000",
            "--latency",
            "50-200",
            "--no-cache",
        ]);
        let settings = Settings::new_with_cli(&cli)?;
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.directories(),
            vec![
                PathBuf::from("./models"),
                PathBuf::from("./shared"),
                PathBuf::from("./vendor-types"),
            ]
        );
        assert_eq!(settings.upstream.unwrap().url, "http://localhost:9000");
        let latency = settings.latency.unwrap();
        assert_eq!((latency.min_ms, latency.max_ms), (50, 200));
        assert!(!settings.cache.enabled);
        Ok(())
    }

    #[test]
    fn test_malformed_latency_is_ignored() -> anyhow::Result<()> {
        let cli = Cli::parse_from([
            "proteus",
            "--config",
            "/nonexistent/proteus.toml",
            "--latency",
            "fast-ish",
        ]);
        let settings = Settings::new_with_cli(&cli)?;
        assert!(settings.latency.is_none());
        Ok(())
    }

    #[test]
    fn test_parse_latency() {
        assert!(parse_latency("50-200").is_some());
        assert!(parse_latency("200").is_none());
        assert!(parse_latency("a-b").is_none());
    }
}
