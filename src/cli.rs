use clap::Parser;
use std::path::PathBuf;

/// Proteus - a mock REST API server synthesized from TypeScript interfaces
#[derive(Parser, Debug, Clone)]
#[command(name = "proteus", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PROTEUS_CONFIG", default_value = "proteus.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "PROTEUS_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, env = "PROTEUS_PORT")]
    pub port: Option<u16>,

    /// Primary interface source directory (created if missing)
    #[arg(short, long, env = "PROTEUS_DIR")]
    pub dir: Option<String>,

    /// Additional source directories, highest priority first (repeatable;
    /// must already exist)
    #[arg(long = "include", env = "PROTEUS_INCLUDE")]
    pub include: Vec<String>,

    /// Base URL of a real backend to forward unresolved routes to
    #[arg(long, env = "PROTEUS_UPSTREAM")]
    pub upstream: Option<String>,

    /// Artificial latency range in milliseconds, e.g. "50-200"
    #[arg(long, env = "PROTEUS_LATENCY")]
    pub latency: Option<String>,

    /// Disable the singular-response cache
    #[arg(long, env = "PROTEUS_NO_CACHE", num_args = 0..=1, default_missing_value = "true")]
    pub no_cache: Option<bool>,
}
