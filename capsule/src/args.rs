use std::path::PathBuf;

use clap::Parser;

/// Capsule API server
#[derive(Debug, Parser)]
#[command(name = "capsule", about = "JSON API server with canonical response envelopes")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "capsule.toml", env = "CAPSULE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "CAPSULE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
