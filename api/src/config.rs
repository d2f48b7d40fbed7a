//! Server configuration

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Fixture API settings, from flags or the environment
#[derive(Debug, Clone, Parser)]
#[command(name = "formdesk-api")]
#[command(version = "0.1.0")]
#[command(about = "Fixture backend for the formdesk admin", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "FORMDESK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Number of sample records to start with
    #[arg(long, env = "FORMDESK_SEED", default_value_t = 12)]
    pub seed: usize,

    /// Delay added to every response, in milliseconds
    #[arg(long, env = "FORMDESK_LATENCY_MS", default_value_t = 0)]
    pub latency_ms: u64,
}

impl ServerConfig {
    /// Simulated latency
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config =
            ServerConfig::parse_from(["formdesk-api", "--seed", "3", "--latency-ms", "250"]);
        assert_eq!(config.seed, 3);
        assert_eq!(config.latency(), Duration::from_millis(250));
    }
}
