//! Command-line arguments for the `stockpage` server.
//!
//! Upstream settings default to the `STOCKPAGE_*` environment variables;
//! flags given on the command line take precedence.
//!
//! ```bash
//! stockpage --port 3000 --upstream-url http://localhost:8080
//! RUST_LOG=debug stockpage --api-key "$KEY"
//! ```

use clap::Parser;

use stockpage_core::{ConfigError, UpstreamConfig};

/// Stock page server: normalizing proxy in front of the stock service.
#[derive(Debug, Parser)]
#[command(name = "stockpage", author, version, about)]
pub struct Cli {
    /// Interface to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Upstream stock service base URL (overrides STOCKPAGE_UPSTREAM_URL).
    #[arg(long)]
    pub upstream_url: Option<String>,

    /// API key sent as X-API-Key (overrides STOCKPAGE_API_KEY).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Upstream request timeout in milliseconds (overrides STOCKPAGE_TIMEOUT_MS).
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    /// Merge flags over the environment-derived configuration.
    pub fn upstream_config(&self, from_env: UpstreamConfig) -> Result<UpstreamConfig, ConfigError> {
        let mut config = from_env;
        if let Some(url) = &self.upstream_url {
            config = config.with_base_url(url)?;
        }
        if self.api_key.is_some() {
            config = config.with_api_key(self.api_key.clone());
        }
        if self.timeout_ms.is_some() {
            config = config.with_timeout_ms(self.timeout_ms);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_config() -> UpstreamConfig {
        UpstreamConfig::new("http://env.test")
            .expect("valid")
            .with_api_key(Some(String::from("env-key")))
            .with_timeout_ms(Some(1500))
    }

    #[test]
    fn defaults_keep_environment_settings() {
        let cli = Cli::parse_from(["stockpage"]);
        assert_eq!(cli.port, 3000);

        let config = cli.upstream_config(env_config()).expect("valid");
        assert_eq!(config, env_config());
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from([
            "stockpage",
            "--upstream-url",
            "https://flag.test",
            "--timeout-ms",
            "900",
        ]);

        let config = cli.upstream_config(env_config()).expect("valid");
        assert_eq!(config.base_url(), "https://flag.test");
        assert_eq!(config.timeout_ms(), Some(900));
        assert!(config.has_api_key());
    }

    #[test]
    fn invalid_flag_url_is_rejected() {
        let cli = Cli::parse_from(["stockpage", "--upstream-url", "flag.test"]);
        assert!(cli.upstream_config(env_config()).is_err());
    }
}
