use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from a raw TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the token secret is empty, the environment name
    /// is empty, or a rate-limit window does not parse
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.token_secret.expose_secret().is_empty() {
            anyhow::bail!("auth.token_secret must not be empty");
        }

        if self.server.environment.trim().is_empty() {
            anyhow::bail!("server.environment must not be empty");
        }

        if let Some(ref rate_limit) = self.server.rate_limit {
            for (name, limit) in [("global", &rate_limit.global), ("per_ip", &rate_limit.per_ip)] {
                if let Some(limit) = limit {
                    duration_str::parse(&limit.window).map_err(|e| {
                        anyhow::anyhow!("invalid rate_limit.{name} window '{}': {e}", limit.window)
                    })?;
                    if limit.requests == 0 {
                        anyhow::bail!("rate_limit.{name} requests must be > 0");
                    }
                }
            }
        }

        Ok(())
    }
}
