use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub server: ServerConfig,
    pub simulator: SimulatorConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Runs the trade simulator alongside webhook ingestion.
    pub demo_mode: bool,
    pub interval_secs: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            interval_secs: 30,
        }
    }
}

impl SimulatorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// `"true"` and `"1"` enable demo mode; any other value disables it.
fn parse_demo_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

impl WatcherConfig {
    /// Loads `path` if it exists, otherwise starts from built-in defaults.
    /// Process environment overrides are applied either way.
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(path: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {path}"))?;
            Self::parse(&content)?
        } else {
            Self::default()
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    fn from_str(content: &str) -> Result<Self> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse watcher config")
    }

    /// Overlay `PORT`, `DEMO_MODE`, `SIMULATOR_INTERVAL_SECS` and `LOG_LEVEL`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(demo) = lookup("DEMO_MODE") {
            self.simulator.demo_mode = parse_demo_flag(&demo);
        }
        if let Some(secs) = lookup("SIMULATOR_INTERVAL_SECS") {
            self.simulator.interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("SIMULATOR_INTERVAL_SECS is not a number: {secs}"))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.observability.log_level = level;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        anyhow::ensure!(
            self.simulator.interval_secs > 0,
            "simulator.interval_secs must be > 0"
        );
        Ok(())
    }

    pub fn default_config_path() -> String {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(std::path::Path::to_path_buf));

        if let Some(dir) = &exe_dir {
            let candidate = dir.join("watcher.toml");
            if candidate.exists() {
                return candidate.to_string_lossy().to_string();
            }
        }

        let candidate = Path::new("config/watcher.toml");
        if candidate.exists() {
            return candidate.to_string_lossy().to_string();
        }

        // Development checkout
        let candidate = Path::new("crates/watcher/config/watcher.toml");
        if candidate.exists() {
            return candidate.to_string_lossy().to_string();
        }

        "config/watcher.toml".to_string()
    }
}
