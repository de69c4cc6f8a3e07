use std::env;
use std::path::PathBuf;

use serde::Deserialize;

/// Server configuration loaded via environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Static asset settings
    pub public_dir: PathBuf,

    // Data settings (instance store + job logs)
    pub data_dir: PathBuf,

    // Provisioning script settings
    pub script_template: PathBuf,

    // Hostname settings
    pub domain_suffix: String,
    pub ping_timeout_secs: u64,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    // Development settings
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            public_dir: env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "./public".to_string())
                .into(),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),

            script_template: env::var("SCRIPT_TEMPLATE")
                .unwrap_or_else(|_| "./scripts/provision.sh.tmpl".to_string())
                .into(),

            domain_suffix: env::var("DOMAIN_SUFFIX")
                .unwrap_or_else(|_| "aopstest.com".to_string()),
            ping_timeout_secs: env::var("PING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),

            dev_mode: env::var("DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }

    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Directory holding per-job transcript logs.
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Path of the persisted instance list.
    pub fn instances_file(&self) -> PathBuf {
        self.data_dir.join("instances.json")
    }

    /// Fully qualified hostname candidate for a submitted prefix.
    pub fn hostname_for(&self, prefix: &str) -> String {
        format!("{prefix}.{}", self.domain_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            public_dir: "./public".into(),
            data_dir: "/tmp/provis-data".into(),
            script_template: "./scripts/provision.sh.tmpl".into(),
            domain_suffix: "aopstest.com".to_string(),
            ping_timeout_secs: 3,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            dev_mode: false,
        }
    }

    #[test]
    fn hostname_is_prefix_plus_domain_suffix() {
        let config = sample_config();
        assert_eq!(config.hostname_for("web01"), "web01.aopstest.com");
    }

    #[test]
    fn data_paths_hang_off_data_dir() {
        let config = sample_config();
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/provis-data/logs"));
        assert_eq!(
            config.instances_file(),
            PathBuf::from("/tmp/provis-data/instances.json")
        );
    }
}
