use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::service::HttpTimeouts;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per service call (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/mdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdlConfig {
    /// Base URL of the job service.
    pub service_url: String,
    /// Wait between progress polls of a download job.
    pub download_poll_interval_ms: u64,
    /// Wait between progress polls of a convert job.
    pub convert_poll_interval_ms: u64,
    /// Give up on a job that has not finished after this long (None = wait forever).
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
    pub connect_timeout_secs: u64,
    /// Timeout for start/progress/cancel calls.
    pub request_timeout_secs: u64,
    /// Timeout for the whole artifact transfer.
    pub artifact_timeout_secs: u64,
    /// Where completed downloads are saved (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for MdlConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8000/".to_string(),
            download_poll_interval_ms: 500,
            convert_poll_interval_ms: 1000,
            max_wait_secs: Some(4 * 60 * 60),
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            artifact_timeout_secs: 3600,
            download_dir: None,
            retry: None,
        }
    }
}

impl MdlConfig {
    pub fn http_timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
            artifact: Duration::from_secs(self.artifact_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MdlConfig::default();
        assert_eq!(cfg.service_url, "http://127.0.0.1:8000/");
        assert_eq!(cfg.download_poll_interval_ms, 500);
        assert_eq!(cfg.convert_poll_interval_ms, 1000);
        assert_eq!(cfg.max_wait_secs, Some(14_400));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MdlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.service_url, cfg.service_url);
        assert_eq!(parsed.download_poll_interval_ms, cfg.download_poll_interval_ms);
        assert_eq!(parsed.convert_poll_interval_ms, cfg.convert_poll_interval_ms);
        assert_eq!(parsed.max_wait_secs, cfg.max_wait_secs);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            service_url = "http://media-box:9000/"
            download_poll_interval_ms = 250
            convert_poll_interval_ms = 2000
            connect_timeout_secs = 5
            request_timeout_secs = 10
            artifact_timeout_secs = 600
            download_dir = "/srv/media"
        "#;
        let cfg: MdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.service_url, "http://media-box:9000/");
        assert_eq!(cfg.download_poll_interval_ms, 250);
        assert!(cfg.max_wait_secs.is_none());
        assert!(cfg.retry.is_none());
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/srv/media")));
        let t = cfg.http_timeouts();
        assert_eq!(t.connect, Duration::from_secs(5));
        assert_eq!(t.artifact, Duration::from_secs(600));
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            service_url = "http://127.0.0.1:8000/"
            download_poll_interval_ms = 500
            convert_poll_interval_ms = 1000
            max_wait_secs = 60
            connect_timeout_secs = 15
            request_timeout_secs = 30
            artifact_timeout_secs = 3600

            [retry]
            max_attempts = 3
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: MdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_wait_secs, Some(60));
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 3);
        assert!((retry.base_delay_secs - 0.5).abs() < 1e-9);
        assert_eq!(retry.max_delay_secs, 15);
    }
}
