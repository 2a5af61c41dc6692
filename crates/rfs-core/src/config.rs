use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Where module bundles get their installer from unless the config says otherwise.
pub const DEFAULT_INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/topjohnwu/Magisk/master/scripts/module_installer.sh";

/// Global configuration loaded from `~/.config/rfs/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfsConfig {
    /// Installer template fetched for repackaged module bundles.
    pub installer_url: String,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer in seconds (0 = no limit).
    pub timeout_secs: u64,
    /// Abort when slower than this many bytes per second...
    pub low_speed_limit: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirections: u32,
    /// Optional User-Agent override; defaults to `rfs/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Body chunks buffered between the transfer thread and the writer.
    pub channel_depth: usize,
    /// Minimum interval between terminal progress lines in the CLI.
    pub progress_interval_ms: u64,
}

impl Default for RfsConfig {
    fn default() -> Self {
        Self {
            installer_url: DEFAULT_INSTALLER_URL.to_string(),
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
            user_agent: None,
            channel_depth: 64,
            progress_interval_ms: 500,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rfs")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RfsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RfsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RfsConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportOptions;
    use std::time::Duration;

    #[test]
    fn default_config_values() {
        let cfg = RfsConfig::default();
        assert_eq!(cfg.installer_url, DEFAULT_INSTALLER_URL);
        assert_eq!(cfg.connect_timeout_secs, 30);
        assert_eq!(cfg.max_redirections, 10);
        assert_eq!(cfg.channel_depth, 64);
        assert!(cfg.user_agent.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RfsConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RfsConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.installer_url, cfg.installer_url);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
        assert_eq!(parsed.low_speed_limit, cfg.low_speed_limit);
        assert_eq!(parsed.progress_interval_ms, cfg.progress_interval_ms);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            installer_url = "https://mirror.example.com/installer.sh"
            connect_timeout_secs = 5
            timeout_secs = 0
            low_speed_limit = 10
            low_speed_time_secs = 20
            max_redirections = 3
            user_agent = "custom/1.0"
            channel_depth = 8
            progress_interval_ms = 100
        "#;
        let cfg: RfsConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.installer_url, "https://mirror.example.com/installer.sh");
        assert_eq!(cfg.timeout_secs, 0);
        assert_eq!(cfg.user_agent.as_deref(), Some("custom/1.0"));

        let opts = TransportOptions::from(&cfg);
        assert_eq!(opts.connect_timeout, Duration::from_secs(5));
        assert_eq!(opts.low_speed_time, Duration::from_secs(20));
        assert_eq!(opts.max_redirections, 3);
        assert_eq!(opts.user_agent, "custom/1.0");
        assert_eq!(opts.channel_depth, 8);
    }

    #[test]
    fn transport_options_default_user_agent() {
        let opts = TransportOptions::from(&RfsConfig::default());
        assert!(opts.user_agent.starts_with("rfs/"));
    }

    #[test]
    fn zero_channel_depth_is_clamped() {
        let cfg = RfsConfig {
            channel_depth: 0,
            ..RfsConfig::default()
        };
        assert_eq!(TransportOptions::from(&cfg).channel_depth, 1);
    }
}
