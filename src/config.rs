use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::acquisition::{AnalysisSource, HttpAnalysisSource, OfflineSource};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub user_id: Option<String>,
    pub top_n: Option<usize>,
    pub offline: Option<bool>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/skillgap-roi/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.source.endpoint = endpoint;
        }
        if let Some(user_id) = overrides.user_id {
            self.analysis.user_id = user_id;
        }
        if let Some(top_n) = overrides.top_n {
            self.analysis.top_n = top_n;
        }
        if let Some(offline) = overrides.offline {
            self.source.offline = offline;
        }
    }

    /// The live source described by `[source]`, or the offline stand-in.
    pub fn build_source(&self) -> Result<Arc<dyn AnalysisSource>> {
        if self.source.offline {
            return Ok(Arc::new(OfflineSource));
        }
        let source = HttpAnalysisSource::new(
            self.source.endpoint.clone(),
            Duration::from_secs(self.source.timeout_secs.max(1)),
            Duration::from_secs(self.source.connect_timeout_secs.max(1)),
        )?;
        Ok(Arc::new(source))
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[source]
endpoint = "http://localhost:8000/api/v1/analysis/skill-gap"
timeout_secs = 12
connect_timeout_secs = 6
offline = false

[analysis]
user_id = "demo-user"
top_n = 5

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            offline: false,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            top_n: default_top_n(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000/api/v1/analysis/skill-gap".to_string()
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_connect_timeout_secs() -> u64 {
    6
}

fn default_user_id() -> String {
    "demo-user".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigOverrides};

    #[test]
    fn template_matches_defaults() {
        let parsed = Config::from_toml(&Config::default_template()).expect("template parses");
        let defaults = Config::default();
        assert_eq!(parsed.source.endpoint, defaults.source.endpoint);
        assert_eq!(parsed.source.timeout_secs, defaults.source.timeout_secs);
        assert_eq!(parsed.analysis.user_id, defaults.analysis.user_id);
        assert_eq!(parsed.analysis.top_n, defaults.analysis.top_n);
        assert_eq!(parsed.server.port, defaults.server.port);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed = Config::from_toml("[analysis]\ntop_n = 3\n").expect("partial config");
        assert_eq!(parsed.analysis.top_n, 3);
        assert_eq!(parsed.analysis.user_id, "demo-user");
        assert!(!parsed.source.offline);
    }

    #[test]
    fn overrides_win() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            endpoint: Some("http://127.0.0.1:9/skill-gap".to_string()),
            user_id: Some("u-7".to_string()),
            top_n: None,
            offline: Some(true),
        });
        assert_eq!(config.source.endpoint, "http://127.0.0.1:9/skill-gap");
        assert_eq!(config.analysis.user_id, "u-7");
        assert_eq!(config.analysis.top_n, 5);
        assert!(config.source.offline);
        assert_eq!(config.build_source().expect("source").name(), "offline");
    }
}
