use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub responder: ResponderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// 发票数据文件 (.csv / .json)，为空时使用内置样例
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig { path: None },
            responder: ResponderConfig {
                enabled: false,
                base_url: "http://127.0.0.1:11434/v1".to_string(),
                model: "llama3.2".to_string(),
                api_key: None,
                temperature: 0.7,
                max_tokens: 100,
                timeout_secs: 30,
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 环境变量前缀, 例如 INVOICE_CHAT__RESPONDER__ENABLED=true
    pub const ENV_PREFIX: &'static str = "INVOICE_CHAT";

    /// 加载顺序: 默认值 -> 配置文件(可选) -> 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let mut builder = Config::builder()
            .set_default("responder.enabled", defaults.responder.enabled)?
            .set_default("responder.base_url", defaults.responder.base_url)?
            .set_default("responder.model", defaults.responder.model)?
            .set_default("responder.temperature", defaults.responder.temperature as f64)?
            .set_default("responder.max_tokens", defaults.responder.max_tokens as i64)?
            .set_default("responder.timeout_secs", defaults.responder.timeout_secs as i64)?
            .set_default("log.level", defaults.log.level)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 配置文件路径: 命令行第一个参数优先, 其次 INVOICE_CHAT_CONFIG
    pub fn resolve_path(arg: Option<String>) -> Option<PathBuf> {
        arg.or_else(|| std::env::var("INVOICE_CHAT_CONFIG").ok())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert!(config.data.path.is_none());
        assert_eq!(config.responder.model, "llama3.2");
        assert_eq!(config.responder.max_tokens, 100);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_overrides_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[data]
path = "invoices.csv"

[responder]
enabled = true
model = "qwen2.5"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data.path, Some(PathBuf::from("invoices.csv")));
        assert!(config.responder.enabled);
        assert_eq!(config.responder.model, "qwen2.5");
        assert_eq!(config.responder.timeout_secs, 30);
    }

    #[test]
    fn test_resolve_path_prefers_argument() {
        let path = AppConfig::resolve_path(Some("chat.toml".to_string()));
        assert_eq!(path, Some(PathBuf::from("chat.toml")));
    }
}
