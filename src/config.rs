//! Configuration for the bookshelf server.
//!
//! Loaded from (later overrides earlier): defaults, a TOML file, then
//! `BOOKSHELF_` environment variables (`BOOKSHELF_SERVER__PORT=9000`).

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default configuration file name (resolved against the working directory).
pub const CONFIG_FILE_NAME: &str = "bookshelf.toml";

/// Default backing file for the collection.
pub const DATA_FILE_NAME: &str = "books_data.json";

const ENV_PREFIX: &str = "BOOKSHELF_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// コレクション全体を保持するJSONファイル
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE_NAME),
        }
    }
}

impl Config {
    /// 設定ファイル（省略時は `bookshelf.toml`）と環境変数から読み込む。
    /// ファイルが無ければデフォルト値のまま。
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be greater than 0".into(),
            ));
        }
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.data_file must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// `host:port` 形式のbindアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
