use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIのURLを上書きする環境変数
pub const API_URL_ENV: &str = "PROMPT_META_API_URL";

/// APIトークンを上書きする環境変数
pub const TOKEN_ENV: &str = "PROMPT_META_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// プロンプトストアのベースURL（例: https://example.com/api）
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    /// 出力先（省略時はカレント）
    pub output_dir: Option<PathBuf>,
    pub timeout_seconds: u64,
    /// フォルダスキャン時に既知プレフィックスのファイルだけを対象にする
    pub known_prefixes_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            output_dir: None,
            timeout_seconds: 30,
            known_prefixes_only: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Home-Verzeichnis nicht gefunden".into()))?;
        Ok(home.join(".config").join("prompt-meta").join("config.json"))
    }

    /// APIのURL（環境変数を優先）
    pub fn get_api_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }

        self.api_url.clone().ok_or(AppError::MissingApiUrl)
    }

    /// APIトークン（環境変数を優先）。未設定なら認証ヘッダーなしで呼ぶ
    pub fn get_api_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api_token.clone())
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(AppError::Config(format!("Ungültige URL: {}", url)));
        }
        self.api_url = Some(trimmed.to_string());
        self.save()
    }

    pub fn set_api_token(&mut self, token: String) -> Result<()> {
        self.api_token = Some(token);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.api_url.is_none());
        assert!(!config.known_prefixes_only);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_url": "https://x.test/api"}"#).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://x.test/api"));
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_config_path() {
        if let Ok(path) = Config::config_path() {
            assert!(path.ends_with("prompt-meta/config.json"));
        }
    }
}
