use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::controller::Viewer;
use crate::language::Language;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("unknown language id {0:?}")]
    UnknownLanguage(String),
    #[error("invalid service url {0:?}: {1}")]
    InvalidUrl(String, String),
}

/// Settings shared by the CLI and the TUI. Every field may come from a TOML file;
/// command-line values override the file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PanelConfig {
    pub base_url: String,
    /// Username used for new comments; blank posts as Anonymous.
    pub user: String,
    pub user_id: Option<String>,
    pub admin: bool,
    pub language: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user: String::new(),
            user_id: None,
            admin: false,
            language: Language::default().id.to_string(),
            timeout_secs: 10,
            log_level: format!("info,{}=debug", env!("CARGO_CRATE_NAME")),
        }
    }
}

impl PanelConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display_language()?;
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl(self.base_url.clone(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(self.base_url.clone(), format!("unsupported scheme {}", url.scheme())));
        }
        Ok(())
    }

    pub fn display_language(&self) -> Result<Language, ConfigError> {
        Language::from_id(&self.language).ok_or_else(|| ConfigError::UnknownLanguage(self.language.clone()))
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.user_id.clone(), self.admin)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = PanelConfig::from_toml_str("base_url = \"https://example.org\"\nadmin = true\n").unwrap();
        assert_eq!(cfg.base_url, "https://example.org");
        assert!(cfg.admin);
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.timeout_secs, 10);
        cfg.validate().unwrap();
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user = \"ada\"\nuser_id = \"u-7\"\nlanguage = \"de\"").unwrap();
        let cfg = PanelConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.user, "ada");
        assert_eq!(cfg.display_language().unwrap().name, "German");
        assert_eq!(cfg.viewer(), Viewer::new(Some("u-7".into()), false));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        match PanelConfig::from_file(&dir.path().join("absent.toml")) {
            Err(ConfigError::Io { .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = PanelConfig { language: "sq".into(), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownLanguage(_))));
        let cfg = PanelConfig { base_url: "ftp://host".into(), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidUrl(..))));
        let cfg = PanelConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidUrl(..))));
        assert!(PanelConfig::from_toml_str("timeout_secs = \"soon\"").is_err());
    }
}
