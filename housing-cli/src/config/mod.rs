//! Service settings and the SQLite-backed repository

pub mod repository;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fallback signing key. Only meant for local use; `serve` warns when it is
/// still in effect.
pub const DEFAULT_SECRET_KEY: &str = "change-me-in-production";

/// Runtime settings.
///
/// Loaded from a TOML file when one exists, then overridden by environment
/// variables. Every field has a default so an empty or missing file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// sqlx SQLite URL
    pub database_url: String,
    /// HS256 signing key for bearer tokens
    pub secret_key: String,
    /// Lifetime of issued tokens
    pub token_expire_minutes: i64,
    /// Address the HTTP server binds to
    pub bind: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Largest accepted upload body
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            token_expire_minutes: 60,
            bind: "127.0.0.1:8000".to_string(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

fn default_database_url() -> String {
    let path = dirs::data_dir()
        .map(|dir| dir.join("housing").join("housing.db"))
        .unwrap_or_else(|| PathBuf::from("housing.db"));
    format!("sqlite://{}", path.display())
}

impl Settings {
    /// Default settings file location (`<config dir>/housing/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("housing").join("config.toml"))
    }

    /// Load settings from `path` (or the default location), then apply
    /// environment overrides. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path.is_some();
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut settings = match path {
            Some(path) if path.exists() => {
                log::debug!("Loading settings from {}", path.display());
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
            }
            Some(path) if explicit => {
                anyhow::bail!("Settings file does not exist: {}", path.display());
            }
            _ => Self::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid settings TOML")
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(key) = var("HOUSING_SECRET_KEY") {
            self.secret_key = key;
        }
        if let Some(bind) = var("HOUSING_BIND") {
            self.bind = bind;
        }
        if let Some(minutes) = var("HOUSING_TOKEN_EXPIRE_MINUTES") {
            self.token_expire_minutes = minutes
                .trim()
                .parse()
                .with_context(|| format!("HOUSING_TOKEN_EXPIRE_MINUTES is not a number: {}", minutes))?;
        }
        if let Some(bytes) = var("HOUSING_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = bytes
                .trim()
                .parse()
                .with_context(|| format!("HOUSING_MAX_UPLOAD_BYTES is not a number: {}", bytes))?;
        }
        if let Some(origins) = var("HOUSING_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            bind = "0.0.0.0:9000"
            token_expire_minutes = 15
            "#,
        )
        .unwrap();

        assert_eq!(settings.bind, "0.0.0.0:9000");
        assert_eq!(settings.token_expire_minutes, 15);
        assert_eq!(settings.secret_key, DEFAULT_SECRET_KEY);
        assert_eq!(settings.cors_origins.len(), 2);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOUSING_SECRET_KEY", "s3cret"),
            ("HOUSING_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]);

        let mut settings = Settings::default();
        settings
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.secret_key, "s3cret");
        assert!(!settings.uses_default_secret());
        assert_eq!(
            settings.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_bad_numeric_override_is_error() {
        let mut settings = Settings::default();
        let result = settings.apply_overrides(|key| {
            (key == "HOUSING_TOKEN_EXPIRE_MINUTES").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_upload_bytes = 1024\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.max_upload_bytes, 1024);
    }
}
