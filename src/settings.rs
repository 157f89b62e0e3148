use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Keys shipped in `.env.example` files that must not count as configured
const PLACEHOLDER_KEYS: &[&str] = &["your_gemini_api_key_here", "changeme"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Service configuration, built once at startup and shared read-only
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub max_upload_mb: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_api_base: "https://generativelanguage.googleapis.com".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            request_timeout_secs: 60,
            max_upload_mb: 20,
        }
    }
}

impl AppSettings {
    /// Load settings from the optional JSON file named by `MEDILENS_SETTINGS`,
    /// then apply environment variables (env vars take priority)
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match std::env::var("MEDILENS_SETTINGS") {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Override fields from a variable lookup; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Some(base) = var("GEMINI_API_BASE") {
            self.gemini_api_base = base;
        }
        if let Some(host) = var("MEDILENS_HOST") {
            self.host = host;
        }
        if let Some(port) = var("MEDILENS_PORT") {
            self.port = parse_var("MEDILENS_PORT", &port)?;
        }
        if let Some(origins) = var("MEDILENS_ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(secs) = var("MEDILENS_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("MEDILENS_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(mb) = var("MEDILENS_MAX_UPLOAD_MB") {
            self.max_upload_mb = parse_var("MEDILENS_MAX_UPLOAD_MB", &mb)?;
        }
        Ok(())
    }

    /// The Gemini key, unless missing or a placeholder
    pub fn gemini_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !PLACEHOLDER_KEYS.contains(k))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
