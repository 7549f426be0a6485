use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const URL_ENV: &str = "PARALLEL_NARRATIVES_URL";
pub const MODEL_ENV: &str = "PARALLEL_NARRATIVES_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub ui_scale: f32,
    pub backend: BackendSettings,
    pub retry: RetrySettings,

    /// Where saved records go; the documents dir when unset
    pub save_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            backend: BackendSettings::default(),
            retry: RetrySettings::default(),
            save_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// OpenAI-compatible root, e.g. LM Studio or Ollama's /v1
    pub base_url: String,
    pub model: String,

    /// Name of the env var holding the API key. Local servers need none.
    pub api_key_env: String,
    pub require_api_key: bool,

    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".into(),
            model: "local-model".into(),
            api_key_env: "PARALLEL_NARRATIVES_API_KEY".into(),
            require_api_key: false,
            temperature: 0.8,
            top_p: 0.9,
            max_tokens: 1200,
            timeout_secs: 120,
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub loading_wait_min_secs: u64,
    pub loading_wait_max_secs: u64,
    pub rate_limit_wait_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            loading_wait_min_secs: 10,
            loading_wait_max_secs: 20,
            rate_limit_wait_secs: 30,
        }
    }
}

impl AppSettings {
    /// Env vars win over the file for the backend location.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV) {
            tracing::info!(%url, "backend url overridden from environment");
            self.backend.base_url = url;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            tracing::info!(%model, "backend model overridden from environment");
            self.backend.model = model;
        }
    }

    pub fn save_dir_or_default(&self) -> PathBuf {
        self.save_dir
            .clone()
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let json = r#"{ "backend": { "model": "llama3.2:3b" }, "ui_scale": 1.5 }"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.backend.model, "llama3.2:3b");
        assert_eq!(settings.backend.base_url, "http://localhost:1234/v1");
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.ui_scale, 1.5);
    }

    #[test]
    fn round_trips_through_json() {
        let mut settings = AppSettings::default();
        settings.save_dir = Some(PathBuf::from("/tmp/recits"));
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn explicit_save_dir_wins() {
        let settings = AppSettings {
            save_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        assert_eq!(settings.save_dir_or_default(), PathBuf::from("out"));
    }
}
