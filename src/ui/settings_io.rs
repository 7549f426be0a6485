use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::model::settings::AppSettings;

const APP_DIR: &str = "parallel_narratives";

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("settings.json");
    path
}

/// Reads the settings file, falling back to defaults, then applies env overrides.
pub fn load_settings() -> AppSettings {
    let path = settings_path();
    let mut settings = match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
            AppSettings::default()
        }),
        Err(_) => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            AppSettings::default()
        }
    };

    settings.apply_env_overrides();
    settings
}

pub fn save_settings(settings: &AppSettings) -> anyhow::Result<()> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
