use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

pub const API_URL_ENV: &str = "TABLE_ADMIN_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: Url,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_base_url: Option<String>,
}

pub fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "table-admin", "table-admin")
        .ok_or_else(|| anyhow!("unable to resolve config directory"))
}

pub fn load_config() -> Result<AppConfig> {
    let from_env = std::env::var(API_URL_ENV).ok();
    let from_file = match config_file_path() {
        Some(path) => read_config_file(&path)?,
        None => None,
    };
    let raw = resolve_base_url(
        from_env.as_deref(),
        from_file.as_deref(),
        option_env!("TABLE_ADMIN_API_URL"),
    );
    let api_base_url =
        Url::parse(raw).with_context(|| format!("invalid backend base URL: {raw}"))?;
    info!(%api_base_url, "backend configured");
    Ok(AppConfig { api_base_url })
}

/// First non-blank candidate wins: runtime env, config file, build-time env.
pub fn resolve_base_url<'a>(
    runtime: Option<&'a str>,
    file: Option<&'a str>,
    build_time: Option<&'a str>,
) -> &'a str {
    [runtime, file, build_time]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_URL)
}

#[cfg(not(target_arch = "wasm32"))]
fn config_file_path() -> Option<PathBuf> {
    project_dirs()
        .ok()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(target_arch = "wasm32")]
fn config_file_path() -> Option<PathBuf> {
    None
}

fn read_config_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let file: ConfigFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    Ok(file.api_base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_env_wins() {
        assert_eq!(
            resolve_base_url(Some("http://a"), Some("http://b"), Some("http://c")),
            "http://a"
        );
    }

    #[test]
    fn blank_values_are_skipped() {
        assert_eq!(resolve_base_url(Some("  "), None, Some("http://c")), "http://c");
    }

    #[test]
    fn falls_back_to_localhost() {
        assert_eq!(resolve_base_url(None, None, None), DEFAULT_API_URL);
    }

    #[test]
    fn config_file_is_read() {
        let dir = std::env::temp_dir().join(format!("table-admin-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "api_base_url": "https://admin.example.com" }"#)
            .expect("write config");

        let value = read_config_file(&path).expect("read config");

        assert_eq!(value.as_deref(), Some("https://admin.example.com"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let path = std::env::temp_dir().join("table-admin-missing").join(CONFIG_FILE);
        assert_eq!(read_config_file(&path).expect("read"), None);
    }
}
