//! 配置文件与日志目录
//!
//! - settings: `<cache>/.sitemap-sync/settings.json`
//! - logs: `<data>/sitemap-sync/logs`

use std::path::{Path, PathBuf};

use crate::kernel::error::Result;
use crate::kernel::services::ports::SitemapConfig;

const APP_NAME: &str = "sitemap-sync";
const SETTINGS_DIR: &str = ".sitemap-sync";
const SETTINGS_FILE: &str = "settings.json";
const LOG_DIR: &str = "logs";

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Writes the default settings to `path` unless a file already exists there.
pub fn ensure_settings_file_at(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&SitemapConfig::default())?;
        std::fs::write(path, content)?;
    }
    Ok(())
}

pub fn ensure_settings_file() -> Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

pub fn load_config_from(path: &Path) -> Result<SitemapConfig> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Loads the user settings; anything unreadable falls back to defaults.
pub fn load_config() -> SitemapConfig {
    let Some(path) = get_settings_path() else {
        return SitemapConfig::default();
    };
    match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "using default settings");
            SitemapConfig::default()
        }
    }
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine log directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_NAME)
        });
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_DATA_HOME 优先，否则 ~/.local/share
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return Some(PathBuf::from(xdg).join(APP_NAME));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME));
    }

    #[cfg(target_os = "windows")]
    {
        return std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME));
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
