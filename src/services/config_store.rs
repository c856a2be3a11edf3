// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub service: ServiceConfig,
    pub proxy: Option<ProxyConfig>,
}

impl AppConfig {
    /// Proxy URL to route service traffic through, if enabled.
    pub fn proxy_url(&self) -> Option<&str> {
        let proxy = self.proxy.as_ref().filter(|p| p.enabled)?;
        proxy.https.as_deref().or(proxy.http.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub enabled: bool,
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Tweets requested by the initial submission
    #[serde(default = "default_initial_page_size")]
    pub initial_page_size: u32,
    /// Tweets requested by each "load more"
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: 120,
            initial_page_size: 5,
            page_size: 10,
        }
    }
}

impl ServiceConfig {
    /// Base URL with the `SENTANAL_API_URL` override applied.
    pub fn resolved_base_url(&self) -> String {
        match env::var("SENTANAL_API_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.base_url.clone(),
        }
    }
}

fn default_base_url() -> String { DEFAULT_SERVICE_URL.to_string() }
fn default_timeout() -> u64 { 120 }
fn default_initial_page_size() -> u32 { 5 }
fn default_page_size() -> u32 { 10 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sentanal"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        self.cleanup_old_backups(&backup_dir, 10)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // File names embed the timestamp, so name order is age order.
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    /// Get the analysis service base URL from config file
    pub fn get_service_url(&self) -> Result<String, String> {
        Ok(self.load()?.service.base_url)
    }

    /// Set the analysis service base URL in config file
    pub fn set_service_url(&self, url: &str) -> Result<(), String> {
        let mut config = self.load()?;
        config.service.base_url = url.trim_end_matches('/').to_string();
        self.save(&config)
    }
}
