//! Application configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Server configuration, loaded from `_config.yml` in the base directory.
///
/// Every field has a default so a missing or partial config file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Site title, echoed in logs only
    pub title: String,

    /// Directory containing one subdirectory per post, relative to the
    /// base directory
    pub posts_dir: String,

    /// Number of posts per result page
    pub per_page: usize,

    /// Maximum number of related posts returned for a reference post
    pub related_max: usize,

    /// Address to bind the server to
    pub ip: String,

    /// Port to bind the server to
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            posts_dir: "posts".to_string(),
            per_page: 10,
            related_max: 5,
            ip: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
