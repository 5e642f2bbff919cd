//! mdblog: a small blog API server backed by a directory of markdown posts
//!
//! Posts live one-per-subdirectory under a posts root, with front-matter
//! metadata and a markdown body in `index.md`. The server re-reads the
//! directory on every request and exposes listing, filtering, pagination,
//! taxonomy aggregation, related-post discovery, and raw image serving,
//! plus a small in-memory items resource.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod items;
pub mod query;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::PostStore;
use query::PostService;

/// The main application
#[derive(Clone)]
pub struct Blog {
    /// Server configuration
    pub config: config::AppConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding one subdirectory per post
    pub posts_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::AppConfig::load(&config_path)?
        } else {
            config::AppConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
        })
    }

    /// Build the post service over this blog's posts directory
    pub fn post_service(&self) -> PostService {
        PostService::new(
            PostStore::new(self.posts_dir.clone()),
            self.config.per_page,
            self.config.related_max,
        )
    }
}
