//! Post loader - reads posts from the posts directory
//!
//! Storage layout is one subdirectory per post, named by the post id, with
//! the source at `<posts_dir>/<id>/index.md` and images alongside it. There
//! is no cache: every listing re-reads the directory and every post is
//! re-parsed from disk.

use std::io;
use std::path::{Path, PathBuf};

use super::frontmatter::{parse_date, PostMeta};
use super::markdown::{rewrite_image_sources, MarkdownRenderer};
use super::Post;
use crate::error::PostError;

/// URL prefix the image-serving endpoint is mounted under
pub const IMAGE_URL_PREFIX: &str = "/api/post/img";

/// Loads posts from the posts root directory
#[derive(Debug, Clone)]
pub struct PostStore {
    posts_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl PostStore {
    pub fn new<P: Into<PathBuf>>(posts_dir: P) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// List post ids: the immediate subdirectories of the posts root.
    ///
    /// A root that cannot be listed is a storage-level failure and
    /// propagates, unlike single-post read failures.
    pub async fn list_post_ids(&self) -> Result<Vec<String>, PostError> {
        let unavailable = |source: io::Error| PostError::StorageUnavailable {
            path: self.posts_dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.posts_dir)
            .await
            .map_err(unavailable)?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let file_type = entry.file_type().await.map_err(unavailable)?;
            if !file_type.is_dir() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                ids.push(name);
            }
        }

        Ok(ids)
    }

    /// Load a single post from `<posts_dir>/<id>/index.md`.
    ///
    /// A missing file yields `NotFound`, any other I/O failure `Read`.
    pub async fn load_post(&self, id: &str) -> Result<Post, PostError> {
        let path = self.post_dir(id)?.join("index.md");

        let content = tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PostError::NotFound { id: id.to_string() }
            } else {
                PostError::Read {
                    id: id.to_string(),
                    source,
                }
            }
        })?;

        Ok(self.parse_post(id, &content))
    }

    /// Load every post, newest first.
    ///
    /// Posts that fail to load are logged and skipped; the caller sees a
    /// shorter list, not an error.
    pub async fn load_all_posts(&self) -> Result<Vec<Post>, PostError> {
        let ids = self.list_post_ids().await?;

        let mut posts = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load_post(&id).await {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {}: {}", id, e);
                }
            }
        }

        // Sort by date descending (newest first); dates that don't parse
        // fall back to string comparison
        posts.sort_by(|a, b| match (parse_date(&a.date), parse_date(&b.date)) {
            (Some(da), Some(db)) => db.cmp(&da),
            _ => b.date.cmp(&a.date),
        });

        Ok(posts)
    }

    /// Read a raw image file stored next to a post's source
    pub async fn read_image(&self, id: &str, file: &str) -> Result<Vec<u8>, PostError> {
        validate_component(file)?;
        let path = self.post_dir(id)?.join(file);

        tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PostError::NotFound {
                    id: format!("{}/{}", id, file),
                }
            } else {
                PostError::Read {
                    id: format!("{}/{}", id, file),
                    source,
                }
            }
        })
    }

    fn post_dir(&self, id: &str) -> Result<PathBuf, PostError> {
        validate_component(id)?;
        Ok(self.posts_dir.join(id))
    }

    /// Convert the raw file contents into a `Post`, rewriting the thumbnail
    /// and body image paths to resolve through the image endpoint.
    fn parse_post(&self, id: &str, content: &str) -> Post {
        let (meta, body) = PostMeta::parse(content);

        let prefix = format!("{}/{}/", IMAGE_URL_PREFIX, id);
        let article = self.renderer.render(&rewrite_image_sources(body, &prefix));

        let thumbnail = meta.thumbnail.map(|t| {
            let t = t.trim_start_matches("./").trim_start_matches('/');
            format!("{}{}", prefix, t)
        });

        Post {
            id: id.to_string(),
            title: meta.title,
            date: meta.date,
            thumbnail,
            tags: meta.tags,
            categories: meta.categories,
            article,
        }
    }
}

/// Reject path components that would escape the post's directory
fn validate_component(s: &str) -> Result<(), PostError> {
    if s.is_empty() || s == "." || s == ".." || s.contains(['/', '\\']) {
        return Err(PostError::InvalidPath(s.to_string()));
    }
    Ok(())
}
