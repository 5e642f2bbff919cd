//! Post and taxonomy models

use serde::{Deserialize, Serialize};

/// A blog post, loaded from `<posts_dir>/<id>/index.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Stable identifier, equal to the post's directory name
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date, kept as the raw front-matter string
    pub date: String,

    /// Thumbnail image URL, rewritten to resolve through the image endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Post categories, in front-matter order
    pub categories: Vec<String>,

    /// Article body rendered to HTML, with image sources rewritten
    pub article: String,
}

/// One page of posts plus the size of the filtered set it was sliced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub posts: Vec<Post>,
    pub total_count: usize,
}

/// A category name with the number of posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub count: usize,
}

/// A tag name with the number of posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub count: usize,
}
