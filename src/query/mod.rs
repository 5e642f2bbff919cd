//! Query engine - filtering, pagination, aggregation, related posts
//!
//! Every operation re-reads the full post set from storage; there is no
//! cache. That is an O(N) directory scan plus O(N) file reads per call,
//! acceptable for the small post counts this serves.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::content::{Category, Post, PostResponse, PostStore, Tag};
use crate::error::PostError;

/// Post retrieval and query service.
///
/// The random source used by related-post selection is injectable so tests
/// can run against a seeded generator.
pub struct PostService {
    store: PostStore,
    per_page: usize,
    related_max: usize,
    rng: Mutex<StdRng>,
}

impl PostService {
    pub fn new(store: PostStore, per_page: usize, related_max: usize) -> Self {
        Self::with_rng(store, per_page, related_max, StdRng::from_entropy())
    }

    /// Create a service with an explicit random source
    pub fn with_rng(store: PostStore, per_page: usize, related_max: usize, rng: StdRng) -> Self {
        Self {
            store,
            per_page,
            related_max,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Get one page of posts, optionally filtered.
    ///
    /// Exactly one filter applies, in fixed precedence order:
    /// category > tag > search > none. Supplying several at once is not an
    /// error; the lower-precedence ones are ignored. This is a contract the
    /// callers rely on, not an oversight.
    pub async fn get_posts(
        &self,
        page: Option<usize>,
        category: Option<&str>,
        tag: Option<&str>,
        search: Option<&str>,
    ) -> Result<PostResponse, PostError> {
        let all_posts = self.store.load_all_posts().await?;

        let filtered = if let Some(category) = nonempty(category) {
            all_posts
                .into_iter()
                .filter(|post| post.categories.iter().any(|c| c == category))
                .collect()
        } else if let Some(tag) = nonempty(tag) {
            all_posts
                .into_iter()
                .filter(|post| post.tags.iter().any(|t| t == tag))
                .collect()
        } else if let Some(search) = nonempty(search) {
            filter_by_search(all_posts, search)
        } else {
            all_posts
        };

        let total_count = filtered.len();
        let posts = page_slice(filtered, page.unwrap_or(1), self.per_page);

        Ok(PostResponse { posts, total_count })
    }

    /// Get a single post by id
    pub async fn get_post_by_id(&self, id: &str) -> Result<Post, PostError> {
        self.store.load_post(id).await
    }

    /// List all post ids
    pub async fn get_post_ids(&self) -> Result<Vec<String>, PostError> {
        self.store.list_post_ids().await
    }

    /// Every category with the number of posts carrying it, in first-seen
    /// order over the date-sorted post list. No further sorting is applied.
    pub async fn get_category_list(&self) -> Result<Vec<Category>, PostError> {
        let posts = self.store.load_all_posts().await?;

        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for post in &posts {
            for name in &post.categories {
                *counts.entry(name.clone()).or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|(name, count)| Category { name, count })
            .collect())
    }

    /// Every tag with the number of posts carrying it, in first-seen order
    pub async fn get_tag_list(&self) -> Result<Vec<Tag>, PostError> {
        let posts = self.store.load_all_posts().await?;

        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for post in &posts {
            for name in &post.tags {
                *counts.entry(name.clone()).or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|(name, count)| Tag { name, count })
            .collect())
    }

    /// Posts sharing a category or tag with the reference post, shuffled and
    /// truncated to the configured maximum.
    ///
    /// Candidates are collected in two phases: category matches first, then
    /// tag matches, each guarded against duplicates and against the reference
    /// post itself. The shuffle makes the output order (and, past the
    /// maximum, the selection) non-deterministic with the default random
    /// source.
    pub async fn get_related_posts(&self, post: &Post) -> Result<Vec<Post>, PostError> {
        let all_posts = self.store.load_all_posts().await?;

        let mut related: Vec<Post> = Vec::new();

        for category in &post.categories {
            for candidate in &all_posts {
                if candidate.id != post.id
                    && candidate.categories.iter().any(|c| c == category)
                    && related.iter().all(|r| r.id != candidate.id)
                {
                    related.push(candidate.clone());
                }
            }
        }

        for tag in &post.tags {
            for candidate in &all_posts {
                if candidate.id != post.id
                    && candidate.tags.iter().any(|t| t == tag)
                    && related.iter().all(|r| r.id != candidate.id)
                {
                    related.push(candidate.clone());
                }
            }
        }

        let mut rng = self.rng.lock().await;
        related.shuffle(&mut *rng);
        related.truncate(self.related_max);

        Ok(related)
    }

    /// Raw image bytes from a post's directory
    pub async fn get_post_image_file(&self, id: &str, file: &str) -> Result<Vec<u8>, PostError> {
        self.store.read_image(id, file).await
    }
}

fn nonempty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Keep posts where every search term occurs in the title, or every term
/// occurs in the article body. The two checks are independent; a post whose
/// title carries all terms matches even if its body carries none.
fn filter_by_search(posts: Vec<Post>, query: &str) -> Vec<Post> {
    let query = query.to_lowercase().replace('\u{3000}', " ");
    let terms: Vec<&str> = query.split(' ').collect();

    posts
        .into_iter()
        .filter(|post| {
            let title = post.title.to_lowercase();
            let article = post.article.to_lowercase();
            terms.iter().all(|term| title.contains(term))
                || terms.iter().all(|term| article.contains(term))
        })
        .collect()
}

/// Slice out a 1-based page. No bounds clamping: a page past the end is an
/// empty list, not an error.
fn page_slice(posts: Vec<Post>, page: usize, per_page: usize) -> Vec<Post> {
    let start = page.saturating_sub(1) * per_page;
    posts.into_iter().skip(start).take(per_page).collect()
}
