//! List site content

use anyhow::Result;

use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let service = blog.post_service();

    match content_type {
        "post" | "posts" => {
            let posts = service.store().load_all_posts().await?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date, post.title, post.id);
            }
        }
        "id" | "ids" => {
            let ids = service.get_post_ids().await?;
            println!("Ids ({}):", ids.len());
            for id in ids {
                println!("  {}", id);
            }
        }
        "tag" | "tags" => {
            let tags = service.get_tag_list().await?;
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        "category" | "categories" => {
            let categories = service.get_category_list().await?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!("  {} ({})", category.name, category.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, id, tag, category",
                content_type
            );
        }
    }

    Ok(())
}
