//! Markdown rendering and image-source rewriting

use lazy_static::lazy_static;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};

lazy_static! {
    /// A markdown image reference: `![alt](src)`, no title part
    static ref MD_IMAGE: Regex = Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").unwrap();
}

/// Markdown renderer for post bodies
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }
}

/// Rewrite every relative image source in a markdown body to start with
/// `prefix`, so images resolve through the image-serving endpoint regardless
/// of where the post stores them. Absolute `http(s)://` sources are left
/// untouched.
pub fn rewrite_image_sources(markdown: &str, prefix: &str) -> String {
    MD_IMAGE
        .replace_all(markdown, |caps: &Captures| {
            let src = &caps[2];
            if src.starts_with("http://") || src.starts_with("https://") {
                caps[0].to_string()
            } else {
                let src = src.trim_start_matches("./").trim_start_matches('/');
                format!("![{}]({}{})", &caps[1], prefix, src)
            }
        })
        .into_owned()
}
