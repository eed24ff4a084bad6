//! Text extraction from resume documents

use crate::error::{Result, ScreenerError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        markdown_to_text(&markdown_content)
    }
}

/// Render markdown to HTML and strip it back down to plain lines.
pub fn markdown_to_text(markdown: &str) -> Result<String> {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_to_text(&html_output)
}

fn html_to_text(html: &str) -> Result<String> {
    let text = html
        .replace("<br>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let tags = Regex::new(r"<[^>]*>")
        .map_err(|e| ScreenerError::InvalidInput(format!("Failed to build tag pattern: {}", e)))?;
    let clean_text = tags.replace_all(&text, "").replace("&amp;", "&");

    let lines: Vec<&str> = clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text() {
        let markdown = "# Jane Doe\n\n**Skills:** Python & SQL\n\n- Docker\n- AWS\n";
        let text = markdown_to_text(markdown).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Jane Doe");
        assert_eq!(lines[1], "Skills: Python & SQL");
        assert!(lines.contains(&"Docker"));
        assert!(lines.contains(&"AWS"));
    }

    #[test]
    fn test_empty_markdown() {
        assert_eq!(markdown_to_text("").unwrap(), "");
    }
}
