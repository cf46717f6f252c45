//! Image URL discovery in Markdown documents
//!
//! Only inline images pointing at `http`/`https` URLs are candidates for the
//! mirror, e.g. `![img alt](https://i.imgur.com/bbb.png)`.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::matcher::{FilterError, UrlFilter};

static IMAGE_LINK: OnceLock<Regex> = OnceLock::new();

fn image_link() -> &'static Regex {
    // pattern is a literal, covered by test_image_link_compiles
    IMAGE_LINK.get_or_init(|| Regex::new(r"!\[(.*)\]\((https*://[^)]+)\)").expect("image link pattern is valid"))
}

/// Image URLs of a document split by the filter verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUrls {
    pub accepted: Vec<String>,
    pub excluded: Vec<String>,
}

/// Collect remote image URLs, first-seen order, without duplicates.
///
/// Each line is searched once, so only the first image link found on a line
/// is picked up.
pub fn image_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for line in text.lines() {
        let Some(captures) = image_link().captures(line.trim()) else {
            continue;
        };
        let url = &captures[2];
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    }

    urls
}

/// Collect remote image URLs and split them by the filter.
pub fn partition_image_urls(text: &str, filter: &UrlFilter) -> Result<ImageUrls, FilterError> {
    let mut result = ImageUrls::default();

    for url in image_urls(text) {
        if filter.is_allowed(&url)? {
            result.accepted.push(url);
        } else {
            log::info!("excluding img_url\n  {}", url);
            result.excluded.push(url);
        }
    }

    Ok(result)
}

/// Collect the remote image URLs the filter lets through.
pub fn accepted_image_urls(text: &str, filter: &UrlFilter) -> Result<Vec<String>, FilterError> {
    partition_image_urls(text, filter).map(|urls| urls.accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# Notes

![diagram](https://i.imgur.com/AbC9.png)
Some text with ![inline](https://i.stack.imgur.com/aBc8.png) in the middle.
    ![indented](http://localhost/100.png)
![local](./images/local.png)
[not an image](https://i.imgur.com/link.png)
![again](https://i.imgur.com/AbC9.png)
";

    #[test]
    fn test_image_urls() {
        assert_eq!(
            image_urls(DOC),
            vec![
                "https://i.imgur.com/AbC9.png",
                "https://i.stack.imgur.com/aBc8.png",
                "http://localhost/100.png",
            ]
        );
    }

    #[test]
    fn test_image_urls_empty_document() {
        assert!(image_urls("").is_empty());
        assert!(image_urls("no images here\n").is_empty());
    }

    #[test]
    fn test_one_image_per_line() {
        // Greedy alt text runs to the last link on the line.
        let urls = image_urls("![a](https://a.com/1.png) ![b](https://b.com/2.png)");
        assert_eq!(urls, vec!["https://b.com/2.png"]);
    }

    #[test]
    fn test_image_link_compiles() {
        let captures = image_link().captures("![alt](https://i.imgur.com/x.png)").unwrap();
        assert_eq!(&captures[1], "alt");
        assert_eq!(&captures[2], "https://i.imgur.com/x.png");
    }

    #[test]
    fn test_partition_with_filter() {
        let filter = UrlFilter::new(["https://i.imgur.com/", "https://i.stack.imgur.com/"]);
        let urls = partition_image_urls(DOC, &filter).unwrap();
        assert_eq!(
            urls.accepted,
            vec!["https://i.imgur.com/AbC9.png", "https://i.stack.imgur.com/aBc8.png"]
        );
        assert_eq!(urls.excluded, vec!["http://localhost/100.png"]);
    }

    #[test]
    fn test_accepted_without_rules() {
        let filter = UrlFilter::default();
        assert_eq!(accepted_image_urls(DOC, &filter).unwrap(), image_urls(DOC));
    }

    #[test]
    fn test_invalid_rule_surfaces() {
        let filter = UrlFilter::new(["r=("]);
        assert!(accepted_image_urls(DOC, &filter).is_err());
    }
}
