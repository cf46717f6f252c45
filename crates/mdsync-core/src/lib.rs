//! mdsync Core Library
//!
//! This crate decides which remote images referenced by a Markdown mirror may
//! be downloaded. It is constructed from an ordered list of textual rule
//! declarations and answers allow/deny for each candidate URL.
//!
//! # Rule grammar
//!
//! - `https://i.imgur.com/` allows URLs with that prefix
//! - `!http://localhost/` denies URLs with that prefix
//! - `r=https://(a|b)\.imgur\.com/.+` allows URLs matching the regex from the start
//! - `!r=...` denies URLs matching the regex
//!
//! The last matching rule decides. A filter without rules allows everything;
//! a filter with rules denies URLs that none of them match.
//!
//! # Modules
//!
//! - `types`: Rule, polarity and match kind definitions
//! - `parser`: Rule declaration parsing and rule-list loading
//! - `matcher`: The URL filter and its precedence resolution
//! - `markdown`: Image URL discovery in Markdown text

pub mod markdown;
pub mod matcher;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use markdown::{accepted_image_urls, image_urls, partition_image_urls, ImageUrls};
pub use matcher::{match_url, FilterError, UrlFilter};
pub use parser::{load_rule_file, parse_rule, parse_rule_list, parse_rules, LoadError};
pub use types::{Decision, MatchKind, Polarity, Rule};
