use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{MatchKind, Polarity, Rule, DENY_MARKER, REGEX_MARKER};

/// Error type for rule-list loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read rule list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a single rule declaration.
///
/// Degenerate declarations such as `!` or `r=` are not rejected; they produce
/// a rule with an empty pattern.
pub fn parse_rule(declaration: &str) -> Rule {
    let declaration = declaration.trim();

    let (polarity, working) = match declaration.strip_prefix(DENY_MARKER) {
        Some(rest) => (Polarity::Deny, rest),
        None => (Polarity::Allow, declaration),
    };

    let (kind, pattern) = match working.strip_prefix(REGEX_MARKER) {
        Some(rest) => (MatchKind::Regex, rest),
        None => (MatchKind::Prefix, working),
    };

    Rule::new(pattern, polarity, kind)
}

/// Parse declarations in order. Nothing is dropped, merged or reordered.
pub fn parse_rules<I, S>(declarations: I) -> Vec<Rule>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    declarations
        .into_iter()
        .map(|declaration| parse_rule(declaration.as_ref()))
        .collect()
}

/// Parse a rule-list document, one declaration per line.
pub fn parse_rule_list(text: &str) -> Vec<Rule> {
    let mut rules = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || is_comment_line(line) {
            continue;
        }
        rules.push(parse_rule(line));
    }

    log::debug!("parsed {} rules from rule list", rules.len());
    rules
}

/// Read and parse a rule-list file.
pub fn load_rule_file(path: &Path) -> Result<Vec<Rule>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_rule_list(&content))
}

// `!` is the deny marker, so only `#` starts a comment.
fn is_comment_line(line: &str) -> bool {
    line.starts_with('#')
}
