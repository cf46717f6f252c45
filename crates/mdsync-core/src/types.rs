//! Core type definitions for mdsync
//!
//! A rule is a flat tagged value: a pattern, the effect of a match, and how
//! the pattern is compared against a URL.

use std::fmt;

// =============================================================================
// Polarity
// =============================================================================

/// Effect of a rule when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Plain declaration - permits the download
    Allow,
    /// Declaration starting with `!` - forbids the download
    Deny,
}

impl Polarity {
    pub fn is_allow(self) -> bool {
        self == Self::Allow
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

// =============================================================================
// Match Kind
// =============================================================================

/// How a rule pattern is compared against a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Literal prefix; URLs ending in `/` never match
    Prefix,
    /// Regular expression anchored at the start of the URL (`r=` marker)
    Regex,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Regex => "regex",
        }
    }
}

// =============================================================================
// Rule
// =============================================================================

/// Marker negating a declaration.
pub const DENY_MARKER: char = '!';

/// Marker introducing a regular expression pattern.
pub const REGEX_MARKER: &str = "r=";

/// A single parsed rule declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub pattern: String,
    pub polarity: Polarity,
    pub kind: MatchKind,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, polarity: Polarity, kind: MatchKind) -> Self {
        Self {
            pattern: pattern.into(),
            polarity,
            kind,
        }
    }

    pub fn allow_prefix(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Polarity::Allow, MatchKind::Prefix)
    }

    pub fn deny_prefix(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Polarity::Deny, MatchKind::Prefix)
    }

    pub fn allow_regex(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Polarity::Allow, MatchKind::Regex)
    }

    pub fn deny_regex(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Polarity::Deny, MatchKind::Regex)
    }
}

/// Renders the rule in declaration form, e.g. `!r=https://a\.com/.+`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.polarity == Polarity::Deny {
            write!(f, "{}", DENY_MARKER)?;
        }
        if self.kind == MatchKind::Regex {
            f.write_str(REGEX_MARKER)?;
        }
        f.write_str(&self.pattern)
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Result of evaluating one URL against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the URL may be downloaded
    pub allowed: bool,
    /// Index of the last rule that matched, if any
    pub rule_index: Option<usize>,
}

impl Decision {
    /// Verdict for a filter without rules.
    pub const OPEN: Self = Self {
        allowed: true,
        rule_index: None,
    };

    /// Verdict when rules exist but none matched.
    pub const CLOSED: Self = Self {
        allowed: false,
        rule_index: None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_declaration_form() {
        assert_eq!(Rule::allow_prefix("https://i.imgur.com/").to_string(), "https://i.imgur.com/");
        assert_eq!(Rule::deny_prefix("http://localhost/").to_string(), "!http://localhost/");
        assert_eq!(Rule::allow_regex("https://a\\.com/.+").to_string(), "r=https://a\\.com/.+");
        assert_eq!(Rule::deny_regex("https://a\\.com/.+").to_string(), "!r=https://a\\.com/.+");
    }

    #[test]
    fn test_rule_equality() {
        assert_eq!(Rule::allow_prefix("a"), Rule::new("a", Polarity::Allow, MatchKind::Prefix));
        assert_ne!(Rule::allow_prefix("a"), Rule::deny_prefix("a"));
        assert_ne!(Rule::allow_prefix("a"), Rule::allow_regex("a"));
        assert_ne!(Rule::allow_prefix("a"), Rule::allow_prefix("b"));
    }
}
