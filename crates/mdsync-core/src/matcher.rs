//! URL Admission Filter
//!
//! Every discovered image URL goes through [`UrlFilter::evaluate`] before it
//! is queued for download. Rules are scanned in declaration order and the
//! last matching rule decides.

use regex::Regex;

use crate::parser::parse_rules;
use crate::types::{Decision, MatchKind, Polarity, Rule};

/// Error type for URL evaluation.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid regex rule '{pattern}' while testing '{url}': {source}")]
    InvalidRegex {
        pattern: String,
        url: String,
        #[source]
        source: regex::Error,
    },
}

// =============================================================================
// Compiled Rules
// =============================================================================

#[derive(Debug, Clone)]
enum CompiledPattern {
    Prefix,
    Regex(Regex),
    /// Kept so the failure is reported against the URL being tested.
    Invalid(regex::Error),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: Rule,
    pattern: CompiledPattern,
}

impl CompiledRule {
    fn new(rule: Rule) -> Self {
        let pattern = match rule.kind {
            MatchKind::Prefix => CompiledPattern::Prefix,
            MatchKind::Regex => match compile_anchored(&rule.pattern) {
                Ok(regex) => CompiledPattern::Regex(regex),
                Err(err) => {
                    log::warn!("rule '{}' has an invalid regex: {}", rule, err);
                    CompiledPattern::Invalid(err)
                }
            },
        };
        Self { rule, pattern }
    }

    fn matches(&self, url: &str) -> Result<bool, FilterError> {
        match &self.pattern {
            CompiledPattern::Prefix => Ok(prefix_matches(url, &self.rule.pattern)),
            CompiledPattern::Regex(regex) => Ok(regex.is_match(url)),
            CompiledPattern::Invalid(err) => Err(FilterError::InvalidRegex {
                pattern: self.rule.pattern.clone(),
                url: url.to_string(),
                source: err.clone(),
            }),
        }
    }
}

/// Compile `pattern` so it only matches at the start of the input.
///
/// The bare pattern is compiled first so errors refer to the user's text and
/// an unbalanced group cannot escape the anchoring wrapper.
fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{})", pattern))
}

fn prefix_matches(url: &str, pattern: &str) -> bool {
    url.starts_with(pattern) && !url.ends_with('/')
}

/// Test a URL against a single pattern.
///
/// Prefix patterns never match a URL ending in `/`. Regex patterns are
/// anchored at the start of the URL but may stop before its end.
pub fn match_url(url: &str, pattern: &str, kind: MatchKind) -> Result<bool, FilterError> {
    CompiledRule::new(Rule::new(pattern, Polarity::Allow, kind)).matches(url)
}

// =============================================================================
// UrlFilter
// =============================================================================

/// Ordered allow/deny rule set.
///
/// Evaluation only needs `&self`, so a built filter can be shared across
/// download workers. Replacing the rules needs `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    rules: Vec<CompiledRule>,
}

impl UrlFilter {
    /// Create a filter from rule declarations.
    pub fn new<I, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rules(parse_rules(declarations))
    }

    /// Create a filter from already parsed rules.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        let mut filter = Self::default();
        filter.replace_rules(rules);
        filter
    }

    /// Replace every rule with the given declarations.
    pub fn set_rules<I, S>(&mut self, declarations: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.replace_rules(parse_rules(declarations));
    }

    /// Replace every rule with already parsed rules.
    pub fn replace_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules.into_iter().map(CompiledRule::new).collect();
        log::debug!("url filter loaded {} rules", self.rules.len());
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = &Rule> + '_ {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    pub fn rule(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index).map(|compiled| &compiled.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide a URL and report which rule decided it.
    ///
    /// With no rules every URL is allowed. Otherwise the verdict starts as
    /// deny and each matching rule overwrites it; rules that do not match
    /// leave it untouched.
    pub fn evaluate(&self, url: &str) -> Result<Decision, FilterError> {
        if self.rules.is_empty() {
            return Ok(Decision::OPEN);
        }

        let mut decision = Decision::CLOSED;
        for (index, compiled) in self.rules.iter().enumerate() {
            if compiled.matches(url)? {
                decision = Decision {
                    allowed: compiled.rule.polarity.is_allow(),
                    rule_index: Some(index),
                };
            }
        }

        log::trace!("{} -> {:?}", url, decision);
        Ok(decision)
    }

    pub fn is_allowed(&self, url: &str) -> Result<bool, FilterError> {
        self.evaluate(url).map(|decision| decision.allowed)
    }

    /// Keep the allowed URLs, preserving their order.
    pub fn filter<I, S>(&self, urls: I) -> Result<Vec<S>, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Vec::new();
        for url in urls {
            if self.is_allowed(url.as_ref())? {
                allowed.push(url);
            }
        }
        Ok(allowed)
    }
}
