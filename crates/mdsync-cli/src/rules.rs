use std::path::Path;

use mdsync_core::{load_rule_file, parse_rules, UrlFilter};

/// Where the rules of one invocation come from.
#[derive(Debug, Clone, Default)]
pub struct RuleSources {
    /// Rule-list files, read in order
    pub files: Vec<String>,
    /// Declarations given on the command line, appended after the files
    pub inline: Vec<String>,
}

pub fn build_filter(sources: &RuleSources) -> Result<UrlFilter, String> {
    let mut rules = Vec::new();

    for path in &sources.files {
        let loaded = load_rule_file(Path::new(path)).map_err(|e| e.to_string())?;
        log::info!("loaded {} rules from '{}'", loaded.len(), path);
        rules.extend(loaded);
    }

    rules.extend(parse_rules(&sources.inline));

    if rules.is_empty() {
        log::info!("no rules given, every image URL is allowed");
    }

    Ok(UrlFilter::from_rules(rules))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mdsync_core::Rule;

    use super::*;

    #[test]
    fn test_files_come_before_inline_rules() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# hosts").unwrap();
        writeln!(file, "https://i.imgur.com/").unwrap();

        let sources = RuleSources {
            files: vec![file.path().display().to_string()],
            inline: vec!["!https://i.imgur.com/private/".to_string()],
        };
        let filter = build_filter(&sources).unwrap();

        assert_eq!(
            filter.rules().cloned().collect::<Vec<_>>(),
            vec![
                Rule::allow_prefix("https://i.imgur.com/"),
                Rule::deny_prefix("https://i.imgur.com/private/"),
            ]
        );
    }

    #[test]
    fn test_no_sources_allows_everything() {
        let filter = build_filter(&RuleSources::default()).unwrap();
        assert!(filter.is_empty());
        assert!(filter.is_allowed("http://localhost/100.png").unwrap());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let sources = RuleSources {
            files: vec!["/nonexistent/mdsync.rules".to_string()],
            inline: Vec::new(),
        };
        let err = build_filter(&sources).unwrap_err();
        assert!(err.contains("/nonexistent/mdsync.rules"));
    }
}
