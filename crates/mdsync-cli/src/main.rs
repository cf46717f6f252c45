//! mdsync CLI
//!
//! CLI tool for checking which Markdown images the mirror may download.

mod rules;
mod scan;

use std::fs;
use std::io::{self, BufRead, BufReader};

use clap::{Parser, Subcommand};

use mdsync_core::UrlFilter;

use crate::rules::{build_filter, RuleSources};
use crate::scan::{run_scan, ScanOptions};

#[derive(Parser)]
#[command(name = "mdsync")]
#[command(about = "Image URL admission rules for the Markdown mirror")]
struct Cli {
    /// Rule-list file (one declaration per line, `#` comments)
    #[arg(long = "rules", global = true)]
    rule_files: Vec<String>,

    /// Inline rule declaration, applied after rule-list files
    #[arg(short, long = "rule", global = true)]
    rule: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide individual URLs and show the deciding rule
    Check {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the allowed URLs from a list, one URL per line
    Filter {
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Discover images in a Markdown directory and apply the rules
    Scan {
        /// Markdown directory
        #[arg(short = 'd', long)]
        md_dir: String,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Print the effective rule set
    Rules,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let sources = RuleSources {
        files: cli.rule_files,
        inline: cli.rule,
    };

    let result = build_filter(&sources).and_then(|filter| match cli.command {
        Commands::Check { urls } => cmd_check(&filter, &urls),
        Commands::Filter { input } => cmd_filter(&filter, input.as_deref()),
        Commands::Scan { md_dir, json } => run_scan(ScanOptions { md_dir, json }, &filter),
        Commands::Rules => cmd_rules(&filter),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn cmd_check(filter: &UrlFilter, urls: &[String]) -> Result<(), String> {
    for url in urls {
        let decision = filter.evaluate(url).map_err(|e| e.to_string())?;
        let verdict = if decision.allowed { "allow" } else { "deny" };

        let reason = match decision.rule_index.and_then(|index| filter.rule(index).map(|rule| (index, rule))) {
            Some((index, rule)) => format!("rule [{}] {}", index, rule),
            None if filter.is_empty() => "no rules".to_string(),
            None => "no matching rule".to_string(),
        };

        println!("{:<5}  {}  ({})", verdict, url, reason);
    }

    Ok(())
}

fn cmd_filter(filter: &UrlFilter, input: Option<&str>) -> Result<(), String> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = fs::File::open(path)
                .map_err(|e| format!("Failed to open '{}': {}", path, e))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        let url = line.trim();
        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }

    let total = urls.len();
    let allowed = filter.filter(urls).map_err(|e| e.to_string())?;
    log::info!("{} of {} URLs allowed", allowed.len(), total);

    for url in allowed {
        println!("{}", url);
    }

    Ok(())
}

fn cmd_rules(filter: &UrlFilter) -> Result<(), String> {
    if filter.is_empty() {
        println!("No rules: every URL is allowed");
        return Ok(());
    }

    println!("Rules ({}), later rules take precedence:", filter.len());
    for (index, rule) in filter.rules().enumerate() {
        println!(
            "  [{}] {:<5} {:<6} {}",
            index,
            rule.polarity.as_str(),
            rule.kind.as_str(),
            rule
        );
    }

    Ok(())
}
