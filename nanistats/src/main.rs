//! # nanistats
//!
//! A CLI tool for dialogue statistics over Naninovel script trees.
//!
//! ## Overview
//!
//! nanistats is built on top of nanistatslib. It walks a directory of `.nani`
//! scripts and reports dialogue characters, words, unique speakers and the
//! number of lines skipped as script syntax, in total, per file, or as a tree.
//!
//! ## Usage
//!
//! ```bash
//! # Totals for the current directory
//! nanistats .
//!
//! # Per-file breakdown, skipping backup folders
//! nanistats Assets/Scripts --by-file --exclude Backup
//!
//! # Directory tree with the speaker list, as JSON
//! nanistats Assets/Scripts --tree --speakers --output json
//!
//! # Re-run whenever a script changes
//! nanistats watch Assets/Scripts --tree
//! ```
//!
//! Options can also come from a `nanistats.toml` in the analyzed directory.

mod config;
mod render;
mod watch;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use nanistatslib::{analyze_workspace, analyze_workspace_cached, AnalyzeOptions, Layout, StatsCache};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::render::{OutputFormat, View};

/// Arguments that select which files are analyzed
fn analysis_args() -> Vec<Arg> {
    vec![
        Arg::new("path")
            .help("Directory or script file to analyze (defaults to current directory)")
            .default_value("."),
        Arg::new("exclude")
            .short('e')
            .long("exclude")
            .action(ArgAction::Append)
            .help("Skip directories with this exact name (can be specified multiple times)"),
        Arg::new("ext")
            .long("ext")
            .help("Script file extension [default: nani]"),
        Arg::new("max-depth")
            .long("max-depth")
            .value_parser(value_parser!(usize))
            .help("Maximum directory depth to descend"),
        Arg::new("no-parallel")
            .long("no-parallel")
            .action(ArgAction::SetTrue)
            .help("Analyze files one at a time"),
        Arg::new("config")
            .long("config")
            .help("Path to a nanistats.toml configuration file"),
    ]
}

/// Arguments that control how results are shown
fn view_args() -> Vec<Arg> {
    vec![
        Arg::new("by-file")
            .short('f')
            .long("by-file")
            .action(ArgAction::SetTrue)
            .conflicts_with("tree")
            .help("Show breakdown by file"),
        Arg::new("tree")
            .short('t')
            .long("tree")
            .action(ArgAction::SetTrue)
            .help("Show the directory tree"),
        Arg::new("speakers")
            .short('s')
            .long("speakers")
            .action(ArgAction::SetTrue)
            .help("List unique speakers"),
        Arg::new("unique-words")
            .long("unique-words")
            .action(ArgAction::SetTrue)
            .help("List unique words"),
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(["table", "json"])
            .default_value("table")
            .help("Output format"),
    ]
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("nanistats")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dialogue statistics for Naninovel scripts")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log more (-v info, -vv debug); RUST_LOG overrides"),
        )
        .args(analysis_args())
        .args(view_args())
        .subcommand(
            Command::new("count")
                .about("Count dialogue statistics (default command)")
                .args(analysis_args())
                .args(view_args()),
        )
        .subcommand(
            Command::new("watch")
                .about("Re-run the analysis whenever files change")
                .args(analysis_args())
                .args(view_args())
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_parser(value_parser!(u64))
                        .default_value("300")
                        .help("Debounce interval in milliseconds"),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Extract the analysis root from matches
fn extract_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Build analysis options from the config file and command-line overrides
fn build_options(matches: &ArgMatches, root: &Path) -> anyhow::Result<AnalyzeOptions> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::discover(root)?,
    };

    let mut options = config.into_options();

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        options = options.exclude_many(excludes.cloned());
    }
    if let Some(ext) = matches.get_one::<String>("ext") {
        options = options.extension(ext);
    }
    if let Some(depth) = matches.get_one::<usize>("max-depth") {
        options = options.max_depth(*depth);
    }
    if matches.get_flag("no-parallel") {
        options = options.parallel(false);
    }

    Ok(options)
}

/// Extract display settings from matches
fn extract_view(matches: &ArgMatches) -> View {
    let layout = if matches.get_flag("tree") {
        Layout::Tree
    } else if matches.get_flag("by-file") {
        Layout::ByFile
    } else {
        Layout::Total
    };

    let format = match matches.get_one::<String>("output").map(|s| s.as_str()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    View {
        layout,
        format,
        speakers: matches.get_flag("speakers"),
        unique_words: matches.get_flag("unique-words"),
    }
}

/// Handler for count command
fn count_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let root = extract_path(matches);
    let options = build_options(matches, &root)?;
    let view = extract_view(matches);

    let tree = analyze_workspace(&root, &options)?;
    print!("{}", render::render(&tree, &view)?);
    Ok(())
}

/// Handler for watch command
fn watch_handler(matches: &ArgMatches) -> anyhow::Result<()> {
    let root = extract_path(matches);
    let options = build_options(matches, &root)?;
    let view = extract_view(matches);
    let interval = Duration::from_millis(matches.get_one::<u64>("interval").copied().unwrap_or(300));

    // Fail fast on a missing root; later passes report and keep watching.
    analyze_workspace(&root, &options)?;

    let cache = StatsCache::new();
    watch::watch_loop(&root, interval, || {
        match analyze_workspace_cached(&root, &options, &cache) {
            Ok(tree) => {
                let seen: HashSet<PathBuf> =
                    tree.files().into_iter().map(|f| f.path).collect();
                let pruned = cache.retain_paths(&seen);
                tracing::debug!(pruned, cached = cache.len(), "analysis pass finished");
                match render::render(&tree, &view) {
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    })
    .context("watch failed")
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("count", sub)) => count_handler(sub),
        Some(("watch", sub)) => watch_handler(sub),
        _ => count_handler(matches),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
