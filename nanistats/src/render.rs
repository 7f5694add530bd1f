//! Text and JSON rendering for CLI output

use std::fmt::Write as _;
use std::path::Path;

use console::{measure_text_width, pad_str, Alignment, Style};
use nanistatslib::{format_thousands, Layout, NodeKind, StatsNode, StatsTable, TableRow};
use serde::Serialize;

const NAME_WIDTH: usize = 40;
const CELL_WIDTH: usize = 14;

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Display settings collected from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub layout: Layout,
    pub format: OutputFormat,
    /// List unique speakers after the table
    pub speakers: bool,
    /// List unique words after the table
    pub unique_words: bool,
}

/// JSON document for `--output json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    path: &'a Path,
    table: StatsTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    speakers: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unique_words: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a StatsNode>,
}

/// Render an analysis result.
pub fn render(tree: &StatsNode, view: &View) -> anyhow::Result<String> {
    let table = StatsTable::from_node(tree, view.layout);

    match view.format {
        OutputFormat::Json => {
            let report = JsonReport {
                path: &tree.path,
                table,
                speakers: view
                    .speakers
                    .then(|| tree.stats.speakers.iter().map(String::as_str).collect()),
                unique_words: view
                    .unique_words
                    .then(|| tree.stats.unique_words().into_iter().collect()),
                tree: (view.layout == Layout::Tree).then_some(tree),
            };
            let mut out = serde_json::to_string_pretty(&report)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Table => Ok(render_table(tree, &table, view)),
    }
}

fn render_table(tree: &StatsNode, table: &StatsTable, view: &View) -> String {
    let header_style = Style::new().bold();
    let dir_style = Style::new().bold().blue();
    let total_style = Style::new().bold();

    let mut out = String::new();
    let separator = "-".repeat(NAME_WIDTH + (CELL_WIDTH + 1) * (table.headers.len() - 1));

    let header = format_row(
        &table.headers[0],
        0,
        table.headers[1..].iter().map(String::as_str),
    );
    let _ = writeln!(out, "{}", header_style.apply_to(header));
    let _ = writeln!(out, "{separator}");

    for row in &table.rows {
        let line = format_data_row(row, view.layout);
        if row.kind == NodeKind::Directory {
            let _ = writeln!(out, "{}", dir_style.apply_to(line));
        } else {
            let _ = writeln!(out, "{line}");
        }
    }

    if !table.rows.is_empty() {
        let _ = writeln!(out, "{separator}");
    }
    let footer = format_row(
        &table.footer.label,
        0,
        table.footer.values.iter().map(String::as_str),
    );
    let _ = writeln!(out, "{}", total_style.apply_to(footer));

    if view.speakers {
        let speakers: Vec<&str> = tree.stats.speakers.iter().map(String::as_str).collect();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} ({}): {}",
            header_style.apply_to("Speakers"),
            format_thousands(speakers.len() as u64),
            speakers.join(", ")
        );
    }

    if view.unique_words {
        let words: Vec<&str> = tree.stats.unique_words().into_iter().collect();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} ({}): {}",
            header_style.apply_to("Unique words"),
            format_thousands(words.len() as u64),
            words.join(" ")
        );
    }

    out
}

fn format_data_row(row: &TableRow, layout: Layout) -> String {
    let label = match (layout, row.kind) {
        (Layout::Tree, NodeKind::Directory) => format!("{}/", row.label),
        _ => row.label.clone(),
    };
    format_row(&label, row.depth, row.values.iter().map(String::as_str))
}

/// Lay out one line: an indented, padded label followed by right-aligned cells.
fn format_row<'a>(label: &str, depth: usize, cells: impl Iterator<Item = &'a str>) -> String {
    let indented = format!("{}{}", "  ".repeat(depth), label);
    let name = if measure_text_width(&indented) > NAME_WIDTH - 1 {
        truncate_name(&indented, NAME_WIDTH - 1)
    } else {
        indented
    };

    let mut line = pad_str(&name, NAME_WIDTH, Alignment::Left, None).into_owned();
    for cell in cells {
        line.push(' ');
        line.push_str(&pad_str(cell, CELL_WIDTH, Alignment::Right, None));
    }
    line.trim_end().to_string()
}

/// Keep the end of a long name, prefixed with "..", within `max_width` columns.
fn truncate_name(name: &str, max_width: usize) -> String {
    let mut tail: Vec<char> = Vec::new();
    let mut width = 2;
    for ch in name.chars().rev() {
        let w = measure_text_width(ch.encode_utf8(&mut [0; 4]));
        if width + w > max_width {
            break;
        }
        width += w;
        tail.push(ch);
    }
    let tail: String = tail.into_iter().rev().collect();
    format!("..{tail}")
}
