//! Table-ready data structures for statistics output.
//!
//! This module provides `StatsTable`, a presentation-ready structure that can
//! be rendered as text or serialized to JSON without further computation.
//!
//! Ordering (directories before files, then by name) and number formatting
//! happen here, on copies of the analysis result; the aggregated values
//! themselves never depend on display order.

use serde::{Deserialize, Serialize};

use crate::options::Layout;
use crate::stats::{NodeKind, ScriptStats, StatsNode};

/// Column headers after the label column.
pub const COLUMNS: &[&str] = &["Chars", "Words", "Speakers", "Unique words", "Skipped"];

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// File or directory name, or "Total (N files)"
    pub label: String,
    /// Nesting level in tree layout (0 for other layouts)
    pub depth: usize,
    /// Directory or file
    pub kind: NodeKind,
    /// Values for each column, formatted for display
    pub values: Vec<String>,
}

/// Table-ready statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTable {
    /// Column headers: [label_header, columns...]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary row
    pub footer: TableRow,
}

impl StatsTable {
    /// Build a table from an analyzed tree.
    pub fn from_node(root: &StatsNode, layout: Layout) -> Self {
        let label_header = match layout {
            Layout::Total => "Name",
            Layout::ByFile => "File",
            Layout::Tree => "Path",
        };

        let mut headers = vec![label_header.to_string()];
        headers.extend(COLUMNS.iter().map(|c| c.to_string()));

        let rows = match layout {
            Layout::Total => Vec::new(),
            Layout::ByFile => file_rows(root),
            Layout::Tree => tree_rows(root),
        };

        let footer = TableRow {
            label: format!("Total ({} files)", format_thousands(root.stats.file_count)),
            depth: 0,
            kind: root.kind,
            values: stat_values(&root.stats),
        };

        StatsTable {
            headers,
            rows,
            footer,
        }
    }
}

fn stat_values(stats: &ScriptStats) -> Vec<String> {
    vec![
        format_thousands(stats.body_char_count),
        format_thousands(stats.word_count),
        format_thousands(stats.speaker_count()),
        format_thousands(stats.unique_words().len() as u64),
        format_thousands(stats.skipped_lines),
    ]
}

fn row(label: String, depth: usize, node: &StatsNode) -> TableRow {
    let label = if node.unreadable {
        format!("{label} (unreadable)")
    } else {
        label
    };
    TableRow {
        label,
        depth,
        kind: node.kind,
        values: stat_values(&node.stats),
    }
}

fn file_rows(root: &StatsNode) -> Vec<TableRow> {
    let mut files: Vec<(String, &StatsNode)> = Vec::new();
    let mut stack: Vec<(String, &StatsNode)> = vec![(String::new(), root)];

    while let Some((prefix, node)) = stack.pop() {
        for child in &node.children {
            let label = if prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{prefix}/{}", child.name)
            };
            match child.kind {
                NodeKind::File => files.push((label, child)),
                NodeKind::Directory => stack.push((label, child)),
            }
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
        .into_iter()
        .map(|(label, node)| row(label, 0, node))
        .collect()
}

fn tree_rows(root: &StatsNode) -> Vec<TableRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(usize, &StatsNode)> = sorted_children(root)
        .into_iter()
        .rev()
        .map(|c| (0, c))
        .collect();

    while let Some((depth, node)) = stack.pop() {
        rows.push(row(node.name.clone(), depth, node));
        stack.extend(
            sorted_children(node)
                .into_iter()
                .rev()
                .map(|c| (depth + 1, c)),
        );
    }

    rows
}

/// Children ordered for display: directories first, then by name.
pub fn sorted_children(node: &StatsNode) -> Vec<&StatsNode> {
    let mut children: Vec<&StatsNode> = node.children.iter().collect();
    children.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name.cmp(&b.name))
    });
    children
}

/// Format a count with `,` thousands separators.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
