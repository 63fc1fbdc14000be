//! CLI output formatting for every subcommand.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not struct-centric**. The primary display
//! for every entity (route, template, exported page) is its semantic identity,
//! a positional index plus name, with patterns, view names, and counts shown
//! as secondary context on indented lines. The same entity renders the same
//! way whichever subcommand surfaced it.
//!
//! # Output Format
//!
//! ## Routes
//!
//! ```text
//! Routes
//! 001 home / → Home [layout]
//!     001 dashboard (index) → Dashboard
//!     002 history history → History
//! 002 login /login → Login
//!
//! 6 concrete paths, 0 parameterized
//!
//! Warnings
//!     no fallback route declared: unresolved paths surface NotFound to the shell
//! ```
//!
//! ## Resolve
//!
//! ```text
//! /prompts/create
//!     Chain: home > prompts-create
//!     Views: Home > PromptsCreate
//! ```
//!
//! ## Demo
//!
//! ```text
//! Moved to /history
//!     Views: Home > History
//!     Exited: Dashboard
//!     Entered: History
//! ```
//!
//! ## Export
//!
//! ```text
//! / → index.html
//!     Views: Home > Dashboard
//!
//! Exported 6 pages, 0 patterns skipped
//! ```
//!
//! # Architecture
//!
//! Each subcommand pairs a pure `format_*` function (returning `Vec<String>`)
//! with a `print_*` wrapper that writes to stdout. Tests assert on the
//! returned lines; only the wrappers touch I/O.

use serde::Serialize;

use crate::catalog::{Catalog, created_at_format};
use crate::export::ExportReport;
use crate::router::{MatchedChain, NavigateError};
use crate::routes::{RouteId, RouteNode, RouteTable};
use crate::shell::{CatalogNotice, Outcome};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 English Exam Design [preset]
/// 001 home
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} [{}]", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
/// Counts characters, not bytes; record content is arbitrary UTF-8.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn view_names(table: &RouteTable, ids: &[RouteId]) -> Vec<String> {
    ids.iter().map(|&id| table.node(id).view.clone()).collect()
}

// ============================================================================
// Routes output
// ============================================================================

/// Format the route table as an indented forest, one line per route, with
/// export counts and configuration warnings appended.
pub fn format_route_tree(table: &RouteTable) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Routes".to_string());
    for (i, &root) in table.roots().iter().enumerate() {
        push_route_lines(table, root, i + 1, 0, &mut lines);
    }

    lines.push(String::new());
    lines.push(format!(
        "{} concrete paths, {} parameterized",
        table.concrete_paths().len(),
        table.parameterized_patterns().len()
    ));

    let warnings = table.warnings();
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in warnings {
            lines.push(format!("    {warning}"));
        }
    }

    lines
}

fn push_route_lines(
    table: &RouteTable,
    id: RouteId,
    index: usize,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let node = table.node(id);
    let pattern = if node.pattern.is_empty() {
        "(index)"
    } else {
        node.pattern.as_str()
    };
    let mut line = format!(
        "{}{} {} \u{2192} {}",
        indent(depth),
        entity_header(index, &node.name, None),
        pattern,
        node.view
    );
    if node.is_layout() {
        line.push_str(" [layout]");
    }
    lines.push(line);
    for (i, &child) in node.children.iter().enumerate() {
        push_route_lines(table, child, i + 1, depth + 1, lines);
    }
}

/// Print the route tree to stdout.
pub fn print_route_tree(table: &RouteTable) {
    for line in format_route_tree(table) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve output
// ============================================================================

/// Format one resolution attempt: the path as typed, then the matched chain
/// or a miss marker.
pub fn format_resolution(
    table: &RouteTable,
    raw: &str,
    result: Option<&MatchedChain>,
) -> Vec<String> {
    let mut lines = vec![raw.to_string()];
    match result {
        Some(chain) => {
            if chain.path != raw {
                lines.push(format!("    Canonical: {}", chain.path));
            }
            let nodes: Vec<&RouteNode> = chain.ids.iter().map(|&id| table.node(id)).collect();
            lines.push(format!(
                "    Chain: {}",
                nodes
                    .iter()
                    .map(|n| n.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" > ")
            ));
            lines.push(format!(
                "    Views: {}",
                nodes
                    .iter()
                    .map(|n| n.view.as_str())
                    .collect::<Vec<_>>()
                    .join(" > ")
            ));
            if !chain.params.is_empty() {
                lines.push("    Params:".to_string());
                for (key, value) in &chain.params {
                    lines.push(format!("        {key} = {value}"));
                }
            }
        }
        None => lines.push("    No route matched".to_string()),
    }
    lines
}

/// Print a resolution attempt to stdout.
pub fn print_resolution(table: &RouteTable, raw: &str, result: Option<&MatchedChain>) {
    for line in format_resolution(table, raw, result) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct ResolutionJson<'a> {
    path: &'a str,
    chain: Vec<&'a str>,
    views: Vec<&'a str>,
    params: &'a std::collections::BTreeMap<String, String>,
}

/// Serialize a successful resolution for machine consumers.
pub fn resolution_json(
    table: &RouteTable,
    chain: &MatchedChain,
) -> Result<String, serde_json::Error> {
    let nodes: Vec<&RouteNode> = chain.ids.iter().map(|&id| table.node(id)).collect();
    serde_json::to_string_pretty(&ResolutionJson {
        path: &chain.path,
        chain: nodes.iter().map(|n| n.name.as_str()).collect(),
        views: nodes.iter().map(|n| n.view.as_str()).collect(),
        params: &chain.params,
    })
}

// ============================================================================
// Catalog output
// ============================================================================

/// Format the catalog as a numbered inventory, display order.
pub fn format_catalog(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![format!("Prompt Templates ({})", catalog.len())];
    for (i, record) in catalog.snapshot().iter().enumerate() {
        lines.push(entity_header(i + 1, &record.title, Some(record.kind.as_str())));
        lines.push(format!(
            "    Tag: {} ({} views, {} stars)",
            record.tag, record.views, record.stars
        ));
        lines.push(format!(
            "    Created: {}",
            record.created_at.format(created_at_format::FORMAT)
        ));
        let preview = truncate_desc(record.content.trim(), 60);
        if !preview.is_empty() {
            lines.push(format!("    {preview}"));
        }
    }
    lines
}

/// Print the catalog inventory to stdout.
pub fn print_catalog(catalog: &Catalog) {
    for line in format_catalog(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Session outcome output
// ============================================================================

/// Format one session outcome as display lines.
///
/// Moves lead with the new path; what left and joined the screen shows as
/// indented context. Blocked name lookups carry a warning line since route
/// names are fixed at startup and a miss there is a caller bug.
pub fn format_outcome(table: &RouteTable, outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Moved {
            path,
            url,
            views,
            delta,
        } => {
            let mut lines = vec![format!("Moved to {path}")];
            if url != path {
                lines.push(format!("    URL: {url}"));
            }
            lines.push(format!("    Views: {}", views.join(" > ")));
            let exited = view_names(table, &delta.exited);
            if !exited.is_empty() {
                lines.push(format!("    Exited: {}", exited.join(", ")));
            }
            let entered = view_names(table, &delta.entered);
            if !entered.is_empty() {
                lines.push(format!("    Entered: {}", entered.join(", ")));
            }
            lines
        }
        Outcome::Blocked { error, fallback } => {
            let mut lines = vec![format!("Navigation blocked: {error}")];
            if matches!(error, NavigateError::UnknownRouteName(_)) {
                lines.push(
                    "    warning: route names are fixed at startup, a miss here is a caller bug"
                        .to_string(),
                );
            }
            if let Some(path) = fallback {
                lines.push(format!("    Fallback: {path}"));
            }
            lines
        }
        Outcome::Edge { direction } => {
            vec![format!("History edge: nothing further {}", direction.as_str())]
        }
        Outcome::Added { id, len } => {
            vec![format!("Added {id:?} ({len} templates)")]
        }
        Outcome::Rejected { error } => {
            vec![format!("Add rejected: {error}")]
        }
    }
}

/// Print a session outcome to stdout.
pub fn print_outcome(table: &RouteTable, outcome: &Outcome) {
    for line in format_outcome(table, outcome) {
        println!("{}", line);
    }
}

/// One-line rendering of a catalog change notice.
pub fn format_notice(notice: &CatalogNotice) -> String {
    match &notice.newest {
        Some(title) => format!("Catalog: {} templates (newest: {})", notice.len, title),
        None => format!("Catalog: {} templates", notice.len),
    }
}

// ============================================================================
// Export output
// ============================================================================

/// Format an export report: each page with its output file and view chain,
/// skipped patterns, then a summary line.
pub fn format_export_report(report: &ExportReport) -> Vec<String> {
    let mut lines = Vec::new();
    for page in &report.pages {
        lines.push(format!("{} \u{2192} {}", page.path, page.file));
        lines.push(format!("    Views: {}", page.views.join(" > ")));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped (parameterized)".to_string());
        for pattern in &report.skipped {
            lines.push(format!("    {pattern}"));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Exported {} pages, {} patterns skipped",
        report.pages.len(),
        report.skipped.len()
    ));
    lines
}

/// Print an export report to stdout.
pub fn print_export_report(report: &ExportReport) {
    for line in format_export_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
