//! Static HTML export.
//!
//! Renders every concrete route (no params, no catch-alls) to a directory
//! of plain HTML files, one per navigable path, plus a `manifest.json`
//! describing what was written and which parameterized patterns had to be
//! skipped. The result is the whole shell browsable from disk.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html             # /
//! ├── manifest.json
//! ├── history/index.html     # /history
//! ├── settings/index.html
//! ├── prompts/
//! │   ├── index.html         # /prompts
//! │   └── create/index.html  # /prompts/create
//! └── login/index.html
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::router::MatchedChain;
use crate::routes::RouteTable;
use crate::views::{RegistryError, ViewCtx, ViewRegistry, compose, page_document};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("view error: {0}")]
    Registry(#[from] RegistryError),
}

/// One page written by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedPage {
    pub path: String,
    /// File location relative to the output directory.
    pub file: String,
    /// View names of the rendered chain, root first.
    pub views: Vec<String>,
}

/// What an export produced. Serialized as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub pages: Vec<ExportedPage>,
    /// Full patterns of parameterized leaves, which cannot be rendered
    /// statically.
    pub skipped: Vec<String>,
}

/// Output file for a canonical path: the root lands at `index.html`,
/// everything else at `<path>/index.html`.
fn file_for(path: &str) -> String {
    let rel = path.trim_start_matches('/');
    if rel.is_empty() {
        "index.html".to_string()
    } else {
        format!("{rel}/index.html")
    }
}

/// Render every concrete route into `out_dir` and write `manifest.json`.
pub fn export(
    table: &RouteTable,
    registry: &ViewRegistry,
    catalog: &Catalog,
    out_dir: &Path,
) -> Result<ExportReport, ExportError> {
    fs::create_dir_all(out_dir)?;

    let mut pages = Vec::new();
    for (path, leaf) in table.concrete_paths() {
        // Concrete paths carry no params, so the chain renders as-is.
        let chain = MatchedChain {
            ids: table.chain_to(leaf),
            params: BTreeMap::new(),
            path: path.clone(),
        };
        let ctx = ViewCtx {
            path: &chain.path,
            params: &chain.params,
            prompts: catalog.snapshot(),
        };
        let title = format!("{} - Prompt Shell", table.node(leaf).view);
        let html = page_document(&title, compose(registry, table, &chain, &ctx)?);

        let file = file_for(&path);
        let target = out_dir.join(&file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, html.into_string())?;

        pages.push(ExportedPage {
            path,
            file,
            views: chain
                .ids
                .iter()
                .map(|&id| table.node(id).view.clone())
                .collect(),
        });
    }

    let skipped: Vec<String> = table
        .parameterized_patterns()
        .into_iter()
        .map(|(pattern, _)| pattern)
        .collect();

    let report = ExportReport { pages, skipped };
    let manifest = serde_json::to_string_pretty(&report)?;
    fs::write(out_dir.join("manifest.json"), manifest)?;
    Ok(report)
}
