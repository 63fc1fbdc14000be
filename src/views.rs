//! View registry and the shipped maud components.
//!
//! Every view is a plain function taking a [`ViewCtx`] (current path,
//! captured params, catalog snapshot) and a rendered child slot; layout
//! views place the slot inside their chrome, leaf views ignore it.
//! [`compose`] folds a matched chain leaf-to-root so the innermost view
//! ends up nested inside every ancestor layout.
//!
//! Views are looked up by the name a route declares, through
//! [`ViewRegistry`]. `ensure` cross-checks a route table against the
//! registry at startup, so a typo in a route definition fails before the
//! first render instead of on the first visit.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The
//! stylesheet is embedded at compile time from `static/style.css`.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::catalog::{PromptKind, PromptRecord};
use crate::router::MatchedChain;
use crate::routes::RouteTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route {route:?} references view {view:?}, which is not registered")]
    MissingView { view: String, route: String },
}

/// Read-only context handed to every view render.
#[derive(Debug, Clone, Copy)]
pub struct ViewCtx<'a> {
    /// Canonical current path.
    pub path: &'a str,
    /// Params captured by the matched chain.
    pub params: &'a BTreeMap<String, String>,
    /// Catalog snapshot, newest first.
    pub prompts: &'a [PromptRecord],
}

/// A view render function. `slot` carries the already-rendered child; leaf
/// views receive an empty slot.
pub type ViewFn = fn(&ViewCtx<'_>, Markup) -> Markup;

/// Name-to-view lookup table.
pub struct ViewRegistry {
    views: BTreeMap<String, ViewFn>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        ViewRegistry::new()
    }
}

impl ViewRegistry {
    pub fn new() -> ViewRegistry {
        ViewRegistry {
            views: BTreeMap::new(),
        }
    }

    /// Registry with the seven shipped views registered.
    pub fn with_defaults() -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        registry.register("Home", home);
        registry.register("Dashboard", dashboard);
        registry.register("History", history);
        registry.register("Login", login);
        registry.register("Settings", settings);
        registry.register("Prompts", prompts);
        registry.register("PromptsCreate", prompts_create);
        registry
    }

    /// Register or replace the view under `name`.
    pub fn register(&mut self, name: &str, view: ViewFn) {
        self.views.insert(name.to_string(), view);
    }

    pub fn get(&self, name: &str) -> Option<ViewFn> {
        self.views.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Registered view names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// Verify every view name the table references resolves here.
    pub fn ensure(&self, table: &RouteTable) -> Result<(), RegistryError> {
        for id in table.ids() {
            let node = table.node(id);
            if !self.views.contains_key(&node.view) {
                return Err(RegistryError::MissingView {
                    view: node.view.clone(),
                    route: node.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Render a matched chain by folding leaf-to-root: each view receives its
/// child's markup as the slot.
pub fn compose(
    registry: &ViewRegistry,
    table: &RouteTable,
    chain: &MatchedChain,
    ctx: &ViewCtx<'_>,
) -> Result<Markup, RegistryError> {
    let mut slot = html! {};
    for &id in chain.ids.iter().rev() {
        let node = table.node(id);
        let view = registry
            .get(&node.view)
            .ok_or_else(|| RegistryError::MissingView {
                view: node.view.clone(),
                route: node.name.clone(),
            })?;
        slot = view(ctx, slot);
    }
    Ok(slot)
}

const CSS: &str = include_str!("../static/style.css");

/// Renders a full HTML document around composed view content.
pub fn page_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

// ============================================================================
// Shipped Views
// ============================================================================

/// Marks the link that owns the current location: exact match for the
/// root link, prefix match for everything else.
fn nav_link(label: &str, href: &str, current_path: &str) -> Markup {
    let is_current = if href == "/" {
        current_path == "/"
    } else {
        current_path == href || current_path.starts_with(&format!("{href}/"))
    };
    html! {
        a class=[is_current.then_some("current")] href=(href) { (label) }
    }
}

/// Persistent application chrome: brand header plus primary navigation,
/// with the matched child in the main slot.
fn home(ctx: &ViewCtx<'_>, slot: Markup) -> Markup {
    html! {
        div.app-shell {
            header.app-header {
                span.brand { "Prompt Shell" }
                nav.app-nav {
                    (nav_link("Dashboard", "/", ctx.path))
                    (nav_link("History", "/history", ctx.path))
                    (nav_link("Prompts", "/prompts", ctx.path))
                    (nav_link("Settings", "/settings", ctx.path))
                }
            }
            main.app-main {
                (slot)
            }
        }
    }
}

/// Aggregate counters over the catalog snapshot.
fn dashboard(ctx: &ViewCtx<'_>, _slot: Markup) -> Markup {
    let total = ctx.prompts.len();
    let views: u64 = ctx.prompts.iter().map(|p| p.views).sum();
    let stars: u64 = ctx.prompts.iter().map(|p| p.stars).sum();
    let custom = ctx
        .prompts
        .iter()
        .filter(|p| p.kind == PromptKind::Custom)
        .count();

    html! {
        section.dashboard {
            h1 { "Dashboard" }
            div.stat-grid {
                div.stat-card {
                    span.stat-value { (total) }
                    span.stat-label { "Templates" }
                }
                div.stat-card {
                    span.stat-value { (views) }
                    span.stat-label { "Total views" }
                }
                div.stat-card {
                    span.stat-value { (stars) }
                    span.stat-label { "Total stars" }
                }
                div.stat-card {
                    span.stat-value { (custom) }
                    span.stat-label { "Custom templates" }
                }
            }
        }
    }
}

/// Records ranked by view count, most viewed first.
fn history(ctx: &ViewCtx<'_>, _slot: Markup) -> Markup {
    let mut ranked: Vec<&PromptRecord> = ctx.prompts.iter().collect();
    ranked.sort_by(|a, b| b.views.cmp(&a.views));

    html! {
        section.history {
            h1 { "Most Viewed" }
            ol.history-list {
                @for record in ranked {
                    li {
                        span.history-title { (record.title) }
                        span.history-views { (record.views) " views" }
                    }
                }
            }
        }
    }
}

/// Standalone sign-in page, rendered without the application chrome.
fn login(_ctx: &ViewCtx<'_>, _slot: Markup) -> Markup {
    html! {
        main.login-page {
            section.login-card {
                h1 { "Sign In" }
                form {
                    label {
                        "Username"
                        input type="text" name="username";
                    }
                    label {
                        "Password"
                        input type="password" name="password";
                    }
                    button type="submit" { "Sign in" }
                }
            }
        }
    }
}

fn settings(_ctx: &ViewCtx<'_>, _slot: Markup) -> Markup {
    html! {
        section.settings {
            h1 { "Settings" }
            form.settings-form {
                label {
                    "Display name"
                    input type="text" name="display_name" value="Guest";
                }
                label {
                    "Theme"
                    select name="theme" {
                        option value="light" selected { "Light" }
                        option value="dark" { "Dark" }
                    }
                }
                button type="submit" { "Save" }
            }
        }
    }
}

/// Catalog grid in snapshot order (newest first) with kind badges and
/// engagement counters.
fn prompts(ctx: &ViewCtx<'_>, _slot: Markup) -> Markup {
    html! {
        section.prompts {
            header.prompts-header {
                h1 { "Prompt Templates" }
                a.create-link href="/prompts/create" { "New template" }
            }
            div.prompt-grid {
                @for record in ctx.prompts {
                    article.prompt-card {
                        header.prompt-card-header {
                            h2 { (record.title) }
                            span class={ "kind-badge kind-" (record.kind.as_str()) } {
                                (record.kind.as_str())
                            }
                        }
                        p.prompt-content { (record.content) }
                        footer.prompt-card-footer {
                            span.prompt-tag { (record.tag) }
                            span.prompt-views { (record.views) " views" }
                            span.prompt-stars { "★ " (record.stars) }
                            time { (record.created_at.format("%Y-%m-%d").to_string()) }
                        }
                    }
                }
            }
        }
    }
}

fn prompts_create(_ctx: &ViewCtx<'_>, _slot: Markup) -> Markup {
    html! {
        section.prompt-create {
            h1 { "New Template" }
            form.create-form {
                label {
                    "Title"
                    input type="text" name="title";
                }
                label {
                    "Tag"
                    input type="text" name="tag";
                }
                label {
                    "Content"
                    textarea name="content" rows="8" {}
                }
                button type="submit" { "Create" }
            }
        }
    }
}
