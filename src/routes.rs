//! Route table model: declarative definitions interned into an immutable forest.
//!
//! A [`RouteDef`] describes one navigable entry the way application code wants
//! to write it: a path pattern, a unique name, the view it renders, and
//! optional children. [`RouteTable::build`] validates the whole declaration
//! set once at startup and interns it into an arena of [`RouteNode`]s indexed
//! by [`RouteId`]. After that the table never changes — resolution, reverse
//! lookup, and mount bookkeeping all work over stable ids.
//!
//! ## Path Patterns
//!
//! Patterns are written relative to their parent and split into segments:
//!
//! - `history` — literal segment, must match exactly
//! - `prompts/create` — multi-segment literal
//! - `:id` — parameter, captures exactly one segment
//! - `*rest` — catch-all, captures the remaining segments (zero or more);
//!   must be the final segment of its pattern
//! - `""` — index route: matches when no segments remain under its parent
//!
//! Top-level patterns are written absolute (`/`, `/login`); child patterns
//! are relative. A route with children is a *layout route*: its view wraps
//! whichever child matched, and the layout stays mounted while navigation
//! moves between its children.
//!
//! ## Validation
//!
//! `build` rejects, at startup rather than first use:
//! - duplicate or empty route names
//! - top-level patterns without a leading `/`
//! - child patterns with a leading `/`
//! - `:` or `*` segments with an empty name
//! - catch-alls anywhere but the final segment

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route name {0:?}")]
    DuplicateName(String),
    #[error("route with empty name (pattern {0:?})")]
    EmptyName(String),
    #[error("top-level route pattern must start with '/': {0:?}")]
    RelativeRootPattern(String),
    #[error("child route pattern must be relative, without a leading '/': {0:?}")]
    AbsoluteChildPattern(String),
    #[error("empty parameter name in pattern {0:?}")]
    EmptyParamName(String),
    #[error("catch-all must be the final segment of pattern {0:?}")]
    CatchAllNotLast(String),
}

/// Declarative route entry, the startup configuration format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    /// Path pattern relative to the parent; `""` declares an index route.
    pub path: String,
    /// Unique identifier for programmatic navigation.
    pub name: String,
    /// Name of the view this route renders, resolved via the view registry.
    pub view: String,
    /// Nested entries; non-empty makes this a layout route.
    pub children: Vec<RouteDef>,
}

impl RouteDef {
    /// A leaf route rendering a single view.
    pub fn view(name: &str, path: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            view: view.to_string(),
            children: Vec::new(),
        }
    }

    /// A layout route whose view wraps the matched child.
    pub fn layout(name: &str, path: &str, view: &str, children: Vec<RouteDef>) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            view: view.to_string(),
            children,
        }
    }
}

/// One parsed pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// `:name` — captures exactly one segment.
    Param(String),
    /// `*name` — captures the remaining segments, zero or more.
    CatchAll(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(s) => f.write_str(s),
            Segment::Param(name) => write!(f, ":{name}"),
            Segment::CatchAll(name) => write!(f, "*{name}"),
        }
    }
}

/// Stable arena index of a route. Matched chains and mount bookkeeping
/// compare routes by id; ids are only minted by [`RouteTable::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(pub usize);

/// Interned route entry.
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub name: String,
    pub view: String,
    /// The pattern as written in the definition (relative form).
    pub pattern: String,
    pub segments: Vec<Segment>,
    pub parent: Option<RouteId>,
    pub children: Vec<RouteId>,
}

impl RouteNode {
    /// Layout routes have children; their view wraps the matched child.
    pub fn is_layout(&self) -> bool {
        !self.children.is_empty()
    }

    /// Index routes match when no path segments remain under their parent.
    pub fn is_index(&self) -> bool {
        self.segments.is_empty() && self.parent.is_some()
    }
}

/// Configuration smells worth surfacing without failing the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableWarning {
    /// No top-level catch-all exists, so unresolved paths surface `NotFound`
    /// to the shell with nothing to fall back on.
    NoFallbackRoute,
}

impl fmt::Display for TableWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableWarning::NoFallbackRoute => f.write_str(
                "no fallback route declared: unresolved paths surface NotFound to the shell",
            ),
        }
    }
}

/// Immutable route forest, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    nodes: Vec<RouteNode>,
    roots: Vec<RouteId>,
    by_name: BTreeMap<String, RouteId>,
}

impl RouteTable {
    /// Validate and intern a set of route definitions.
    pub fn build(defs: Vec<RouteDef>) -> Result<RouteTable, RouteTableError> {
        let mut table = RouteTable {
            nodes: Vec::new(),
            roots: Vec::new(),
            by_name: BTreeMap::new(),
        };
        for def in defs {
            if !def.path.starts_with('/') {
                return Err(RouteTableError::RelativeRootPattern(def.path));
            }
            let id = table.intern(def, None)?;
            table.roots.push(id);
        }
        Ok(table)
    }

    fn intern(&mut self, def: RouteDef, parent: Option<RouteId>) -> Result<RouteId, RouteTableError> {
        let RouteDef {
            path,
            name,
            view,
            children,
        } = def;

        if name.is_empty() {
            return Err(RouteTableError::EmptyName(path));
        }
        if self.by_name.contains_key(&name) {
            return Err(RouteTableError::DuplicateName(name));
        }
        if parent.is_some() && path.starts_with('/') {
            return Err(RouteTableError::AbsoluteChildPattern(path));
        }

        let segments = parse_pattern(&path)?;
        let id = RouteId(self.nodes.len());
        self.by_name.insert(name.clone(), id);
        self.nodes.push(RouteNode {
            name,
            view,
            pattern: path,
            segments,
            parent,
            children: Vec::new(),
        });

        for child in children {
            let child_id = self.intern(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    pub fn node(&self, id: RouteId) -> &RouteNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    /// Total number of interned routes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a route by its unique name.
    pub fn find_name(&self, name: &str) -> Option<RouteId> {
        self.by_name.get(name).copied()
    }

    /// Ids of all routes in interning order (roots before their subtrees).
    pub fn ids(&self) -> impl Iterator<Item = RouteId> + '_ {
        (0..self.nodes.len()).map(RouteId)
    }

    /// Root-to-target ancestor chain for a route.
    pub fn chain_to(&self, id: RouteId) -> Vec<RouteId> {
        let mut chain = vec![id];
        let mut cursor = id;
        while let Some(parent) = self.node(cursor).parent {
            chain.push(parent);
            cursor = parent;
        }
        chain.reverse();
        chain
    }

    /// Ancestor-concatenated pattern for a route, in absolute form.
    ///
    /// Index routes yield their parent's pattern; the root layout yields `/`.
    pub fn full_pattern(&self, id: RouteId) -> String {
        let mut parts = Vec::new();
        for ancestor in self.chain_to(id) {
            for segment in &self.node(ancestor).segments {
                parts.push(segment.to_string());
            }
        }
        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", parts.join("/"))
        }
    }

    /// Every navigable path whose chain contains only literal segments,
    /// paired with its leaf route. Declaration-order depth-first; this is
    /// the static export surface.
    pub fn concrete_paths(&self) -> Vec<(String, RouteId)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        for &root in &self.roots {
            self.collect_concrete(root, &mut prefix, &mut out);
        }
        out
    }

    fn collect_concrete(
        &self,
        id: RouteId,
        prefix: &mut Vec<String>,
        out: &mut Vec<(String, RouteId)>,
    ) {
        let node = self.node(id);
        let mut pushed = 0;
        for segment in &node.segments {
            match segment {
                Segment::Literal(s) => {
                    prefix.push(s.clone());
                    pushed += 1;
                }
                // Parameterized subtree: nothing below it is concrete.
                Segment::Param(_) | Segment::CatchAll(_) => {
                    prefix.truncate(prefix.len() - pushed);
                    return;
                }
            }
        }
        if node.children.is_empty() {
            let path = if prefix.is_empty() {
                "/".to_string()
            } else {
                format!("/{}", prefix.join("/"))
            };
            out.push((path, id));
        } else {
            for &child in &node.children {
                self.collect_concrete(child, prefix, out);
            }
        }
        prefix.truncate(prefix.len() - pushed);
    }

    /// Leaf routes whose full pattern carries a parameter or catch-all,
    /// with that pattern. These cannot be statically exported.
    pub fn parameterized_patterns(&self) -> Vec<(String, RouteId)> {
        self.ids()
            .filter(|&id| self.node(id).children.is_empty())
            .map(|id| (self.full_pattern(id), id))
            .filter(|(pattern, _)| pattern.contains(':') || pattern.contains('*'))
            .collect()
    }

    /// Configuration smells. Currently: a table without a top-level
    /// catch-all has no way to absorb unmatched paths.
    pub fn warnings(&self) -> Vec<TableWarning> {
        let has_fallback = self
            .ids()
            .filter(|&id| self.node(id).children.is_empty())
            .any(|id| self.full_pattern(id).starts_with("/*"));
        if has_fallback {
            Vec::new()
        } else {
            vec![TableWarning::NoFallbackRoute]
        }
    }
}

/// Parse a pattern into segments. Leading/trailing/doubled slashes
/// normalize away; the empty pattern yields no segments (index route).
fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, RouteTableError> {
    let pieces: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.iter().enumerate() {
        let segment = if let Some(name) = piece.strip_prefix(':') {
            if name.is_empty() {
                return Err(RouteTableError::EmptyParamName(pattern.to_string()));
            }
            Segment::Param(name.to_string())
        } else if let Some(name) = piece.strip_prefix('*') {
            if name.is_empty() {
                return Err(RouteTableError::EmptyParamName(pattern.to_string()));
            }
            if i + 1 != pieces.len() {
                return Err(RouteTableError::CatchAllNotLast(pattern.to_string()));
            }
            Segment::CatchAll(name.to_string())
        } else {
            Segment::Literal(piece.to_string())
        };
        segments.push(segment);
    }
    Ok(segments)
}

/// The shipped application table: a persistent chrome layout at `/` with
/// the browsing views as children, plus a standalone login route.
pub fn default_routes() -> Vec<RouteDef> {
    vec![
        RouteDef::layout(
            "home",
            "/",
            "Home",
            vec![
                RouteDef::view("dashboard", "", "Dashboard"),
                RouteDef::view("history", "history", "History"),
                RouteDef::view("settings", "settings", "Settings"),
                RouteDef::view("prompts", "prompts", "Prompts"),
                RouteDef::view("prompts-create", "prompts/create", "PromptsCreate"),
            ],
        ),
        RouteDef::view("login", "/login", "Login"),
    ]
}
