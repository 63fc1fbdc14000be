//! Path resolution and session history.
//!
//! [`resolve`] walks the route forest segment by segment, trying siblings
//! in specificity order and backtracking when a branch dead-ends, and
//! produces a [`MatchedChain`]: the root-to-leaf run of routes that claimed
//! the path plus any captured parameters. [`Router`] wraps a table with
//! browser-style history (navigate pushes, back and forward move a cursor,
//! navigating after back discards the forward branch). [`MountDelta`]
//! compares two chains to tell the shell which layouts stay mounted and
//! which views enter or leave.
//!
//! Sibling order during matching: literal-first routes, then parameterized
//! routes, then index and pass-through entries, then catch-alls. The sort
//! is stable, so declaration order breaks ties.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::routes::{RouteId, RouteTable, Segment};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigateError {
    #[error("no route matches path {0:?}")]
    NotFound(String),
    #[error("no route named {0:?}")]
    UnknownRouteName(String),
    #[error("route {name:?} needs a value for parameter {param:?}")]
    MissingParam { name: String, param: String },
}

/// Where a navigation is headed: a concrete path, or a route name with
/// parameter values to substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Path(String),
    Name {
        name: String,
        params: BTreeMap<String, String>,
    },
}

impl NavTarget {
    pub fn path(path: &str) -> Self {
        NavTarget::Path(path.to_string())
    }

    pub fn name(name: &str) -> Self {
        NavTarget::Name {
            name: name.to_string(),
            params: BTreeMap::new(),
        }
    }

    pub fn name_with<I, K, V>(name: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        NavTarget::Name {
            name: name.to_string(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A successful resolution: the chain of routes that claimed the path,
/// root first, with captured parameters and the canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedChain {
    pub ids: Vec<RouteId>,
    pub params: BTreeMap<String, String>,
    /// Canonical form of the matched path: leading slash, no trailing slash.
    pub path: String,
}

impl MatchedChain {
    /// The innermost matched route. Chains are never empty.
    pub fn leaf(&self) -> RouteId {
        self.ids[self.ids.len() - 1]
    }
}

/// Split a raw path into segments, dropping empty pieces so `/history`,
/// `history`, and `/history/` all mean the same thing.
pub fn normalize_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn canonical(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Match a path against the table. Returns `None` when no chain of routes
/// consumes the path exactly.
pub fn resolve(table: &RouteTable, path: &str) -> Option<MatchedChain> {
    let segments = normalize_path(path);
    let mut params = BTreeMap::new();
    let mut chain = Vec::new();
    for id in ranked(table, table.roots()) {
        if try_match(table, id, &segments, &mut params, &mut chain) {
            return Some(MatchedChain {
                ids: chain,
                params,
                path: canonical(&segments),
            });
        }
    }
    None
}

/// Order siblings for matching by the kind of their first segment:
/// literals, then params, then zero-segment entries (index routes and
/// pass-through layouts), then catch-alls. Stable.
fn ranked(table: &RouteTable, ids: &[RouteId]) -> Vec<RouteId> {
    let mut ordered = ids.to_vec();
    ordered.sort_by_key(|&id| match table.node(id).segments.first() {
        Some(Segment::Literal(_)) => 0,
        Some(Segment::Param(_)) => 1,
        None => 2,
        Some(Segment::CatchAll(_)) => 3,
    });
    ordered
}

/// Try to match `rem` starting at route `id`, extending `params` and
/// `chain`. On failure both are restored, so the caller can try the next
/// sibling.
fn try_match(
    table: &RouteTable,
    id: RouteId,
    rem: &[String],
    params: &mut BTreeMap<String, String>,
    chain: &mut Vec<RouteId>,
) -> bool {
    let node = table.node(id);
    let saved = params.clone();
    let depth = chain.len();

    let mut rest = rem;
    let mut matched = true;
    for segment in &node.segments {
        match segment {
            Segment::Literal(lit) => match rest.split_first() {
                Some((head, tail)) if head == lit => rest = tail,
                _ => {
                    matched = false;
                    break;
                }
            },
            Segment::Param(name) => match rest.split_first() {
                Some((head, tail)) => {
                    params.insert(name.clone(), head.clone());
                    rest = tail;
                }
                None => {
                    matched = false;
                    break;
                }
            },
            Segment::CatchAll(name) => {
                params.insert(name.clone(), rest.join("/"));
                rest = &[];
            }
        }
    }

    if matched {
        chain.push(id);
        if node.children.is_empty() {
            // A leaf only matches when it consumed the whole path.
            if rest.is_empty() {
                return true;
            }
        } else {
            for child in ranked(table, &node.children) {
                if try_match(table, child, rest, params, chain) {
                    return true;
                }
            }
        }
    }

    *params = saved;
    chain.truncate(depth);
    false
}

/// Build the concrete path for a named route by substituting parameter
/// values into its ancestor-concatenated pattern.
pub fn path_for(
    table: &RouteTable,
    name: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, NavigateError> {
    let id = table
        .find_name(name)
        .ok_or_else(|| NavigateError::UnknownRouteName(name.to_string()))?;
    let mut parts = Vec::new();
    for ancestor in table.chain_to(id) {
        for segment in &table.node(ancestor).segments {
            match segment {
                Segment::Literal(lit) => parts.push(lit.clone()),
                Segment::Param(p) | Segment::CatchAll(p) => {
                    let value = params.get(p).ok_or_else(|| NavigateError::MissingParam {
                        name: name.to_string(),
                        param: p.clone(),
                    })?;
                    parts.push(value.clone());
                }
            }
        }
    }
    Ok(canonical(&parts))
}

/// The difference between two matched chains: which routes stay mounted
/// and which leave or join, in the order the shell should apply them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountDelta {
    /// Mounted in both chains, root first.
    pub preserved: Vec<RouteId>,
    /// Leaving the tree, leaf first.
    pub exited: Vec<RouteId>,
    /// Joining the tree, root first.
    pub entered: Vec<RouteId>,
}

impl MountDelta {
    pub fn between(old: &MatchedChain, new: &MatchedChain) -> MountDelta {
        MountDelta::between_ids(&old.ids, &new.ids)
    }

    /// Same split, from raw mounted stacks.
    pub fn between_ids(old: &[RouteId], new: &[RouteId]) -> MountDelta {
        let shared = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        MountDelta {
            preserved: new[..shared].to_vec(),
            exited: old[shared..].iter().rev().copied().collect(),
            entered: new[shared..].to_vec(),
        }
    }
}

/// Route table plus session history.
///
/// History is a list of canonical paths and a cursor. `navigate` truncates
/// anything past the cursor before pushing, the way a browser drops the
/// forward branch when you navigate after going back.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    history: Vec<String>,
    cursor: usize,
    current: MatchedChain,
}

impl Router {
    /// Start a session at `initial_path`, which must resolve.
    pub fn new(table: RouteTable, initial_path: &str) -> Result<Router, NavigateError> {
        let current = resolve(&table, initial_path)
            .ok_or_else(|| NavigateError::NotFound(initial_path.to_string()))?;
        let history = vec![current.path.clone()];
        Ok(Router {
            table,
            history,
            cursor: 0,
            current,
        })
    }

    /// Resolve the target and make it current, pushing a history entry.
    /// On failure the router state is untouched.
    pub fn navigate(&mut self, target: &NavTarget) -> Result<&MatchedChain, NavigateError> {
        let path = match target {
            NavTarget::Path(p) => p.clone(),
            NavTarget::Name { name, params } => path_for(&self.table, name, params)?,
        };
        let chain =
            resolve(&self.table, &path).ok_or_else(|| NavigateError::NotFound(path.clone()))?;
        self.history.truncate(self.cursor + 1);
        self.history.push(chain.path.clone());
        self.cursor = self.history.len() - 1;
        self.current = chain;
        Ok(&self.current)
    }

    /// Step to the previous history entry, or `None` at the oldest one.
    pub fn back(&mut self) -> Option<&MatchedChain> {
        if self.cursor == 0 {
            return None;
        }
        // Entries only join the history by resolving, and the table never
        // changes, so re-resolution cannot fail.
        let chain = resolve(&self.table, &self.history[self.cursor - 1])?;
        self.cursor -= 1;
        self.current = chain;
        Some(&self.current)
    }

    /// Step to the next history entry, or `None` at the newest one.
    pub fn forward(&mut self) -> Option<&MatchedChain> {
        if self.cursor + 1 >= self.history.len() {
            return None;
        }
        let chain = resolve(&self.table, &self.history[self.cursor + 1])?;
        self.cursor += 1;
        self.current = chain;
        Some(&self.current)
    }

    pub fn current(&self) -> &MatchedChain {
        &self.current
    }

    pub fn current_path(&self) -> &str {
        &self.current.path
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{RouteDef, default_routes};

    fn default_table() -> RouteTable {
        RouteTable::build(default_routes()).unwrap()
    }

    fn chain_names(table: &RouteTable, chain: &MatchedChain) -> Vec<String> {
        chain
            .ids
            .iter()
            .map(|&id| table.node(id).name.clone())
            .collect()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    #[test]
    fn root_resolves_to_layout_and_index() {
        let table = default_table();
        let chain = resolve(&table, "/").unwrap();
        assert_eq!(chain_names(&table, &chain), vec!["home", "dashboard"]);
        assert_eq!(chain.path, "/");
        assert!(chain.params.is_empty());
    }

    #[test]
    fn standalone_route_resolves() {
        let table = default_table();
        let chain = resolve(&table, "/login").unwrap();
        assert_eq!(chain_names(&table, &chain), vec!["login"]);
        assert_eq!(chain.path, "/login");
    }

    #[test]
    fn nested_literal_resolves_through_layout() {
        let table = default_table();
        let chain = resolve(&table, "/history").unwrap();
        assert_eq!(chain_names(&table, &chain), vec!["home", "history"]);
    }

    #[test]
    fn slash_variants_are_equivalent() {
        let table = default_table();
        let plain = resolve(&table, "/history").unwrap();
        assert_eq!(resolve(&table, "history").unwrap(), plain);
        assert_eq!(resolve(&table, "/history/").unwrap(), plain);
        assert_eq!(resolve(&table, "//history").unwrap(), plain);
    }

    #[test]
    fn canonical_path_has_leading_slash_only() {
        let table = default_table();
        assert_eq!(resolve(&table, "history/").unwrap().path, "/history");
        assert_eq!(resolve(&table, "").unwrap().path, "/");
    }

    #[test]
    fn backtracks_past_matching_leaf_with_leftover() {
        // "prompts" the leaf claims the first segment of /prompts/create but
        // leaves "create" unconsumed; the sibling with the longer pattern
        // must still win.
        let table = default_table();
        let chain = resolve(&table, "/prompts/create").unwrap();
        assert_eq!(chain_names(&table, &chain), vec!["home", "prompts-create"]);
    }

    #[test]
    fn shorter_sibling_still_matches_exact_path() {
        let table = default_table();
        let chain = resolve(&table, "/prompts").unwrap();
        assert_eq!(chain_names(&table, &chain), vec!["home", "prompts"]);
    }

    #[test]
    fn unmatched_path_is_none() {
        let table = default_table();
        assert!(resolve(&table, "/nope").is_none());
        assert!(resolve(&table, "/history/extra").is_none());
        assert!(resolve(&table, "/login/deeper").is_none());
    }

    #[test]
    fn param_captures_segment() {
        let defs = vec![RouteDef::layout(
            "things",
            "/things",
            "Things",
            vec![RouteDef::view("thing", ":id", "Thing")],
        )];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/things/42").unwrap();
        assert_eq!(chain.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(chain.path, "/things/42");
    }

    #[test]
    fn param_requires_a_segment() {
        let defs = vec![RouteDef::view("thing", "/things/:id", "Thing")];
        let table = RouteTable::build(defs).unwrap();
        assert!(resolve(&table, "/things").is_none());
    }

    #[test]
    fn literal_beats_param_regardless_of_declaration_order() {
        let defs = vec![RouteDef::layout(
            "things",
            "/things",
            "Things",
            vec![
                RouteDef::view("thing", ":id", "Thing"),
                RouteDef::view("mine", "mine", "Mine"),
            ],
        )];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/things/mine").unwrap();
        assert_eq!(table.node(chain.leaf()).name, "mine");
        assert!(chain.params.is_empty());
    }

    #[test]
    fn param_beats_catch_all() {
        let defs = vec![RouteDef::layout(
            "docs",
            "/docs",
            "Docs",
            vec![
                RouteDef::view("any", "*rest", "Any"),
                RouteDef::view("page", ":page", "Page"),
            ],
        )];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/docs/intro").unwrap();
        assert_eq!(table.node(chain.leaf()).name, "page");
    }

    #[test]
    fn catch_all_takes_remaining_segments() {
        let defs = vec![RouteDef::view("any", "/*path", "Any")];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/a/b/c").unwrap();
        assert_eq!(chain.params.get("path").map(String::as_str), Some("a/b/c"));
    }

    #[test]
    fn catch_all_matches_zero_segments() {
        let defs = vec![RouteDef::view("any", "/*path", "Any")];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/").unwrap();
        assert_eq!(chain.params.get("path").map(String::as_str), Some(""));
    }

    #[test]
    fn catch_all_only_absorbs_paths_other_routes_miss() {
        let mut defs = default_routes();
        defs.push(RouteDef::view("not-found", "/*path", "NotFound"));
        let table = RouteTable::build(defs).unwrap();
        let history = resolve(&table, "/history").unwrap();
        assert_eq!(table.node(history.leaf()).name, "history");
        let missed = resolve(&table, "/no/such/page").unwrap();
        assert_eq!(table.node(missed.leaf()).name, "not-found");
        assert_eq!(
            missed.params.get("path").map(String::as_str),
            Some("no/such/page")
        );
    }

    #[test]
    fn declaration_order_breaks_ties_between_equal_siblings() {
        let defs = vec![
            RouteDef::view("first", "/same", "First"),
            RouteDef::view("second", "/same", "Second"),
        ];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/same").unwrap();
        assert_eq!(table.node(chain.leaf()).name, "first");
    }

    #[test]
    fn failed_branch_leaves_no_stale_params() {
        // The param branch captures a value, dead-ends, and must not leak
        // the capture into the catch-all match.
        let defs = vec![RouteDef::layout(
            "docs",
            "/docs",
            "Docs",
            vec![
                RouteDef::layout(
                    "section",
                    ":section",
                    "Section",
                    vec![RouteDef::view("section-edit", "edit", "SectionEdit")],
                ),
                RouteDef::view("any", "*rest", "Any"),
            ],
        )];
        let table = RouteTable::build(defs).unwrap();
        let chain = resolve(&table, "/docs/guide/view").unwrap();
        assert_eq!(table.node(chain.leaf()).name, "any");
        assert!(!chain.params.contains_key("section"));
        assert_eq!(
            chain.params.get("rest").map(String::as_str),
            Some("guide/view")
        );
    }

    #[test]
    fn layout_without_index_child_does_not_match_bare_path() {
        let defs = vec![RouteDef::layout(
            "things",
            "/things",
            "Things",
            vec![RouteDef::view("thing", ":id", "Thing")],
        )];
        let table = RouteTable::build(defs).unwrap();
        assert!(resolve(&table, "/things").is_none());
    }

    // =========================================================================
    // Reverse lookup
    // =========================================================================

    #[test]
    fn path_for_concatenates_ancestors() {
        let table = default_table();
        let none = BTreeMap::new();
        assert_eq!(path_for(&table, "dashboard", &none).unwrap(), "/");
        assert_eq!(path_for(&table, "history", &none).unwrap(), "/history");
        assert_eq!(
            path_for(&table, "prompts-create", &none).unwrap(),
            "/prompts/create"
        );
    }

    #[test]
    fn path_for_substitutes_params() {
        let defs = vec![RouteDef::layout(
            "things",
            "/things",
            "Things",
            vec![RouteDef::view("thing", ":id", "Thing")],
        )];
        let table = RouteTable::build(defs).unwrap();
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "42".to_string());
        assert_eq!(path_for(&table, "thing", &params).unwrap(), "/things/42");
    }

    #[test]
    fn path_for_unknown_name_errors() {
        let table = default_table();
        let err = path_for(&table, "missing", &BTreeMap::new()).unwrap_err();
        assert_eq!(err, NavigateError::UnknownRouteName("missing".to_string()));
    }

    #[test]
    fn path_for_missing_param_errors() {
        let defs = vec![RouteDef::view("thing", "/things/:id", "Thing")];
        let table = RouteTable::build(defs).unwrap();
        let err = path_for(&table, "thing", &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            NavigateError::MissingParam {
                name: "thing".to_string(),
                param: "id".to_string()
            }
        );
    }

    // =========================================================================
    // Router history
    // =========================================================================

    #[test]
    fn new_router_seeds_history_with_initial_path() {
        let router = Router::new(default_table(), "/").unwrap();
        assert_eq!(router.history(), &["/".to_string()]);
        assert_eq!(router.cursor(), 0);
        assert_eq!(router.current_path(), "/");
    }

    #[test]
    fn new_router_rejects_unresolvable_start() {
        let err = Router::new(default_table(), "/nope").unwrap_err();
        assert_eq!(err, NavigateError::NotFound("/nope".to_string()));
    }

    #[test]
    fn navigate_pushes_history() {
        let mut router = Router::new(default_table(), "/").unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        router.navigate(&NavTarget::path("/settings")).unwrap();
        assert_eq!(
            router.history(),
            &["/".to_string(), "/history".to_string(), "/settings".to_string()]
        );
        assert_eq!(router.cursor(), 2);
        assert_eq!(router.current_path(), "/settings");
    }

    #[test]
    fn navigate_by_name() {
        let mut router = Router::new(default_table(), "/").unwrap();
        let chain = router.navigate(&NavTarget::name("prompts-create")).unwrap();
        assert_eq!(chain.path, "/prompts/create");
    }

    #[test]
    fn navigate_by_name_with_params() {
        let defs = vec![
            RouteDef::view("home", "/", "Home"),
            RouteDef::view("thing", "/things/:id", "Thing"),
        ];
        let table = RouteTable::build(defs).unwrap();
        let mut router = Router::new(table, "/").unwrap();
        let chain = router
            .navigate(&NavTarget::name_with("thing", [("id", "7")]))
            .unwrap();
        assert_eq!(chain.path, "/things/7");
        assert_eq!(chain.params.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn failed_navigate_leaves_state_untouched() {
        let mut router = Router::new(default_table(), "/").unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        assert!(router.navigate(&NavTarget::path("/nope")).is_err());
        assert!(router.navigate(&NavTarget::name("missing")).is_err());
        assert_eq!(router.current_path(), "/history");
        assert_eq!(router.history().len(), 2);
        assert_eq!(router.cursor(), 1);
    }

    #[test]
    fn back_and_forward_move_the_cursor_only() {
        let mut router = Router::new(default_table(), "/").unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        router.navigate(&NavTarget::path("/settings")).unwrap();

        assert_eq!(router.back().unwrap().path, "/history");
        assert_eq!(router.back().unwrap().path, "/");
        assert_eq!(router.history().len(), 3);

        assert_eq!(router.forward().unwrap().path, "/history");
        assert_eq!(router.forward().unwrap().path, "/settings");
        assert_eq!(router.history().len(), 3);
    }

    #[test]
    fn back_at_oldest_entry_is_none() {
        let mut router = Router::new(default_table(), "/").unwrap();
        assert!(router.back().is_none());
        assert_eq!(router.current_path(), "/");
        assert_eq!(router.cursor(), 0);
    }

    #[test]
    fn forward_at_newest_entry_is_none() {
        let mut router = Router::new(default_table(), "/").unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        assert!(router.forward().is_none());
        assert_eq!(router.current_path(), "/history");
    }

    #[test]
    fn navigate_after_back_discards_forward_branch() {
        let mut router = Router::new(default_table(), "/").unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        router.navigate(&NavTarget::path("/settings")).unwrap();
        router.back().unwrap();
        router.navigate(&NavTarget::path("/prompts")).unwrap();

        assert_eq!(
            router.history(),
            &["/".to_string(), "/history".to_string(), "/prompts".to_string()]
        );
        assert_eq!(router.cursor(), 2);
        assert!(router.forward().is_none());
    }

    #[test]
    fn same_path_navigation_still_pushes() {
        let mut router = Router::new(default_table(), "/").unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        router.navigate(&NavTarget::path("/history")).unwrap();
        assert_eq!(router.history().len(), 3);
        assert_eq!(router.back().unwrap().path, "/history");
    }

    // =========================================================================
    // Mount deltas
    // =========================================================================

    #[test]
    fn sibling_swap_preserves_shared_layout() {
        let table = default_table();
        let old = resolve(&table, "/").unwrap();
        let new = resolve(&table, "/history").unwrap();
        let delta = MountDelta::between(&old, &new);

        let home = table.find_name("home").unwrap();
        let dashboard = table.find_name("dashboard").unwrap();
        let history = table.find_name("history").unwrap();
        assert_eq!(delta.preserved, vec![home]);
        assert_eq!(delta.exited, vec![dashboard]);
        assert_eq!(delta.entered, vec![history]);
    }

    #[test]
    fn full_swap_exits_leaf_first_and_enters_root_first() {
        let table = default_table();
        let old = resolve(&table, "/prompts").unwrap();
        let new = resolve(&table, "/login").unwrap();
        let delta = MountDelta::between(&old, &new);

        let home = table.find_name("home").unwrap();
        let prompts = table.find_name("prompts").unwrap();
        let login = table.find_name("login").unwrap();
        assert!(delta.preserved.is_empty());
        assert_eq!(delta.exited, vec![prompts, home]);
        assert_eq!(delta.entered, vec![login]);
    }

    #[test]
    fn identical_chains_produce_empty_delta() {
        let table = default_table();
        let chain = resolve(&table, "/history").unwrap();
        let delta = MountDelta::between(&chain, &chain);
        assert_eq!(delta.preserved, chain.ids);
        assert!(delta.exited.is_empty());
        assert!(delta.entered.is_empty());
    }
}
