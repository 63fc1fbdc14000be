//! # Prompt Shell
//!
//! A headless single-page application shell for a prompt template catalog.
//! Routes form a tree whose inner nodes are layouts, the catalog is an
//! observable record store seeded from TOML, and every screen is a pure
//! function from (route chain, catalog) to HTML.
//!
//! # Architecture: The Session Loop
//!
//! A [`shell::Session`] turns a stream of events into structured outcomes,
//! one at a time:
//!
//! ```text
//! 1. Event     script/CLI   →  SessionEvent   (goto, back, forward, add)
//! 2. Resolve   path         →  MatchedChain   (table walk with backtracking)
//! 3. Delta     old vs new   →  MountDelta     (preserved / exited / entered)
//! 4. Render    chain        →  HTML           (views composed leaf into layout)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Determinism**: every step is synchronous and ordered, so a script
//!   replays to the same outcomes every time.
//! - **Inspectability**: each stage produces a plain value (`MatchedChain`,
//!   `MountDelta`, `Outcome`) you can print or assert on.
//! - **Testability**: routing, state, and rendering are exercised without a
//!   browser, a DOM, or any I/O beyond reading seed files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`routes`] | Route definitions, pattern parsing, and the interned route table |
//! | [`router`] | Path resolution, name-based URL building, history, mount deltas |
//! | [`catalog`] | Prompt template records, TOML seeding, synchronous change observers |
//! | [`views`] | View registry and Maud view functions composed along a matched chain |
//! | [`shell`] | The session event loop tying router, catalog, and views together |
//! | [`script`] | Text command format for driving a session from a file or the demo |
//! | [`export`] | Static HTML export of every concrete route plus `manifest.json` |
//! | [`config`] | `prompt-shell.toml` loading and validation |
//! | [`output`] | CLI output formatting — tree-based display of shell activity |
//!
//! # Design Decisions
//!
//! ## Explicit Handles Over Globals
//!
//! There is no global router and no global store. A [`shell::Session`] owns
//! its [`router::Router`] and [`catalog::Catalog`] and hands references down
//! into views through [`views::ViewCtx`]. Tests build as many isolated
//! sessions as they need; two sessions never share state by accident.
//!
//! ## Synchronous Observers
//!
//! Catalog observers are boxed closures invoked inline while `add` still
//! holds the mutable borrow. By the time `add` returns, every subscriber has
//! seen the new record, in subscription order. No channels, no executor, no
//! reentrancy: the whole shell is single-threaded, which is why the session's
//! notice log is an `Rc<RefCell<...>>` rather than anything heavier.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro, rather than Handlebars or Tera:
//!
//! - **Compile-time checking**: malformed HTML fails the build, not the page.
//! - **Type-safe**: view code splices Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped, which matters
//!   when rendering user-authored template records.
//! - **Zero runtime files**: nothing to ship beside the binary, nothing to get
//!   out of sync.
//!
//! ## Route Identity by Interned Id
//!
//! Mount bookkeeping compares [`routes::RouteId`]s, never paths or view
//! names. Two routes may render the same view; whether a layout survives a
//! navigation is decided by the longest shared id prefix between the old and
//! new chains ([`router::MountDelta`]), so re-renders are never confused with
//! remounts.
//!
//! ## Ranked Backtracking Resolution
//!
//! At each level of the tree, literal segments beat parameters, parameters
//! beat index routes, and catch-alls come last, with declaration order
//! breaking ties. Matching backtracks: a branch that wins on its first
//! segment but dead-ends deeper releases its captures and the next candidate
//! runs. Resolution is deterministic: the same table and path always produce
//! the same chain.
//!
//! ## History as a Plain Vec
//!
//! Browser semantics need exactly one growable list and a cursor: navigating
//! truncates everything past the cursor, back and forward just move it.
//! Distinct back/forward stacks would double the bookkeeping to model the
//! same thing.
//!
//! # Headless by Design
//!
//! The shell never assumes a browser. The demo loop, the resolver CLI, and
//! the static exporter all run the same resolve-compose path, so a directory
//! of exported HTML is byte-for-byte what a live session would render at each
//! path. If a screen looks wrong, rendering it is a unit test, not a
//! debugging session.

pub mod catalog;
pub mod config;
pub mod export;
pub mod output;
pub mod router;
pub mod routes;
pub mod script;
pub mod shell;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
