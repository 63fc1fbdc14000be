//! The application session: router, catalog, views, and config wired
//! together.
//!
//! [`Session::start`] performs the whole startup handshake: build the
//! shipped route table, verify every referenced view is registered, load
//! the seed catalog (embedded or file override), check the configured
//! fallback route exists, and resolve `/`. Anything wrong surfaces as a
//! [`ShellError`] before the first event.
//!
//! [`Session::handle`] applies one [`SessionEvent`] at a time, strictly in
//! order, and returns an [`Outcome`] describing exactly what changed: where
//! navigation landed and which layout frames stayed mounted, or why it was
//! blocked and where the fallback redirected. The session subscribes to its
//! own catalog at startup, so every `add` also leaves a [`CatalogNotice`]
//! in an internal log the CLI drains for display.
//!
//! A session is single-threaded by design; the observer log uses
//! `Rc<RefCell<...>>` rather than any synchronized structure.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use maud::Markup;
use thiserror::Error;

use crate::catalog::{
    Catalog, CatalogError, PromptRecord, SeedError, load_seed_file, parse_seed, stock_seed_toml,
};
use crate::config::{ConfigError, ShellConfig};
use crate::router::{MountDelta, NavTarget, NavigateError, Router};
use crate::routes::{RouteId, RouteTable, RouteTableError, default_routes};
use crate::script::SessionEvent;
use crate::views::{RegistryError, ViewCtx, ViewRegistry, compose, page_document};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("route table: {0}")]
    Table(#[from] RouteTableError),
    #[error("views: {0}")]
    Registry(#[from] RegistryError),
    #[error("seed: {0}")]
    Seed(#[from] SeedError),
    #[error("initial navigation: {0}")]
    Navigate(#[from] NavigateError),
    #[error("fallback route {0:?} is not in the route table")]
    UnknownFallback(String),
}

/// Which end of the history a step ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Back => "back",
            Direction::Forward => "forward",
        }
    }
}

/// One catalog change as seen by the session's own observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogNotice {
    /// Record count after the change.
    pub len: usize,
    /// Title of the newest record.
    pub newest: Option<String>,
}

/// Structured result of one session event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Navigation landed: the new location plus what changed on screen.
    Moved {
        path: String,
        url: String,
        /// View names of the matched chain, root first.
        views: Vec<String>,
        delta: MountDelta,
    },
    /// Navigation failed; `fallback` is where the session went instead,
    /// when a fallback route is configured.
    Blocked {
        error: NavigateError,
        fallback: Option<String>,
    },
    /// Back or forward at the end of history; nothing changed.
    Edge { direction: Direction },
    /// A record joined the catalog.
    Added { id: String, len: usize },
    /// The catalog refused the record.
    Rejected { error: CatalogError },
}

/// A running application shell.
#[derive(Debug)]
pub struct Session {
    router: Router,
    catalog: Catalog,
    registry: ViewRegistry,
    config: ShellConfig,
    /// Route ids currently on screen, root first.
    mounted: Vec<RouteId>,
    notices: Rc<RefCell<Vec<CatalogNotice>>>,
}

impl Session {
    /// Wire up a session from config. Fails fast on anything that would
    /// otherwise break mid-session.
    pub fn start(config: ShellConfig) -> Result<Session, ShellError> {
        config.validate()?;

        let table = RouteTable::build(default_routes())?;
        let registry = ViewRegistry::with_defaults();
        registry.ensure(&table)?;

        if let Some(name) = &config.fallback
            && table.find_name(name).is_none()
        {
            return Err(ShellError::UnknownFallback(name.clone()));
        }

        let records = match &config.seed {
            Some(path) => load_seed_file(path)?,
            None => parse_seed(stock_seed_toml())?,
        };
        let mut catalog = Catalog::from_records(records).map_err(SeedError::from)?;

        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        catalog.subscribe(move |records| {
            sink.borrow_mut().push(CatalogNotice {
                len: records.len(),
                newest: records.first().map(|r| r.title.clone()),
            });
        });

        let router = Router::new(table, "/")?;
        let mounted = router.current().ids.clone();

        Ok(Session {
            router,
            catalog,
            registry,
            config,
            mounted,
            notices,
        })
    }

    /// Apply one event. Synchronous; the returned outcome says exactly
    /// what changed.
    pub fn handle(&mut self, event: SessionEvent) -> Outcome {
        match event {
            SessionEvent::Goto(target) => self.goto(&target),
            SessionEvent::Back => self.step(Direction::Back),
            SessionEvent::Forward => self.step(Direction::Forward),
            SessionEvent::Add {
                id,
                title,
                tag,
                content,
            } => self.add(&id, &title, &tag, &content),
        }
    }

    fn goto(&mut self, target: &NavTarget) -> Outcome {
        match self.router.navigate(target).map(|_| ()) {
            Ok(()) => self.moved_outcome(),
            Err(error) => {
                let fallback = self.apply_fallback(&error);
                Outcome::Blocked { error, fallback }
            }
        }
    }

    fn step(&mut self, direction: Direction) -> Outcome {
        let moved = match direction {
            Direction::Back => self.router.back().map(|_| ()),
            Direction::Forward => self.router.forward().map(|_| ()),
        };
        match moved {
            Some(()) => self.moved_outcome(),
            None => Outcome::Edge { direction },
        }
    }

    fn add(&mut self, id: &str, title: &str, tag: &str, content: &str) -> Outcome {
        let record = PromptRecord::custom(id, title, content, tag, Local::now().naive_local());
        match self.catalog.add(record) {
            Ok(()) => Outcome::Added {
                id: id.to_string(),
                len: self.catalog.len(),
            },
            Err(error) => Outcome::Rejected { error },
        }
    }

    /// Update the mounted stack from the freshly current chain and describe
    /// the move.
    fn moved_outcome(&mut self) -> Outcome {
        let chain = self.router.current();
        let delta = MountDelta::between_ids(&self.mounted, &chain.ids);
        let path = chain.path.clone();
        let ids = chain.ids.clone();
        let views = self.view_names(&ids);
        self.mounted = ids;
        Outcome::Moved {
            url: self.config.url_mode.format(&path),
            path,
            views,
            delta,
        }
    }

    /// A missed path redirects to the configured fallback route, so the
    /// screen never empties. Name errors are caller bugs and stay put.
    fn apply_fallback(&mut self, error: &NavigateError) -> Option<String> {
        if !matches!(error, NavigateError::NotFound(_)) {
            return None;
        }
        let name = self.config.fallback.clone()?;
        // The name was verified against the table at startup.
        self.router.navigate(&NavTarget::name(&name)).ok()?;
        let chain = self.router.current();
        let path = chain.path.clone();
        self.mounted = chain.ids.clone();
        Some(path)
    }

    fn view_names(&self, ids: &[RouteId]) -> Vec<String> {
        let table = self.router.table();
        ids.iter().map(|&id| table.node(id).view.clone()).collect()
    }

    /// Compose the current chain into markup.
    pub fn render(&self) -> Result<Markup, RegistryError> {
        let chain = self.router.current();
        let ctx = ViewCtx {
            path: &chain.path,
            params: &chain.params,
            prompts: self.catalog.snapshot(),
        };
        compose(&self.registry, self.router.table(), chain, &ctx)
    }

    /// Compose the current chain into a complete HTML document.
    pub fn render_page(&self) -> Result<Markup, RegistryError> {
        Ok(page_document(&self.page_title(), self.render()?))
    }

    fn page_title(&self) -> String {
        let table = self.router.table();
        let leaf = self.router.current().leaf();
        format!("{} - Prompt Shell", table.node(leaf).view)
    }

    /// The current location on the configured URL surface.
    pub fn current_url(&self) -> String {
        self.config.url_mode.format(self.router.current_path())
    }

    /// Catalog notifications observed since the last drain, oldest first.
    pub fn drain_notices(&mut self) -> Vec<CatalogNotice> {
        self.notices.borrow_mut().drain(..).collect()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn table(&self) -> &RouteTable {
        self.router.table()
    }

    /// Route ids currently on screen, root first.
    pub fn mounted(&self) -> &[RouteId] {
        &self.mounted
    }
}
