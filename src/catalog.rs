//! The prompt catalog: an ordered record store with change observers.
//!
//! Records live in display order, newest additions first. [`Catalog::add`]
//! prepends and then notifies every subscribed observer synchronously with
//! the full record list, so an observer never sees a partial update and
//! needs no diffing of its own. Observers are plain `FnMut` closures owned
//! by the catalog; [`ObserverId`] detaches them again.
//!
//! The built-in template set ships embedded in the binary (see
//! [`stock_seed_toml`]); [`load_seed_file`] reads the same TOML shape from
//! disk for custom seeds.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("a record with id {0:?} already exists")]
    DuplicateId(String),
    #[error("record id must not be empty")]
    EmptyId,
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid seed data: {0}")]
    Catalog(#[from] CatalogError),
}

/// Serde codec for the catalog's timestamp format, `"2024-02-01 12:00:00"`.
/// Kept as a plain string on the wire; unquoted TOML datetimes are rejected.
pub mod created_at_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Where a record came from and how it is grouped in the browsing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    /// Shipped with the application.
    Preset,
    /// Authored by the user at runtime.
    Custom,
    /// Pinned by the user.
    Favorite,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Preset => "preset",
            PromptKind::Custom => "custom",
            PromptKind::Favorite => "favorite",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptRecord {
    pub id: String,
    pub title: String,
    /// The template text itself.
    pub content: String,
    /// Free-form grouping label shown alongside the title.
    pub tag: String,
    pub views: u64,
    pub stars: u64,
    #[serde(with = "created_at_format")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: PromptKind,
}

impl PromptRecord {
    /// A fresh user-authored record with zeroed engagement counters.
    pub fn custom(
        id: &str,
        title: &str,
        content: &str,
        tag: &str,
        created_at: NaiveDateTime,
    ) -> Self {
        PromptRecord {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tag: tag.to_string(),
            views: 0,
            stars: 0,
            created_at,
            kind: PromptKind::Custom,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    #[serde(default)]
    prompts: Vec<PromptRecord>,
}

/// The built-in template set, in the same TOML shape [`load_seed_file`]
/// reads.
pub fn stock_seed_toml() -> &'static str {
    include_str!("../static/presets.toml")
}

/// Parse seed TOML into records, in file order.
pub fn parse_seed(raw: &str) -> Result<Vec<PromptRecord>, SeedError> {
    let file: SeedFile = toml::from_str(raw)?;
    Ok(file.prompts)
}

/// Read a seed file from disk. File order becomes display order.
pub fn load_seed_file(path: &Path) -> Result<Vec<PromptRecord>, SeedError> {
    let raw = fs::read_to_string(path)?;
    parse_seed(&raw)
}

/// Handle for detaching an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered record store with synchronous change observers.
pub struct Catalog {
    records: Vec<PromptRecord>,
    observers: Vec<(ObserverId, Box<dyn FnMut(&[PromptRecord])>)>,
    next_observer: u64,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("records", &self.records.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new()
    }
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog {
            records: Vec::new(),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Build a catalog from records already in display order. Duplicate or
    /// empty ids are rejected; no observers exist yet, so nothing fires.
    pub fn from_records(records: Vec<PromptRecord>) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();
        for record in records {
            catalog.validate_id(&record.id)?;
            catalog.records.push(record);
        }
        Ok(catalog)
    }

    /// Catalog pre-populated with the built-in template set.
    pub fn seeded() -> Result<Catalog, SeedError> {
        let records = parse_seed(stock_seed_toml())?;
        Ok(Catalog::from_records(records)?)
    }

    /// Current records in display order, newest additions first.
    pub fn snapshot(&self) -> &[PromptRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PromptRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Prepend a record and notify observers. On error nothing changes and
    /// nothing fires.
    pub fn add(&mut self, record: PromptRecord) -> Result<(), CatalogError> {
        self.validate_id(&record.id)?;
        self.records.insert(0, record);
        self.notify();
        Ok(())
    }

    fn validate_id(&self, id: &str) -> Result<(), CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if self.get(id).is_some() {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    /// Attach an observer. It fires on the next change, not on attach.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&[PromptRecord]) + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Detach an observer. Returns false when the id is already gone.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        let records = &self.records;
        for (_, observer) in &mut self.observers {
            observer(records);
        }
    }
}
