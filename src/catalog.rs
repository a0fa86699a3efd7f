//! Item catalog loaded from JSON.
//!
//! The catalog is a JSON object mapping item identifiers to item records.
//! Records usually carry many more fields (damage, slot type, ...); only the
//! ones needed to paint an icon are read, everything else is ignored.
//!
//! Entries are kept as raw JSON and turned into [`ItemRecord`]s one at a
//! time, so a malformed entry only fails itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CatalogError, IconError};

/// Placeholder used in diagnostics when a record has no `name`.
pub const UNKNOWN_NAME: &str = "unknown";

/// The fields of a catalog entry that drive icon painting.
///
/// Fields hold the raw JSON value, or `None` when the key is absent.
/// `icon` must be a string. A `type` or `rarity` that is not a string
/// matches no color table key and paints with the default color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemRecord {
    /// Display name, used for logging only.
    pub name: Option<Value>,

    /// Icon identifier in `<prefix>:<name>` form, e.g. `mdi:pistol`.
    pub icon: Option<Value>,

    /// Item type, key into the type color table.
    pub item_type: Option<Value>,

    /// Item rarity, key into the rarity color table.
    pub rarity: Option<Value>,
}

impl ItemRecord {
    /// Picks the painting fields out of a catalog entry.
    pub fn from_value(value: &Value) -> Result<Self, IconError> {
        let fields = value.as_object().ok_or_else(|| {
            IconError::InvalidRecord(format!("expected an object, got {value}"))
        })?;

        Ok(Self {
            name: fields.get("name").cloned(),
            icon: fields.get("icon").cloned(),
            item_type: fields.get("type").cloned(),
            rarity: fields.get("rarity").cloned(),
        })
    }

    /// Name for diagnostics, or [`UNKNOWN_NAME`].
    pub fn display_name(&self) -> &str {
        self.name
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_NAME)
    }

    pub fn icon(&self) -> Result<&str, IconError> {
        match &self.icon {
            None => Err(IconError::MissingField("icon")),
            Some(Value::String(icon)) => Ok(icon.as_str()),
            Some(other) => Err(IconError::InvalidRecord(format!(
                "`icon` must be a string, got {other}"
            ))),
        }
    }

    /// The type as a color table key; `None` if it is not a string.
    pub fn item_type(&self) -> Result<Option<&str>, IconError> {
        self.item_type
            .as_ref()
            .map(Value::as_str)
            .ok_or(IconError::MissingField("type"))
    }

    /// The rarity as a color table key; `None` if it is not a string.
    pub fn rarity(&self) -> Result<Option<&str>, IconError> {
        self.rarity
            .as_ref()
            .map(Value::as_str)
            .ok_or(IconError::MissingField("rarity"))
    }
}

/// Read-only mapping from item identifier to catalog entry.
///
/// Iteration follows key order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: BTreeMap<String, Value>,
}

impl Catalog {
    /// Parses a catalog from a JSON string. Only the top level must be an
    /// object; entries are checked when they are read.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a UTF-8 JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Result<ItemRecord, IconError>> {
        self.items.get(key).map(ItemRecord::from_value)
    }

    /// Returns an iterator over `(key, record)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<ItemRecord, IconError>)> {
        self.items
            .iter()
            .map(|(key, value)| (key.as_str(), ItemRecord::from_value(value)))
    }
}
