//! Error types for catalog loading, configuration and per-record processing.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single catalog record produced no output.
///
/// None of these abort a batch: [`IconPainter::run`](crate::IconPainter::run)
/// records the error against the item and moves on.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("malformed icon identifier `{0}`: expected `<prefix>:<name>`")]
    MalformedIcon(String),

    #[error("record is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("icon request to {url} failed with status {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("icon request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response contains no <svg> element")]
    NoSvgElement,

    #[error("malformed svg markup: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed svg attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("svg has no `{0}` attribute")]
    MissingAttribute(&'static str),

    #[error("invalid `{attribute}` value `{value}`")]
    InvalidDimension {
        attribute: &'static str,
        value: String,
    },

    #[error("viewBox `{0}` does not have four components")]
    InvalidViewBox(String),

    #[error("failed to render png preview: {0}")]
    Render(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load the item catalog. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not a JSON object of item records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to load or validate runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid color `{value}` for `{key}`")]
    InvalidColor { key: String, value: String },

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
