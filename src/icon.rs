//! Icon identifiers.
//!
//! Icons are referenced as `<prefix>:<name>`, where the prefix names an icon
//! collection on the icon endpoint (`mdi`, `game-icons`, ...) and the name
//! selects one icon from it.

use std::fmt;
use std::str::FromStr;

use crate::error::IconError;

/// A parsed `<prefix>:<name>` icon identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconId {
    /// The icon collection, e.g. `mdi`.
    pub prefix: String,
    /// The icon within the collection, e.g. `pistol`.
    pub name: String,
}

impl IconId {
    /// Parses an identifier. The input must split on `:` into exactly two
    /// segments; `mdi:pistol` is accepted, `pistol` and `a:b:c` are not.
    pub fn parse(icon: &str) -> Result<Self, IconError> {
        let mut parts = icon.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(name), None) => Ok(Self {
                prefix: prefix.to_string(),
                name: name.to_string(),
            }),
            _ => Err(IconError::MalformedIcon(icon.to_string())),
        }
    }

    /// Resource path on the icon endpoint: `/<prefix>/<name>.svg`.
    pub fn svg_path(&self) -> String {
        format!("/{}/{}.svg", self.prefix, self.name)
    }

    /// Full resource URL against `endpoint`. A trailing `/` on the endpoint
    /// is ignored.
    pub fn svg_url(&self, endpoint: &str) -> String {
        format!("{}{}", endpoint.trim_end_matches('/'), self.svg_path())
    }

    /// Output file stem: the identifier with `:` replaced by `_`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.prefix, self.name)
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.name)
    }
}

impl FromStr for IconId {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
