//! Color tables keyed by item rarity and item type.
//!
//! The rarity table colors an icon's stroke, the type table its fill. Both
//! fall back to a default color (black unless configured) for keys they do
//! not know.

use std::collections::BTreeMap;
use std::str::FromStr;

use palette::Srgb;

/// Built-in stroke colors by rarity.
pub const RARITY_COLORS: [(&str, u8, u8, u8); 5] = [
    ("common", 0xA0, 0xA0, 0xA0),
    ("uncommon", 0x27, 0xAE, 0x60),
    ("rare", 0x34, 0x98, 0xDB),
    ("epic", 0x9B, 0x59, 0xB6),
    ("legendary", 0xF3, 0x9C, 0x12),
];

/// Built-in fill colors by item type.
pub const TYPE_COLORS: [(&str, u8, u8, u8); 8] = [
    ("ranged_weapon", 0xE7, 0x4C, 0x3C),
    ("melee_weapon", 0xC0, 0x39, 0x2B),
    ("active", 0x2E, 0xCC, 0x71),
    ("consumable", 0x34, 0x98, 0xDB),
    ("throwable", 0xE6, 0x7E, 0x22),
    ("deployable", 0xF1, 0xC4, 0x0F),
    ("passive", 0x1A, 0xBC, 0x9C),
    ("special", 0xE9, 0x1E, 0x63),
];

/// Fallback for keys missing from a table: black.
pub fn default_color() -> Srgb<u8> {
    Srgb::new(0, 0, 0)
}

/// Parses `#rrggbb` (or `#rgb`, with or without the `#`).
pub fn parse_hex(value: &str) -> Option<Srgb<u8>> {
    Srgb::<u8>::from_str(value.trim()).ok()
}

/// Formats a color as uppercase `#RRGGBB`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// An immutable string-keyed color lookup with a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    colors: BTreeMap<String, Srgb<u8>>,
    default: Srgb<u8>,
}

impl ColorTable {
    fn from_entries(entries: &[(&str, u8, u8, u8)]) -> Self {
        let colors = entries
            .iter()
            .map(|&(key, r, g, b)| (key.to_string(), Srgb::new(r, g, b)))
            .collect();
        Self {
            colors,
            default: default_color(),
        }
    }

    /// The built-in rarity table.
    pub fn rarity() -> Self {
        Self::from_entries(&RARITY_COLORS)
    }

    /// The built-in item type table.
    pub fn item_type() -> Self {
        Self::from_entries(&TYPE_COLORS)
    }

    /// Returns a copy with `overrides` merged over the existing entries.
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (String, Srgb<u8>)>,
    ) -> Self {
        self.colors.extend(overrides);
        self
    }

    pub fn with_default(mut self, default: Srgb<u8>) -> Self {
        self.default = default;
        self
    }

    pub fn get(&self, key: &str) -> Option<Srgb<u8>> {
        self.colors.get(key).copied()
    }

    pub fn get_or_default(&self, key: &str) -> Srgb<u8> {
        self.get(key).unwrap_or(self.default)
    }

    /// Like [`get_or_default`](Self::get_or_default), where `None` is a key
    /// no table contains.
    pub fn lookup(&self, key: Option<&str>) -> Srgb<u8> {
        key.and_then(|key| self.get(key)).unwrap_or(self.default)
    }

    /// Hex string for `key`, falling back to the default color.
    pub fn hex(&self, key: &str) -> String {
        to_hex(self.get_or_default(key))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// The pair of tables used to paint an icon.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    /// Stroke colors, keyed by rarity.
    pub rarity: ColorTable,
    /// Fill colors, keyed by item type.
    pub item_type: ColorTable,
}

impl ColorScheme {
    /// Stroke color for a rarity.
    pub fn stroke(&self, rarity: &str) -> String {
        self.rarity.hex(rarity)
    }

    /// Fill color for an item type.
    pub fn fill(&self, item_type: &str) -> String {
        self.item_type.hex(item_type)
    }

    /// Stroke color for a rarity that may not be a usable key.
    pub fn stroke_for(&self, rarity: Option<&str>) -> String {
        to_hex(self.rarity.lookup(rarity))
    }

    /// Fill color for an item type that may not be a usable key.
    pub fn fill_for(&self, item_type: Option<&str>) -> String {
        to_hex(self.item_type.lookup(item_type))
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            rarity: ColorTable::rarity(),
            item_type: ColorTable::item_type(),
        }
    }
}
