//! item-icon-painter: Colors game item icons by rarity and type
//!
//! This crate reads an item catalog, fetches each item's icon as SVG from
//! an Iconify-compatible endpoint, and writes a painted copy: the fill
//! follows the item type, the stroke follows the rarity.
//!
//! # Example
//!
//! ```no_run
//! use item_icon_painter::{Catalog, Config};
//!
//! let config = Config::default();
//! let catalog = Catalog::load(&config.catalog).unwrap();
//! let report = config.painter().unwrap().run(&catalog);
//!
//! for (outcome, error) in report.failures() {
//!     eprintln!("{}: {}", outcome.name, error);
//! }
//! ```
//!
//! # Painting without the network
//!
//! Anything implementing [`IconSource`] can feed the painter:
//!
//! ```
//! use item_icon_painter::{IconError, IconId, IconPainter, IconSource, ItemRecord};
//!
//! struct Fixed;
//!
//! impl IconSource for Fixed {
//!     fn fetch_svg(&self, _icon: &IconId) -> Result<String, IconError> {
//!         Ok(r#"<svg width="2em" height="2em"></svg>"#.to_string())
//!     }
//! }
//!
//! let dir = std::env::temp_dir().join("item-icon-painter-doc");
//! let painter = IconPainter::new(Fixed, &dir);
//! let record = ItemRecord {
//!     name: Some("Sword".into()),
//!     icon: Some("mdi:sword".into()),
//!     item_type: Some("melee_weapon".into()),
//!     rarity: Some("epic".into()),
//! };
//!
//! let saved = painter.paint_record(&record).unwrap();
//! assert!(saved.svg.ends_with("mdi_sword.svg"));
//! ```

mod catalog;
mod colors;
mod config;
mod error;
mod icon;
mod pipeline;
mod raster;
mod source;
mod svg;

pub use catalog::{Catalog, ItemRecord, UNKNOWN_NAME};
pub use colors::{
    ColorScheme, ColorTable, RARITY_COLORS, TYPE_COLORS, default_color, parse_hex, to_hex,
};
pub use config::Config;
pub use error::{CatalogError, ConfigError, IconError};
pub use icon::IconId;
pub use pipeline::{BatchReport, IconPainter, RecordOutcome, SavedIcon};
pub use raster::{render_png, render_svg};
pub use source::{DEFAULT_ENDPOINT, HttpIconSource, IconSource};
pub use svg::{EM_PX, MIN_STROKE_WIDTH, STROKE_WIDTH_DIVISOR, SvgDocument, stroke_width_for};
