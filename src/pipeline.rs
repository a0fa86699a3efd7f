//! The per-record paint pipeline and batch runner.
//!
//! For each catalog record: parse the icon identifier, fetch the SVG,
//! parse its root element, strip inline styles, normalize dimensions,
//! apply the item's colors and write the result. A failing record is
//! logged and skipped; it never stops the batch.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::catalog::{Catalog, ItemRecord, UNKNOWN_NAME};
use crate::colors::ColorScheme;
use crate::error::IconError;
use crate::icon::IconId;
use crate::raster;
use crate::source::IconSource;
use crate::svg::SvgDocument;

// ============================================================================
// Outcomes
// ============================================================================

/// Files written for one successfully painted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedIcon {
    pub svg: PathBuf,
    /// Present only when PNG previews are enabled.
    pub png: Option<PathBuf>,
}

/// The result of processing one catalog record.
#[derive(Debug)]
pub struct RecordOutcome {
    /// Catalog key of the record.
    pub key: String,
    /// Item name, or a placeholder if the record has none.
    pub name: String,
    pub result: Result<SavedIcon, IconError>,
}

impl RecordOutcome {
    pub fn is_saved(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-record outcomes of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.saved()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&RecordOutcome, &IconError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn saved_icons(&self) -> impl Iterator<Item = &SavedIcon> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

// ============================================================================
// IconPainter
// ============================================================================

/// Fetches, paints and saves item icons.
///
/// # Example
///
/// ```no_run
/// use item_icon_painter::{Catalog, DEFAULT_ENDPOINT, HttpIconSource, IconPainter};
///
/// let catalog = Catalog::load("items.json").unwrap();
/// let source = HttpIconSource::new(DEFAULT_ENDPOINT, None).unwrap();
/// let report = IconPainter::new(source, "icons").run(&catalog);
/// println!("{} saved, {} skipped", report.saved(), report.failed());
/// ```
pub struct IconPainter<S> {
    source: S,
    colors: ColorScheme,
    output_dir: PathBuf,
    png_size: Option<u32>,
}

impl<S: IconSource> IconPainter<S> {
    /// Creates a painter with the built-in color tables and no PNG previews.
    pub fn new(source: S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            colors: ColorScheme::default(),
            output_dir: output_dir.into(),
            png_size: None,
        }
    }

    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }

    /// Also writes a `size x size` PNG next to each SVG.
    pub fn with_png_size(mut self, size: Option<u32>) -> Self {
        self.png_size = size;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    /// Paints a single record and writes its files.
    ///
    /// The record is validated before any request is made. Files are staged
    /// next to their targets and only moved into place once every step has
    /// succeeded, so a failure leaves existing output untouched.
    pub fn paint_record(&self, record: &ItemRecord) -> Result<SavedIcon, IconError> {
        let icon = IconId::parse(record.icon()?)?;
        let fill = self.colors.fill_for(record.item_type()?);
        let stroke = self.colors.stroke_for(record.rarity()?);

        let markup = self.source.fetch_svg(&icon)?;
        let mut svg = SvgDocument::parse(&markup)?;
        svg.paint(&fill, &stroke)?;
        let markup = svg.to_markup();

        let png = self
            .png_size
            .map(|size| raster::render_png(&markup, size))
            .transpose()?;

        let stem = icon.file_stem();
        let svg_path = self.output_dir.join(format!("{stem}.svg"));
        let staged_svg = stage_file(&svg_path, markup.as_bytes())?;

        let png_path = match png {
            Some(bytes) => {
                let png_path = self.output_dir.join(format!("{stem}.png"));
                let staged_png = stage_file(&png_path, &bytes)?;
                commit_file(staged_png, &png_path)?;
                Some(png_path)
            }
            None => None,
        };
        commit_file(staged_svg, &svg_path)?;

        Ok(SavedIcon {
            svg: svg_path,
            png: png_path,
        })
    }

    /// Processes every record in catalog order.
    pub fn run(&self, catalog: &Catalog) -> BatchReport {
        let mut report = BatchReport::default();

        for (key, record) in catalog.iter() {
            let (name, result) = match record {
                Ok(record) => (record.display_name().to_string(), self.paint_record(&record)),
                Err(e) => (UNKNOWN_NAME.to_string(), Err(e)),
            };
            match &result {
                Ok(saved) => info!(item = %name, path = %saved.svg.display(), "saved icon"),
                Err(e) => warn!(item = %name, key, error = %e, "skipping icon"),
            }
            report.outcomes.push(RecordOutcome {
                key: key.to_string(),
                name,
                result,
            });
        }

        info!(
            saved = report.saved(),
            skipped = report.failed(),
            "finished painting icons"
        );
        report
    }
}

fn write_error(path: &Path, source: io::Error) -> IconError {
    IconError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `contents` to a temporary file in the directory of `path`,
/// creating the directory if needed. Dropping the result removes the file.
fn stage_file(path: &Path, contents: &[u8]) -> Result<NamedTempFile, IconError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_error(path, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    file.write_all(contents).map_err(|e| write_error(path, e))?;
    Ok(file)
}

/// Moves a staged file over `path`.
fn commit_file(staged: NamedTempFile, path: &Path) -> Result<(), IconError> {
    staged
        .persist(path)
        .map(drop)
        .map_err(|e| write_error(path, e.error))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const PISTOL_SVG: &str = concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="1em" height="1em" "#,
        r#"viewBox="0 0 24 24" style="color: red">"#,
        r#"<path fill="currentColor" d="M7 5h14v4"/></svg>"#,
    );
    const BIG_SVG: &str = r#"<svg width="6em" height="6em"><circle cx="48" cy="48" r="40"/></svg>"#;

    /// In-memory icon source that records every request.
    #[derive(Default)]
    struct FakeSource {
        icons: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with(mut self, icon: &str, svg: &str) -> Self {
            self.icons.insert(icon.to_string(), svg.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl IconSource for FakeSource {
        fn fetch_svg(&self, icon: &IconId) -> Result<String, IconError> {
            self.requests.borrow_mut().push(icon.to_string());
            self.icons
                .get(&icon.to_string())
                .cloned()
                .ok_or_else(|| IconError::FetchStatus {
                    url: icon.svg_path(),
                    status: 404,
                })
        }
    }

    fn record(icon: &str, item_type: &str, rarity: &str) -> ItemRecord {
        ItemRecord {
            name: Some(icon.into()),
            icon: Some(icon.into()),
            item_type: Some(item_type.into()),
            rarity: Some(rarity.into()),
        }
    }

    fn painter_with(icon: &str, svg: &str, dir: &Path) -> IconPainter<FakeSource> {
        IconPainter::new(FakeSource::default().with(icon, svg), dir)
    }

    fn attr<'a>(markup: &'a str, name: &str) -> Option<&'a str> {
        let needle = format!(" {name}=\"");
        let start = markup.find(&needle)? + needle.len();
        let len = markup[start..].find('"')?;
        Some(&markup[start..start + len])
    }

    #[test]
    fn paints_and_saves_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let painter = painter_with("mdi:pistol", PISTOL_SVG, dir.path());

        let saved = painter
            .paint_record(&record("mdi:pistol", "ranged_weapon", "legendary"))
            .unwrap();

        assert_eq!(saved.svg, dir.path().join("mdi_pistol.svg"));
        assert_eq!(saved.png, None);

        let markup = fs::read_to_string(&saved.svg).unwrap();
        assert!(markup.starts_with("<svg"));
        assert!(!markup.contains("style="));
        assert_eq!(attr(&markup, "width"), Some("24"));
        assert_eq!(attr(&markup, "height"), Some("24"));
        assert_eq!(attr(&markup, "fill"), Some("#E74C3C"));
        assert_eq!(attr(&markup, "stroke"), Some("#F39C12"));
        assert_eq!(attr(&markup, "stroke-width"), Some("1.5"));
    }

    #[test]
    fn unknown_type_and_rarity_paint_black() {
        let dir = tempfile::tempdir().unwrap();
        let painter = painter_with("mdi:ghost", BIG_SVG, dir.path());

        let saved = painter
            .paint_record(&record("mdi:ghost", "unknown_type", "unknown_rarity"))
            .unwrap();

        let markup = fs::read_to_string(saved.svg).unwrap();
        assert_eq!(attr(&markup, "fill"), Some("#000000"));
        assert_eq!(attr(&markup, "stroke"), Some("#000000"));
        // 6em = 96px, so the stroke scales to 96 / 32.
        assert_eq!(attr(&markup, "width"), Some("96"));
        assert_eq!(attr(&markup, "stroke-width"), Some("3"));
    }

    #[test]
    fn malformed_icon_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default();
        let painter = IconPainter::new(&source, dir.path());

        for icon in ["pistol", "mdi:pistol:extra"] {
            let err = painter
                .paint_record(&record(icon, "ranged_weapon", "common"))
                .unwrap_err();
            assert!(matches!(err, IconError::MalformedIcon(_)));
        }

        assert!(source.requests().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_type_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default().with("mdi:pistol", PISTOL_SVG);
        let painter = IconPainter::new(&source, dir.path());

        let mut incomplete = record("mdi:pistol", "ranged_weapon", "common");
        incomplete.item_type = None;

        assert!(matches!(
            painter.paint_record(&incomplete),
            Err(IconError::MissingField("type"))
        ));
        assert!(source.requests().is_empty());
    }

    #[test]
    fn fetch_and_parse_failures_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default().with("mdi:broken", "<html>oops</html>");
        let painter = IconPainter::new(&source, dir.path());

        assert!(matches!(
            painter.paint_record(&record("mdi:missing", "active", "rare")),
            Err(IconError::FetchStatus { status: 404, .. })
        ));
        assert!(matches!(
            painter.paint_record(&record("mdi:broken", "active", "rare")),
            Err(IconError::NoSvgElement)
        ));

        assert_eq!(source.requests(), ["mdi:missing", "mdi:broken"]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failing_records_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default()
            .with("mdi:pistol", PISTOL_SVG)
            .with("mdi:medication", BIG_SVG);
        let painter = IconPainter::new(&source, dir.path().join("icons"));

        let catalog = Catalog::from_json(
            r#"{
                "a_bad": { "name": "bad", "icon": "no-colon", "type": "active", "rarity": "rare" },
                "b_missing": {
                    "name": "missing", "icon": "mdi:missing",
                    "type": "active", "rarity": "rare"
                },
                "c_pistol": {
                    "name": "pistol", "icon": "mdi:pistol",
                    "type": "ranged_weapon", "rarity": "common"
                },
                "d_medkit": {
                    "name": "medkit", "icon": "mdi:medication",
                    "type": "consumable", "rarity": "uncommon"
                }
            }"#,
        )
        .unwrap();

        let report = painter.run(&catalog);

        assert_eq!(report.saved(), 2);
        assert_eq!(report.failed(), 2);
        let failed: Vec<_> = report.failures().map(|(o, _)| o.name.as_str()).collect();
        assert_eq!(failed, ["bad", "missing"]);

        let saved: Vec<_> = report.saved_icons().map(|icon| icon.svg.clone()).collect();
        assert_eq!(
            saved,
            [
                dir.path().join("icons/mdi_pistol.svg"),
                dir.path().join("icons/mdi_medication.svg"),
            ]
        );
        assert!(saved.iter().all(|path| path.is_file()));
        assert_eq!(fs::read_dir(dir.path().join("icons")).unwrap().count(), 2);
        assert_eq!(source.requests(), ["mdi:missing", "mdi:pistol", "mdi:medication"]);
    }

    #[test]
    fn badly_typed_catalog_entries_are_skipped_individually() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default()
            .with("mdi:pistol", PISTOL_SVG)
            .with("mdi:fire", BIG_SVG);
        let painter = IconPainter::new(&source, dir.path());

        let catalog = Catalog::from_json(
            r#"{
                "bad_icon": { "name": "claw", "icon": 42, "type": "special", "rarity": "epic" },
                "fire": { "name": "fire", "icon": "mdi:fire", "type": 3, "rarity": ["rare"] },
                "pistol": {
                    "name": "pistol", "icon": "mdi:pistol",
                    "type": "ranged_weapon", "rarity": "rare"
                },
                "version": 2
            }"#,
        )
        .unwrap();

        let report = painter.run(&catalog);

        assert_eq!(report.saved(), 2);
        let failed: Vec<_> = report.failures().map(|(o, _)| o.key.as_str()).collect();
        assert_eq!(failed, ["bad_icon", "version"]);
        assert!(
            report
                .failures()
                .all(|(_, e)| matches!(e, IconError::InvalidRecord(_)))
        );

        let pistol = fs::read_to_string(dir.path().join("mdi_pistol.svg")).unwrap();
        assert_eq!(attr(&pistol, "fill"), Some("#E74C3C"));

        // Non-string type and rarity paint with the default color.
        let fire = fs::read_to_string(dir.path().join("mdi_fire.svg")).unwrap();
        assert_eq!(attr(&fire, "fill"), Some("#000000"));
        assert_eq!(attr(&fire, "stroke"), Some("#000000"));

        assert_eq!(source.requests(), ["mdi:fire", "mdi:pistol"]);
    }

    #[test]
    fn rerun_produces_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let painter = painter_with("mdi:pistol", PISTOL_SVG, dir.path());
        let catalog = Catalog::from_json(
            r#"{
                "pistol": {
                    "name": "pistol", "icon": "mdi:pistol",
                    "type": "ranged_weapon", "rarity": "epic"
                }
            }"#,
        )
        .unwrap();

        painter.run(&catalog);
        let first = fs::read(dir.path().join("mdi_pistol.svg")).unwrap();
        painter.run(&catalog);
        let second = fs::read(dir.path().join("mdi_pistol.svg")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn writes_png_preview_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let painter = painter_with("mdi:pistol", PISTOL_SVG, dir.path()).with_png_size(Some(48));

        let saved = painter
            .paint_record(&record("mdi:pistol", "ranged_weapon", "rare"))
            .unwrap();

        use image::GenericImageView;

        let png_path = saved.png.unwrap();
        assert_eq!(png_path, dir.path().join("mdi_pistol.png"));
        let image = image::open(&png_path).unwrap();
        assert_eq!((image.width(), image.height()), (48, 48));
    }

    #[test]
    fn failed_png_write_keeps_previous_svg() {
        let dir = tempfile::tempdir().unwrap();
        let svg_path = dir.path().join("mdi_pistol.svg");
        fs::write(&svg_path, "previous").unwrap();
        // A directory in the way makes moving the PNG into place fail.
        fs::create_dir(dir.path().join("mdi_pistol.png")).unwrap();
        fs::write(dir.path().join("mdi_pistol.png/keep"), "").unwrap();

        let painter = painter_with("mdi:pistol", PISTOL_SVG, dir.path()).with_png_size(Some(48));
        let err = painter
            .paint_record(&record("mdi:pistol", "ranged_weapon", "rare"))
            .unwrap_err();

        assert!(matches!(
            err,
            IconError::Write { ref path, .. } if path.ends_with("mdi_pistol.png")
        ));
        assert_eq!(fs::read_to_string(&svg_path).unwrap(), "previous");
        // No staged files are left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn custom_colors_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let colors = ColorScheme {
            rarity: crate::colors::ColorTable::rarity()
                .with_default(palette::Srgb::new(0x12, 0x34, 0x56)),
            ..ColorScheme::default()
        };
        let painter = painter_with("mdi:pistol", PISTOL_SVG, dir.path()).with_colors(colors);
        assert_eq!(painter.colors().stroke("mythic"), "#123456");

        let saved = painter
            .paint_record(&record("mdi:pistol", "ranged_weapon", "mythic"))
            .unwrap();
        let markup = fs::read_to_string(saved.svg).unwrap();
        assert_eq!(attr(&markup, "stroke"), Some("#123456"));
    }
}
