//! The root `<svg>` element of a fetched icon.
//!
//! Icons arrive as small SVG documents. Painting only touches attributes of
//! the root element, so the root is parsed into a typed node with named
//! fields for the attributes we rewrite, while everything inside it is kept
//! as raw markup and written back unchanged.

use std::fmt;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::IconError;

/// Pixels per `em`.
pub const EM_PX: f64 = 16.0;

/// Stroke width is the icon width divided by this.
pub const STROKE_WIDTH_DIVISOR: f64 = 32.0;

/// Thinnest stroke that still reads as an outline.
pub const MIN_STROKE_WIDTH: f64 = 1.5;

// ============================================================================
// SvgDocument
// ============================================================================

/// A parsed root `<svg>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgDocument {
    /// Qualified tag name as it appeared in the source (normally `svg`).
    pub tag: String,

    pub width: Option<String>,
    pub height: Option<String>,

    /// Read from either `viewBox` or `viewbox`, always written as `viewBox`.
    pub view_box: Option<String>,

    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub stroke_linecap: Option<String>,
    pub stroke_linejoin: Option<String>,

    /// Inline style. Removed before painting since it would override the
    /// presentation attributes.
    pub style: Option<String>,

    /// All other attributes, in source order.
    pub attributes: Vec<(String, String)>,

    /// Raw markup between the opening and closing tags.
    pub content: String,
}

impl SvgDocument {
    /// Finds the first `<svg>` element in `markup` and parses it.
    ///
    /// Anything before the element (XML declaration, comments, doctype) is
    /// skipped. Returns [`IconError::NoSvgElement`] if there is no `<svg>`.
    pub fn parse(markup: &str) -> Result<Self, IconError> {
        let mut reader = Reader::from_str(markup);
        loop {
            match reader.read_event()? {
                Event::Start(start) if start.local_name().as_ref() == b"svg" => {
                    let mut doc = Self::from_start(&start)?;
                    doc.content = reader.read_text(start.name())?.into_owned();
                    return Ok(doc);
                }
                Event::Empty(start) if start.local_name().as_ref() == b"svg" => {
                    return Self::from_start(&start);
                }
                Event::Eof => return Err(IconError::NoSvgElement),
                _ => {}
            }
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, IconError> {
        let mut doc = Self {
            tag: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Self::default()
        };

        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();

            match key.as_str() {
                "width" => doc.width = Some(value),
                "height" => doc.height = Some(value),
                "viewBox" => doc.view_box = Some(value),
                // HTML parsers lowercase attribute names; an exact `viewBox`
                // wins if both spellings are present.
                "viewbox" => {
                    if doc.view_box.is_none() {
                        doc.view_box = Some(value);
                    }
                }
                "fill" => doc.fill = Some(value),
                "stroke" => doc.stroke = Some(value),
                "stroke-width" => doc.stroke_width = Some(value),
                "stroke-linecap" => doc.stroke_linecap = Some(value),
                "stroke-linejoin" => doc.stroke_linejoin = Some(value),
                "style" => doc.style = Some(value),
                _ => doc.attributes.push((key, value)),
            }
        }

        Ok(doc)
    }

    /// Removes the inline `style` attribute. Returns true if one was present.
    pub fn strip_style(&mut self) -> bool {
        self.style.take().is_some()
    }

    /// Rewrites `width` and `height` as unit-less pixel values.
    ///
    /// An `em` width (and its height) is scaled by [`EM_PX`]. A `viewBox`
    /// then takes precedence: its third and fourth components become the
    /// width and height, replacing any em-derived values.
    pub fn normalize_dimensions(&mut self) -> Result<(), IconError> {
        if let Some(width) = self.width.as_deref().filter(|w| w.contains("em")) {
            let width = em_to_px("width", width)?;
            let height = match self.height.as_deref() {
                Some(height) => em_to_px("height", height)?,
                None => return Err(IconError::MissingAttribute("height")),
            };
            debug!(width, height, "converted em dimensions to pixels");
            self.width = Some(format_number(width));
            self.height = Some(format_number(height));
        }

        if let Some(view_box) = self.view_box.as_deref() {
            let (width, height) = view_box_size(view_box)?;
            debug!(view_box, "taking dimensions from viewBox");
            self.width = Some(width);
            self.height = Some(height);
        }

        Ok(())
    }

    /// The `width` attribute as a number.
    pub fn width_px(&self) -> Result<f64, IconError> {
        let width = self
            .width
            .as_deref()
            .ok_or(IconError::MissingAttribute("width"))?;
        parse_number("width", width)
    }

    /// Sets fill and stroke colors, and a stroke width proportional to the
    /// icon width with a floor of [`MIN_STROKE_WIDTH`]. Line caps and joins
    /// are rounded.
    ///
    /// Call after [`normalize_dimensions`](Self::normalize_dimensions).
    pub fn apply_colors(&mut self, fill: &str, stroke: &str) -> Result<(), IconError> {
        let stroke_width = stroke_width_for(self.width_px()?);

        self.stroke = Some(stroke.to_string());
        self.stroke_width = Some(format_number(stroke_width));
        self.stroke_linecap = Some("round".to_string());
        self.stroke_linejoin = Some("round".to_string());
        self.fill = Some(fill.to_string());
        Ok(())
    }

    /// Strips inline styles, normalizes dimensions and applies colors.
    pub fn paint(&mut self, fill: &str, stroke: &str) -> Result<(), IconError> {
        self.strip_style();
        self.normalize_dimensions()?;
        self.apply_colors(fill, stroke)
    }

    /// Serializes the element back to markup.
    pub fn to_markup(&self) -> String {
        self.to_string()
    }

    /// Attributes in output order: untouched attributes first, then the
    /// ones this type manages.
    fn output_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        let managed = [
            ("width", &self.width),
            ("height", &self.height),
            ("viewBox", &self.view_box),
            ("style", &self.style),
            ("fill", &self.fill),
            ("stroke", &self.stroke),
            ("stroke-width", &self.stroke_width),
            ("stroke-linecap", &self.stroke_linecap),
            ("stroke-linejoin", &self.stroke_linejoin),
        ];

        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .chain(
                managed
                    .into_iter()
                    .filter_map(|(key, value)| value.as_deref().map(|value| (key, value))),
            )
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (key, value) in self.output_attributes() {
            write!(f, " {}=\"{}\"", key, escape(value))?;
        }
        write!(f, ">{}</{}>", self.content, self.tag)
    }
}

// ============================================================================
// Dimension helpers
// ============================================================================

/// `max(width / 32, 1.5)`.
pub fn stroke_width_for(width: f64) -> f64 {
    (width / STROKE_WIDTH_DIVISOR).max(MIN_STROKE_WIDTH)
}

fn em_to_px(attribute: &'static str, value: &str) -> Result<f64, IconError> {
    Ok(parse_number(attribute, &value.replace("em", ""))? * EM_PX)
}

fn parse_number(attribute: &'static str, value: &str) -> Result<f64, IconError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| IconError::InvalidDimension {
            attribute,
            value: value.to_string(),
        })
}

/// Width and height tokens of a `min-x min-y width height` viewBox.
fn view_box_size(view_box: &str) -> Result<(String, String), IconError> {
    let mut tokens = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .skip(2);
    match (tokens.next(), tokens.next()) {
        (Some(width), Some(height)) => Ok((width.to_string(), height.to_string())),
        _ => Err(IconError::InvalidViewBox(view_box.to_string())),
    }
}

/// Formats without a trailing `.0` for whole numbers (`32`, `1.5`).
fn format_number(value: f64) -> String {
    format!("{value}")
}

// ============================================================================
// Tests
// ============================================================================
