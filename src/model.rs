//! Abstract description of a report document.
//!
//! The types in this module describe *what* a report contains (styled text
//! blocks, tables, images and page breaks) without referencing the PDF backend.
//! The paginator produces them, the assembler wraps them into a
//! [`DocumentDescription`], and a [`crate::assemble::DocumentRenderer`] turns
//! the description into bytes. Everything here is plain data: it can be
//! compared in tests and serialized to JSON for inspection.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::assets::ImageAsset;
use crate::richtext::Span;
use crate::style::{HorizontalAlignment, Spacing, StyleDictionary, StyleKey};

/// Placeholder printed where a record has no value.
pub const PLACEHOLDER: &str = "-";

/// The printable value of a table cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl CellValue {
    /// The `-` placeholder.
    pub fn placeholder() -> Self {
        CellValue::Text(PLACEHOLDER.to_owned())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Decimal(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Decimal(value)
    }
}

/// One table cell: a value and the style it is printed with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub text: CellValue,
    pub style: StyleKey,
}

impl Cell {
    pub fn new(text: impl Into<CellValue>, style: StyleKey) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// A header cell.
    pub fn header(text: impl Into<CellValue>) -> Self {
        Self::new(text, StyleKey::TableHeader)
    }

    /// A centered body cell.
    pub fn data(text: impl Into<CellValue>) -> Self {
        Self::new(text, StyleKey::TableData)
    }
}

/// Width of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnWidth {
    /// Percentage of the available width.
    Percent(u8),
    /// Share of whatever the fixed columns leave over.
    Star,
    /// Sized to the content.
    Auto,
}

/// Inner padding of table cells in points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPadding {
    pub horizontal: f64,
    pub vertical: f64,
}

impl CellPadding {
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl Default for CellPadding {
    fn default() -> Self {
        CellPadding::new(4.0, 2.0)
    }
}

/// One table: column widths, a header row and the body rows appended so far.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub column_widths: Vec<ColumnWidth>,
    pub header_row: Vec<Cell>,
    pub body_rows: Vec<Vec<Cell>>,
    #[serde(default)]
    pub padding: CellPadding,
    #[serde(default)]
    pub margin: Spacing,
}

impl TableBlock {
    /// Creates a table with no body rows.
    pub fn new(column_widths: Vec<ColumnWidth>, header_row: Vec<Cell>) -> Self {
        Self {
            column_widths,
            header_row,
            body_rows: Vec::new(),
            padding: CellPadding::default(),
            margin: Spacing::NONE,
        }
    }

    pub fn with_padding(mut self, padding: CellPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_margin(mut self, margin: Spacing) -> Self {
        self.margin = margin;
        self
    }

    /// Appends a body row.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.body_rows.push(row);
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.body_rows.len()
    }

    pub fn has_header(&self) -> bool {
        !self.header_row.is_empty()
    }
}

/// A paragraph of spans printed with a named block style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub spans: Vec<Span>,
    pub style: StyleKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<HorizontalAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
}

impl TextBlock {
    pub fn new(spans: impl Into<Vec<Span>>, style: StyleKey) -> Self {
        Self {
            spans: spans.into(),
            style,
            alignment: None,
            margin: None,
        }
    }

    /// A block holding a single unstyled span.
    pub fn plain(text: impl Into<String>, style: StyleKey) -> Self {
        Self::new(vec![Span::new(text)], style)
    }

    /// Overrides the alignment of the block style.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Overrides the margin of the block style.
    pub fn with_margin(mut self, margin: Spacing) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// Where the bytes of an image come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// One of the images of the shared asset bundle.
    Asset(ImageAsset),
    /// Caller-supplied bytes (e.g. a rendered chart).
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

/// How an image is scaled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSize {
    /// Scale down to fit in a box of `width` x `height` points, keeping the aspect ratio.
    Fit { width: f64, height: f64 },
    /// Stretch to exactly `width` x `height` points.
    Exact { width: f64, height: f64 },
}

/// An image with sizing and alignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub source: ImageSource,
    pub size: ImageSize,
    #[serde(default)]
    pub alignment: HorizontalAlignment,
}

impl ImageBlock {
    pub fn new(source: ImageSource, size: ImageSize) -> Self {
        Self {
            source,
            size,
            alignment: HorizontalAlignment::Left,
        }
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A column of stacked text lines inside a [`ContentBlock::Columns`] row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub width: ColumnWidth,
    pub lines: Vec<TextBlock>,
}

/// Individual content blocks that make up a document body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Two images side by side, the second right aligned.
    ImageRow { left: ImageBlock, right: ImageBlock },
    /// A single image.
    Image(ImageBlock),
    /// Styled paragraph content.
    Text(TextBlock),
    /// Side by side stacks of text.
    Columns { columns: Vec<Column>, style: StyleKey },
    /// A table.
    Table(TableBlock),
    /// Empty vertical space in points.
    Spacer { height: f64 },
    /// Explicit page break request.
    PageBreak,
}

impl ContentBlock {
    pub fn text(block: TextBlock) -> Self {
        Self::Text(block)
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, ContentBlock::PageBreak)
    }

    /// The table held by this block, if any.
    pub fn as_table(&self) -> Option<&TableBlock> {
        match self {
            ContentBlock::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Footer printed on every page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageFooter {
    /// No footer.
    None,
    /// The current page number.
    PageNumber {
        alignment: HorizontalAlignment,
        /// Right margin in points.
        margin_right: f64,
    },
}

impl PageFooter {
    /// Right aligned page number, 40pt from the right edge.
    pub fn page_number() -> Self {
        PageFooter::PageNumber {
            alignment: HorizontalAlignment::Right,
            margin_right: 40.0,
        }
    }

    /// Footer text for the 1-based `page`, or `None` when no footer is printed.
    pub fn text_for(&self, page: usize) -> Option<String> {
        match self {
            PageFooter::None => None,
            PageFooter::PageNumber { .. } => Some(page.to_string()),
        }
    }
}

/// A complete document ready to be handed to a renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescription {
    pub title: String,
    pub content: Vec<ContentBlock>,
    pub styles: StyleDictionary,
    pub footer: PageFooter,
}

impl DocumentDescription {
    /// All tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.content.iter().filter_map(ContentBlock::as_table)
    }

    /// Number of explicit page breaks.
    pub fn page_break_count(&self) -> usize {
        self.content.iter().filter(|block| block.is_page_break()).count()
    }

    /// Pretty printed JSON, with image bytes encoded as base64.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Serde adapter storing byte buffers as base64 strings.
pub mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_print_like_their_source() {
        assert_eq!(CellValue::from(16usize).to_string(), "16");
        assert_eq!(CellValue::from("Ana").to_string(), "Ana");
        assert_eq!(CellValue::from(8.5).to_string(), "8.5");
        assert_eq!(CellValue::placeholder().to_string(), PLACEHOLDER);
    }

    #[test]
    fn cell_values_accept_numbers_or_strings() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"[12, 40.5, "40%"]"#).expect("values parse");
        assert_eq!(
            values,
            vec![
                CellValue::Integer(12),
                CellValue::Decimal(40.5),
                CellValue::Text("40%".to_owned())
            ]
        );
    }

    #[test]
    fn page_number_footer_is_a_function_of_the_page() {
        let footer = PageFooter::page_number();
        assert_eq!(footer.text_for(1).as_deref(), Some("1"));
        assert_eq!(footer.text_for(12).as_deref(), Some("12"));
        assert_eq!(PageFooter::None.text_for(3), None);
    }

    #[test]
    fn image_bytes_round_trip_through_base64() {
        let block = ImageBlock::new(
            ImageSource::Bytes(vec![0x89, b'P', b'N', b'G']),
            ImageSize::Exact {
                width: 520.0,
                height: 260.0,
            },
        );
        let json = serde_json::to_string(&block).expect("serializes");
        assert!(json.contains("iVBORw=="));
        let parsed: ImageBlock = serde_json::from_str(&json).expect("parses");
        assert_eq!(parsed, block);
    }
}
