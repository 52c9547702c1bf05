//! Named text styles and the per-report style dictionary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use genpdf::style::{Color, Style};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::reports::ReportType;

/// Fill color of table header rows (`#18316B`).
pub const HEADER_FILL: Rgb = Rgb(0x18, 0x31, 0x6B);

/// Text color of table header rows.
pub const HEADER_TEXT: Rgb = Rgb(0xFF, 0xFF, 0xFF);

/// An RGB color serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Converts the color into its `genpdf` representation.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Error returned when a color string is not `#RRGGBB`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidColor(String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color `{}`; expected #RRGGBB", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Horizontal placement of text and images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Justified paragraphs; the PDF backend lays these out left aligned.
    Justified,
}

impl HorizontalAlignment {
    /// Maps the alignment onto [`genpdf::Alignment`].
    pub fn to_genpdf(self) -> genpdf::Alignment {
        match self {
            HorizontalAlignment::Left | HorizontalAlignment::Justified => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Spacing around a block in points, in `[left, top, right, bottom]` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing(pub [f64; 4]);

impl Spacing {
    /// No spacing on any side.
    pub const NONE: Spacing = Spacing([0.0; 4]);

    /// Spacing above and below only.
    pub const fn vertical(top: f64, bottom: f64) -> Self {
        Spacing([0.0, top, 0.0, bottom])
    }

    pub fn left(&self) -> f64 {
        self.0[0]
    }

    pub fn top(&self) -> f64 {
        self.0[1]
    }

    pub fn right(&self) -> f64 {
        self.0[2]
    }

    pub fn bottom(&self) -> f64 {
        self.0[3]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|side| *side == 0.0)
    }
}

/// Names of the styles a document may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKey {
    /// Institution banner.
    MainHeader,
    /// Program subtitle.
    Header,
    /// Contextual sentences and label blocks.
    Text,
    /// Table header cells (white on dark blue).
    TableHeader,
    /// Centered table body cells.
    TableData,
    /// Left aligned name cells of the student list.
    TableDataName,
    /// Chart titles in the statistics report.
    StatisticsTitle,
    /// Chart descriptions in the statistics report.
    StatisticsText,
}

/// Resolved typographic attributes of a [`StyleKey`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: u8,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
    #[serde(default)]
    pub alignment: HorizontalAlignment,
    #[serde(default)]
    pub margin: Spacing,
}

impl TextStyle {
    /// A regular, left aligned style of the given size.
    pub fn sized(font_size: u8) -> Self {
        Self {
            font_size,
            bold: false,
            italic: false,
            color: None,
            fill: None,
            alignment: HorizontalAlignment::Left,
            margin: Spacing::NONE,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_margin(mut self, margin: Spacing) -> Self {
        self.margin = margin;
        self
    }

    /// Builds the `genpdf` style for this entry.
    pub fn to_style(&self) -> Style {
        let mut style = Style::new().with_font_size(self.font_size);
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        if let Some(color) = self.color {
            style.set_color(color.to_color());
        }
        style
    }
}

/// Immutable mapping from [`StyleKey`] to [`TextStyle`].
///
/// Built once per report type and shared read-only by every generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleDictionary {
    styles: BTreeMap<StyleKey, TextStyle>,
}

impl StyleDictionary {
    /// Creates a dictionary from explicit entries.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (StyleKey, TextStyle)>,
    {
        Self {
            styles: entries.into_iter().collect(),
        }
    }

    /// Returns the style registered for `key`, falling back to 10pt text.
    pub fn get(&self, key: StyleKey) -> TextStyle {
        self.styles
            .get(&key)
            .cloned()
            .unwrap_or_else(|| TextStyle::sized(10))
    }

    /// Whether `key` has an explicit entry.
    pub fn contains(&self, key: StyleKey) -> bool {
        self.styles.contains_key(&key)
    }

    /// The dictionary used by a report type.
    pub fn for_report(report: ReportType) -> Self {
        let main_header = TextStyle::sized(12)
            .bold()
            .with_alignment(HorizontalAlignment::Center)
            .with_margin(Spacing::vertical(10.0, 10.0));
        let header = TextStyle::sized(12)
            .bold()
            .with_alignment(HorizontalAlignment::Justified)
            .with_margin(Spacing::vertical(0.0, 10.0));
        let table_header = |size| {
            TextStyle::sized(size)
                .bold()
                .with_color(HEADER_TEXT)
                .with_fill(HEADER_FILL)
                .with_alignment(HorizontalAlignment::Center)
        };
        let table_data =
            |size| TextStyle::sized(size).with_alignment(HorizontalAlignment::Center);
        let text = |size| TextStyle::sized(size).with_margin(Spacing::vertical(0.0, 10.0));

        match report {
            ReportType::Administrators | ReportType::Teachers => Self::new([
                (StyleKey::MainHeader, main_header),
                (StyleKey::Header, header),
                (StyleKey::TableHeader, table_header(11)),
                (StyleKey::TableData, table_data(10)),
                (StyleKey::Text, text(12)),
            ]),
            ReportType::Periods => Self::new([
                (StyleKey::MainHeader, main_header),
                (StyleKey::Header, header),
                (StyleKey::TableHeader, table_header(12)),
                (StyleKey::TableData, table_data(10)),
                (StyleKey::Text, text(12)),
            ]),
            ReportType::TeachingHistory => Self::new([
                (StyleKey::MainHeader, main_header),
                (StyleKey::Header, header),
                (StyleKey::TableHeader, table_header(10)),
                (StyleKey::TableData, table_data(9)),
                (StyleKey::Text, text(10)),
            ]),
            ReportType::StudentList => Self::new([
                (StyleKey::MainHeader, main_header),
                (StyleKey::Header, header),
                (StyleKey::TableHeader, table_header(10)),
                (StyleKey::TableDataName, TextStyle::sized(8)),
                (StyleKey::TableData, table_data(8)),
                (StyleKey::Text, text(10)),
            ]),
            ReportType::Statistics => Self::new([
                (StyleKey::MainHeader, main_header),
                (
                    StyleKey::Header,
                    TextStyle::sized(12)
                        .bold()
                        .with_margin(Spacing::vertical(0.0, 10.0)),
                ),
                (StyleKey::StatisticsTitle, TextStyle::sized(12).bold()),
                (StyleKey::StatisticsText, TextStyle::sized(11)),
            ]),
        }
    }
}
