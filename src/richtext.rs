//! Inline styled text fragments.
//!
//! A [`Span`] carries the inline decorations the report headers need (bold,
//! italic, underline, color) on top of the block style its paragraph names.
//! Underlines are not supported by [`StyledString`], so [`StyledSpan`] keeps the
//! flag next to the converted string for the element layer to draw.

use genpdf::style::{Style, StyledString};
use serde::{Deserialize, Serialize};

use crate::style::Rgb;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "is_false")]
    underline: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Marks the span as underlined.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Assigns a color to the span.
    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color.to_color());
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span to a [`StyledString`], dropping the underline flag.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Span::new(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Span::new(text)
    }
}

/// A styled span ready to be consumed by `genpdf` elements together with the underline flag.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    /// The styled text fragment.
    pub string: StyledString,
    /// Whether the fragment should be rendered with an underline.
    pub underline: bool,
}

impl StyledSpan {
    pub fn new(string: StyledString, underline: bool) -> Self {
        Self { string, underline }
    }
}

impl From<&Span> for StyledSpan {
    fn from(span: &Span) -> Self {
        StyledSpan::new(span.to_styled_string(), span.underline)
    }
}

/// Converts a sequence of [`Span`] values into styled strings while keeping underline flags.
pub fn spans_to_styled_strings<'a, I>(spans: I) -> Vec<StyledSpan>
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(StyledSpan::from).collect()
}

/// Whether any span in the sequence needs an underline stroke.
pub fn any_underlined<'a, I>(spans: I) -> bool
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().any(Span::is_underlined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genpdf::style::Color;

    #[test]
    fn span_to_style_reflects_flags() {
        let span = Span::new("PROFESOR")
            .bold()
            .italic()
            .colored(Rgb(10, 20, 30));
        let styled = span.to_styled_string();
        assert_eq!(styled.s, "PROFESOR");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn styled_span_captures_underline_flag() {
        let spans = [Span::new("hasta "), Span::new("19 de octubre de 2026.").underline()];
        let styled = spans_to_styled_strings(&spans);
        assert!(!styled[0].underline);
        assert!(styled[1].underline);
        assert!(any_underlined(&spans));
    }

    #[test]
    fn plain_spans_serialize_compactly() {
        let json = serde_json::to_string(&Span::new("No")).expect("serializes");
        assert_eq!(json, r#"{"text":"No"}"#);
    }
}
