//! Custom `genpdf` elements used by the report renderer.
//!
//! `genpdf` has no underlines, no cell backgrounds and no "fit into a box"
//! image sizing. This module adds those on top of the upstream primitives:
//! [`UnderlinedText`] lays out wrapped spans and strokes underlines below the
//! flagged ones, [`ShadedCell`] paints a filled background behind a short
//! paragraph, and [`sized_image`] scales decoded image bytes to a point box.
//! [`BoxedElement`] lets type-erased elements go back into layouts.

use genpdf::elements::{Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Margins, Mm, Position, RenderResult, Scale, Size};
use image::{DynamicImage, GenericImageView};

use crate::model::ImageSize;
use crate::richtext::StyledSpan;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;
const DEFAULT_UNDERLINE_OFFSET_MM: f64 = 0.4;
/// Spacing between background strokes; below the 1pt default line width.
const FILL_STROKE_STEP_MM: f64 = 0.3;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts PostScript points into millimeters.
pub fn pt(value: f64) -> Mm {
    mm_from_f64(value * MM_PER_INCH / POINTS_PER_INCH)
}

/// A type-erased element that can be pushed into documents and layouts.
pub struct BoxedElement(Box<dyn Element>);

impl BoxedElement {
    pub fn new(element: impl Element + 'static) -> Self {
        Self(Box::new(element))
    }
}

impl Element for BoxedElement {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.0.render(context, area, style)
    }
}

fn natural_size_mm(image: &DynamicImage) -> (f64, f64) {
    let (px_width, px_height) = image.dimensions();
    (
        MM_PER_INCH * f64::from(px_width) / DEFAULT_IMAGE_DPI,
        MM_PER_INCH * f64::from(px_height) / DEFAULT_IMAGE_DPI,
    )
}

/// Loads an image from in-memory bytes using the [`image`] crate with descriptive errors.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Composites images with an alpha channel onto a white background.
///
/// The PDF backend only embeds opaque images.
pub fn flatten_alpha(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = image::RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, alpha] = pixel.0;
        let alpha = u16::from(alpha);
        let blend = |channel: u8| {
            let value = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            value as u8
        };
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    DynamicImage::ImageRgb8(rgb)
}

/// Scale factors that bring an image of `natural` size (mm) to `size` (points).
pub fn image_scale(natural: (f64, f64), size: ImageSize) -> (f64, f64) {
    let (natural_width, natural_height) = natural;
    if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
        return (1.0, 1.0);
    }
    match size {
        ImageSize::Fit { width, height } => {
            let scale_x = mm_to_f64(pt(width)) / natural_width;
            let scale_y = mm_to_f64(pt(height)) / natural_height;
            let scale = scale_x.min(scale_y);
            (scale, scale)
        }
        ImageSize::Exact { width, height } => (
            mm_to_f64(pt(width)) / natural_width,
            mm_to_f64(pt(height)) / natural_height,
        ),
    }
}

/// Decodes `bytes` and returns an image element scaled to `size` with the given alignment.
pub fn sized_image(
    bytes: impl AsRef<[u8]>,
    size: ImageSize,
    alignment: Alignment,
) -> Result<Image, Error> {
    let decoded = flatten_alpha(decode_image_from_bytes(bytes)?);
    let (scale_x, scale_y) = image_scale(natural_size_mm(&decoded), size);
    let mut image = Image::from_dynamic_image(decoded)?;
    image.set_scale(Scale::new(scale_x, scale_y));
    image.set_alignment(alignment);
    Ok(image)
}

struct Word {
    string: StyledString,
    underline: bool,
    width: Mm,
}

/// Styled text that wraps at word boundaries and strokes underlines below the
/// flagged spans.
///
/// Lines that do not fit on the current page are carried over to the next
/// one.
pub struct UnderlinedText {
    spans: Vec<StyledSpan>,
    alignment: Alignment,
    underline_offset: Mm,
    rendered_lines: usize,
}

impl UnderlinedText {
    /// Creates a new underlined text element from the provided spans.
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self {
            spans,
            alignment: Alignment::Left,
            underline_offset: mm_from_f64(DEFAULT_UNDERLINE_OFFSET_MM),
            rendered_lines: 0,
        }
    }

    /// Sets the alignment and returns the updated element.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn words(&self, context: &genpdf::Context, style: Style) -> Vec<Word> {
        let mut words = Vec::new();
        for span in &self.spans {
            let span_style = style.and(span.string.style);
            for piece in span.string.s.split_inclusive(' ') {
                let string = StyledString::new(piece.to_owned(), span_style);
                let width = string.width(&context.font_cache);
                words.push(Word {
                    string,
                    underline: span.underline,
                    width,
                });
            }
        }
        words
    }

    fn lines(words: Vec<Word>, available: Mm) -> Vec<Vec<Word>> {
        let mut lines: Vec<Vec<Word>> = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut current_width = Mm::default();
        for word in words {
            if !current.is_empty() && current_width + word.width > available {
                lines.push(std::mem::take(&mut current));
                current_width = Mm::default();
            }
            current_width += word.width;
            current.push(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

impl Element for UnderlinedText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let words = self.words(context, style);
        let line_height = words
            .iter()
            .map(|word| word.string.style.line_height(&context.font_cache))
            .fold(style.line_height(&context.font_cache), Mm::max);
        let glyph_height = words
            .iter()
            .map(|word| {
                word.string
                    .style
                    .font(&context.font_cache)
                    .glyph_height(word.string.style.font_size())
            })
            .fold(Mm::default(), Mm::max);

        let available_width = area.size().width;
        let lines = Self::lines(words, available_width);
        let mut result = RenderResult::default();
        let mut y = Mm::default();

        for line in lines.iter().skip(self.rendered_lines) {
            if y + line_height > area.size().height {
                result.has_more = true;
                break;
            }
            let line_width = line
                .iter()
                .fold(Mm::default(), |width, word| width + word.width);
            let x_offset = match self.alignment {
                Alignment::Left => Mm::default(),
                Alignment::Center => (available_width - line_width) / 2.0,
                Alignment::Right => available_width - line_width,
            };

            match area.text_section(&context.font_cache, Position::new(x_offset, y), style) {
                Some(mut section) => {
                    for word in line {
                        section.print_str(&word.string.s, word.string.style)?;
                    }
                }
                None => {
                    result.has_more = true;
                    break;
                }
            }

            let baseline = y + glyph_height + self.underline_offset;
            let mut cursor = x_offset;
            for word in line {
                if word.underline {
                    let stroke = word.string.s.trim_end();
                    let width = if stroke.len() == word.string.s.len() {
                        word.width
                    } else {
                        StyledString::new(stroke.to_owned(), word.string.style)
                            .width(&context.font_cache)
                    };
                    let mut line_style = Style::new();
                    if let Some(color) = word.string.style.color() {
                        line_style.set_color(color);
                    }
                    area.draw_line(
                        vec![
                            Position::new(cursor, baseline),
                            Position::new(cursor + width, baseline),
                        ],
                        line_style,
                    );
                }
                cursor += word.width;
            }

            y += line_height;
            self.rendered_lines += 1;
        }

        result.size = Size::new(available_width, y);
        Ok(result)
    }
}

/// A short paragraph painted on a solid background, used for table header
/// cells.
///
/// The background height is estimated from the text width before the text is
/// printed, so it covers the cell as long as the text wraps no further than the
/// estimate. Text that does not fit continues on the next page with the fill
/// sized to the remaining lines.
pub struct ShadedCell {
    spans: Vec<StyledString>,
    paragraph: Paragraph,
    fill: Color,
    padding_x: Mm,
    padding_y: Mm,
    rendered_lines: f64,
}

impl ShadedCell {
    pub fn new(spans: Vec<StyledString>, fill: Color) -> Self {
        let mut paragraph = Paragraph::default();
        for string in &spans {
            paragraph.push(string.clone());
        }
        paragraph.set_alignment(Alignment::Center);
        Self {
            spans,
            paragraph,
            fill,
            padding_x: Mm::default(),
            padding_y: Mm::default(),
            rendered_lines: 0.0,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.paragraph.set_alignment(alignment);
        self
    }

    /// Inner padding, horizontal and vertical.
    pub fn with_padding(mut self, horizontal: Mm, vertical: Mm) -> Self {
        self.padding_x = horizontal;
        self.padding_y = vertical;
        self
    }

    fn estimated_lines(&self, context: &genpdf::Context, style: Style, width: Mm) -> f64 {
        let text_width = self
            .spans
            .iter()
            .map(|string| {
                StyledString::new(string.s.clone(), style.and(string.style))
                    .width(&context.font_cache)
            })
            .fold(Mm::default(), |total, width| total + width);
        let available = mm_to_f64(width);
        if available <= f64::EPSILON {
            return 1.0;
        }
        (mm_to_f64(text_width) / available).ceil().max(1.0)
    }

    /// Paints `height` of background as adjacent horizontal strokes.
    fn paint_fill(&self, area: &render::Area<'_>, height: Mm) {
        let style = Style::new().with_color(self.fill);
        let step = mm_from_f64(FILL_STROKE_STEP_MM);
        let width = area.size().width;
        let mut y = step / 2.0;
        while y < height {
            area.draw_line(vec![Position::new(0, y), Position::new(width, y)], style);
            y += step;
        }
    }
}

impl Element for ShadedCell {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let line_height = self
            .spans
            .iter()
            .map(|string| style.and(string.style).line_height(&context.font_cache))
            .fold(style.line_height(&context.font_cache), Mm::max);
        let outer_width = area.size().width;
        let inner_width = outer_width - self.padding_x - self.padding_x;
        let remaining = (self.estimated_lines(context, style, inner_width) - self.rendered_lines)
            .max(1.0);
        let height = line_height * remaining + self.padding_y + self.padding_y;

        let mut result = RenderResult::default();
        if area.size().height < line_height + self.padding_y + self.padding_y {
            result.has_more = true;
            return Ok(result);
        }
        let fill_height = mm_from_f64(mm_to_f64(height).min(mm_to_f64(area.size().height)));
        self.paint_fill(&area, fill_height);

        area.add_margins(Margins::trbl(
            self.padding_y,
            self.padding_x,
            self.padding_y,
            self.padding_x,
        ));
        let text = self.paragraph.render(context, area, style)?;
        self.rendered_lines += (mm_to_f64(text.size.height) / mm_to_f64(line_height)).round();

        let rendered = text.size.height + self.padding_y + self.padding_y;
        result.size = Size::new(outer_width, rendered.max(fill_height));
        result.has_more = text.has_more;
        Ok(result)
    }
}
