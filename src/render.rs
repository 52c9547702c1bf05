//! `genpdf` backend for [`DocumentDescription`]s.

use genpdf::elements::{
    FrameCellDecorator, LinearLayout, PageBreak, Paragraph, TableLayout,
};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{Element, Margins, Mm, PageDecorator, PaperSize, Position};
use log::debug;

use crate::assemble::DocumentRenderer;
use crate::assets::AssetBundle;
use crate::config::ReportConfig;
use crate::elements::{pt, sized_image, BoxedElement, ShadedCell, UnderlinedText};
use crate::error::Result;
use crate::model::{
    Cell, CellPadding, Column, ColumnWidth, ContentBlock, DocumentDescription, ImageBlock,
    ImageSize, ImageSource, PageFooter, TableBlock, TextBlock,
};
use crate::richtext::{any_underlined, spans_to_styled_strings};
use crate::style::{Spacing, StyleDictionary};

const DEFAULT_FONT_SIZE: u8 = 10;
const FOOTER_HEIGHT_PT: f64 = 20.0;
const A4_WIDTH_PT: f64 = 595.28;
const AUTO_COLUMN_WEIGHT: usize = 6;
const MIN_STAR_WEIGHT: usize = 10;

/// Renders documents with the fonts and images of an [`AssetBundle`].
///
/// The renderer only reads the bundle; a single instance can be shared across
/// threads and concurrent generations.
#[derive(Clone, Debug)]
pub struct GenpdfRenderer {
    assets: AssetBundle,
    page_margin_pt: f64,
}

impl GenpdfRenderer {
    pub fn new(assets: AssetBundle) -> Self {
        Self {
            assets,
            page_margin_pt: ReportConfig::default().page_margin_pt,
        }
    }

    /// Renderer using the page margins of `config`.
    pub fn from_config(assets: AssetBundle, config: &ReportConfig) -> Self {
        Self::new(assets).with_page_margin(config.page_margin_pt)
    }

    pub fn with_page_margin(mut self, margin_pt: f64) -> Self {
        self.page_margin_pt = margin_pt;
        self
    }

    fn image_bytes<'a>(&'a self, block: &'a ImageBlock) -> &'a [u8] {
        match &block.source {
            ImageSource::Asset(asset) => self.assets.image(*asset),
            ImageSource::Bytes(bytes) => bytes,
        }
    }

    fn content_width_pt(&self) -> f64 {
        A4_WIDTH_PT - 2.0 * self.page_margin_pt
    }

    fn image(&self, block: &ImageBlock) -> std::result::Result<genpdf::elements::Image, Error> {
        sized_image(
            self.image_bytes(block),
            clamp_width(block.size, self.content_width_pt()),
            block.alignment.to_genpdf(),
        )
    }

    fn element(
        &self,
        block: &ContentBlock,
        styles: &StyleDictionary,
    ) -> std::result::Result<BoxedElement, Error> {
        let element = match block {
            ContentBlock::ImageRow { left, right } => {
                let mut row = TableLayout::new(vec![1, 1]);
                row.row()
                    .element(self.image(left)?)
                    .element(self.image(right)?)
                    .push()?;
                BoxedElement::new(row)
            }
            ContentBlock::Image(image) => BoxedElement::new(self.image(image)?),
            ContentBlock::Text(text) => text_element(text, styles),
            ContentBlock::Columns { columns, style } => {
                let margin = styles.get(*style).margin;
                BoxedElement::new(columns_element(columns, styles)?.padded(margins(margin)))
            }
            ContentBlock::Table(table) => table_element(table, styles)?,
            ContentBlock::Spacer { height } => BoxedElement::new(
                LinearLayout::vertical().padded(Margins::trbl(pt(*height), 0, 0, 0)),
            ),
            ContentBlock::PageBreak => BoxedElement::new(PageBreak::new()),
        };
        Ok(element)
    }
}

impl DocumentRenderer for GenpdfRenderer {
    fn render(&self, doc: &DocumentDescription) -> Result<Vec<u8>> {
        let font_family = self.assets.font_family()?;
        let mut document = genpdf::Document::new(font_family);
        document.set_title(doc.title.as_str());
        document.set_paper_size(PaperSize::A4);
        document.set_font_size(DEFAULT_FONT_SIZE);
        document.set_page_decorator(ReportPageDecorator::new(
            pt(self.page_margin_pt),
            doc.footer.clone(),
            self.page_margin_pt,
        ));

        for block in &doc.content {
            document.push(self.element(block, &doc.styles)?);
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        debug!(
            "Rendered '{}' with {} blocks into {} bytes",
            doc.title,
            doc.content.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn margins(spacing: Spacing) -> Margins {
    Margins::trbl(
        pt(spacing.top()),
        pt(spacing.right()),
        pt(spacing.bottom()),
        pt(spacing.left()),
    )
}

/// Shrinks `size` to at most `max_width` points, keeping its proportions.
fn clamp_width(size: ImageSize, max_width: f64) -> ImageSize {
    match size {
        ImageSize::Exact { width, height } if width > max_width && max_width > 0.0 => {
            ImageSize::Exact {
                width: max_width,
                height: height * max_width / width,
            }
        }
        ImageSize::Fit { width, height } if width > max_width && max_width > 0.0 => {
            ImageSize::Fit {
                width: max_width,
                height,
            }
        }
        other => other,
    }
}

fn text_element(block: &TextBlock, styles: &StyleDictionary) -> BoxedElement {
    let style = styles.get(block.style);
    let alignment = block.alignment.unwrap_or(style.alignment).to_genpdf();
    let margin = block.margin.unwrap_or(style.margin);

    if any_underlined(&block.spans) {
        let text = UnderlinedText::new(spans_to_styled_strings(&block.spans))
            .with_alignment(alignment)
            .styled(style.to_style())
            .padded(margins(margin));
        BoxedElement::new(text)
    } else {
        let mut paragraph = Paragraph::default();
        for span in &block.spans {
            paragraph.push(span.to_styled_string());
        }
        paragraph.set_alignment(alignment);
        BoxedElement::new(paragraph.styled(style.to_style()).padded(margins(margin)))
    }
}

/// Relative column weights for `TableLayout`.
///
/// Percent columns keep their share, `auto` columns get a narrow fixed share
/// and `*` columns split what is left.
pub fn column_weights(widths: &[ColumnWidth]) -> Vec<usize> {
    let fixed: usize = widths
        .iter()
        .map(|width| match width {
            ColumnWidth::Percent(percent) => usize::from(*percent),
            _ => 0,
        })
        .sum();
    let autos = widths
        .iter()
        .filter(|width| matches!(width, ColumnWidth::Auto))
        .count();
    let stars = widths
        .iter()
        .filter(|width| matches!(width, ColumnWidth::Star))
        .count();

    let remaining = 100usize
        .saturating_sub(fixed)
        .saturating_sub(autos * AUTO_COLUMN_WEIGHT);
    let star = if stars == 0 {
        0
    } else {
        (remaining / stars).max(MIN_STAR_WEIGHT)
    };

    widths
        .iter()
        .map(|width| match width {
            ColumnWidth::Percent(percent) => usize::from(*percent).max(1),
            ColumnWidth::Auto => AUTO_COLUMN_WEIGHT,
            ColumnWidth::Star => star,
        })
        .collect()
}

fn cell_element(cell: &Cell, padding: CellPadding, styles: &StyleDictionary) -> BoxedElement {
    let style = styles.get(cell.style);
    let alignment = style.alignment.to_genpdf();
    let text = cell.text.to_string();
    let (horizontal, vertical) = (pt(padding.horizontal), pt(padding.vertical));

    match style.fill {
        Some(fill) => BoxedElement::new(
            ShadedCell::new(
                vec![genpdf::style::StyledString::new(text, Style::new())],
                fill.to_color(),
            )
            .with_alignment(alignment)
            .with_padding(horizontal, vertical)
            .styled(style.to_style()),
        ),
        None => {
            let mut paragraph = Paragraph::new(text);
            paragraph.set_alignment(alignment);
            BoxedElement::new(
                paragraph
                    .styled(style.to_style())
                    .padded(Margins::trbl(vertical, horizontal, vertical, horizontal)),
            )
        }
    }
}

fn table_element(
    table: &TableBlock,
    styles: &StyleDictionary,
) -> std::result::Result<BoxedElement, Error> {
    let mut layout = TableLayout::new(column_weights(&table.column_widths));
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let rows = table
        .has_header()
        .then_some(&table.header_row)
        .into_iter()
        .chain(table.body_rows.iter());
    for cells in rows {
        let mut row = layout.row();
        for cell in cells {
            row = row.element(cell_element(cell, table.padding, styles));
        }
        row.push()?;
    }

    if table.margin.is_zero() {
        Ok(BoxedElement::new(layout))
    } else {
        Ok(BoxedElement::new(layout.padded(margins(table.margin))))
    }
}

fn columns_element(
    columns: &[Column],
    styles: &StyleDictionary,
) -> std::result::Result<TableLayout, Error> {
    let widths: Vec<ColumnWidth> = columns.iter().map(|column| column.width).collect();
    let mut layout = TableLayout::new(column_weights(&widths));
    let mut row = layout.row();
    for column in columns {
        let mut stack = LinearLayout::vertical();
        for line in &column.lines {
            stack.push(text_element(line, styles));
        }
        row = row.element(stack);
    }
    row.push()?;
    Ok(layout)
}

/// Applies the page margins and prints the footer of every page.
struct ReportPageDecorator {
    page: usize,
    margins: Margins,
    footer: PageFooter,
    page_margin_pt: f64,
}

impl ReportPageDecorator {
    fn new(margin: Mm, footer: PageFooter, page_margin_pt: f64) -> Self {
        Self {
            page: 0,
            margins: Margins::all(margin),
            footer,
            page_margin_pt,
        }
    }

    fn footer_element(&self, text: String) -> impl Element {
        let mut paragraph = Paragraph::new(text);
        let mut right = 0.0;
        if let PageFooter::PageNumber {
            alignment,
            margin_right,
        } = &self.footer
        {
            paragraph.set_alignment(alignment.to_genpdf());
            right = (margin_right - self.page_margin_pt).max(0.0);
        }
        paragraph.padded(Margins::trbl(0, pt(right), 0, 0))
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);

        if let Some(text) = self.footer.text_for(self.page) {
            let height = pt(FOOTER_HEIGHT_PT);
            let available = area.size().height;
            if height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - height));
            let mut element = self.footer_element(text);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_columns_keep_their_share() {
        let weights = column_weights(&[
            ColumnWidth::Percent(5),
            ColumnWidth::Percent(35),
            ColumnWidth::Percent(35),
            ColumnWidth::Percent(15),
            ColumnWidth::Percent(10),
        ]);
        assert_eq!(weights, vec![5, 35, 35, 15, 10]);
    }

    #[test]
    fn star_takes_what_is_left() {
        let weights = column_weights(&[
            ColumnWidth::Percent(5),
            ColumnWidth::Star,
            ColumnWidth::Auto,
            ColumnWidth::Auto,
            ColumnWidth::Percent(15),
        ]);
        assert_eq!(weights, vec![5, 68, 6, 6, 15]);
    }

    #[test]
    fn wide_charts_shrink_to_the_content_width() {
        let clamped = clamp_width(
            ImageSize::Exact {
                width: 520.0,
                height: 260.0,
            },
            515.28,
        );
        match clamped {
            ImageSize::Exact { width, height } => {
                assert!((width - 515.28).abs() < 1e-9);
                assert!((width / height - 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected size {other:?}"),
        }

        let logo = ImageSize::Fit {
            width: 100.0,
            height: 100.0,
        };
        assert_eq!(clamp_width(logo, 515.28), logo);
    }

    #[test]
    fn star_never_collapses() {
        let mut widths = vec![ColumnWidth::Percent(5), ColumnWidth::Star];
        widths.extend(std::iter::repeat(ColumnWidth::Auto).take(20));
        widths.push(ColumnWidth::Percent(15));
        let weights = column_weights(&widths);
        assert_eq!(weights[1], MIN_STAR_WEIGHT);
        assert!(weights.iter().all(|weight| *weight > 0));
    }
}
