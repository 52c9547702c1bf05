use log::warn;

use crate::context::DocumentContext;
use crate::layout::build_header;
use crate::model::{ContentBlock, ImageBlock, ImageSize, ImageSource, TextBlock};
use crate::records::StatisticsInput;
use crate::style::{HorizontalAlignment, Spacing, StyleKey};

/// Title and description printed above each chart, in chart order.
pub const CHART_CAPTIONS: [(&str, &str); 3] = [
    (
        "Gráfica 1. Estado de alumnos por unidades",
        "Representación gráfica de estudiantes aprobados, reprobados y desertores a lo largo del semestre.",
    ),
    (
        "Gráfica 2. Rango de promedios",
        "Visualización de los promedios finales de los estudiantes divididos por rango de calificación.",
    ),
    (
        "Gráfica 3. Estado final de los alumnos",
        "Representación gráfica de estudiantes aprobados, reprobados y desertores al finalizar el semestre.",
    ),
];

const CHART_SIZE: ImageSize = ImageSize::Exact {
    width: 520.0,
    height: 260.0,
};

/// Header followed by each chart with its caption.
///
/// Charts are paired with [`CHART_CAPTIONS`] by position; charts beyond the
/// last caption are dropped.
pub fn statistics_content(ctx: &DocumentContext, input: &StatisticsInput) -> Vec<ContentBlock> {
    if input.files.len() != CHART_CAPTIONS.len() {
        warn!(
            "Statistics export expects {} charts, got {}",
            CHART_CAPTIONS.len(),
            input.files.len()
        );
    }

    let mut content = build_header(ctx);
    for (file, (title, description)) in input.files.iter().zip(CHART_CAPTIONS) {
        content.push(ContentBlock::text(
            TextBlock::plain(title, StyleKey::StatisticsTitle)
                .with_margin(Spacing::vertical(0.0, 10.0)),
        ));
        content.push(ContentBlock::text(
            TextBlock::plain(description, StyleKey::StatisticsText)
                .with_margin(Spacing::vertical(0.0, 10.0)),
        ));
        content.push(ContentBlock::Image(
            ImageBlock::new(ImageSource::Bytes(file.buffer.clone()), CHART_SIZE)
                .with_alignment(HorizontalAlignment::Center),
        ));
    }
    content
}
