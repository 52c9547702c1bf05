//! Header blocks and table skeletons shared by every page of a report.

use crate::assets::ImageAsset;
use crate::context::{DocumentContext, GroupSheet};
use crate::model::{
    Cell, CellPadding, Column, ColumnWidth, ContentBlock, ImageBlock, ImageSize, ImageSource,
    TableBlock, TextBlock,
};
use crate::reports::ReportType;
use crate::richtext::Span;
use crate::schema::ColumnSchema;
use crate::style::{HorizontalAlignment, Spacing, StyleKey};

const UNSPECIFIED_CAREER: &str = "No especificada";
const UNSPECIFIED_TEACHER: &str = "No especificado";

/// Builds the blocks printed at the top of every page of `ctx.report`.
///
/// Always starts with the logo row, the institution banner and the program
/// subtitle, followed by the report's context sentence (or the group label
/// block for the student list) and a spacer.
pub fn build_header(ctx: &DocumentContext) -> Vec<ContentBlock> {
    let mut blocks = vec![
        logo_row(),
        ContentBlock::text(TextBlock::plain(
            ctx.config.institution.as_str(),
            StyleKey::MainHeader,
        )),
        ContentBlock::text(TextBlock::plain(ctx.config.program.as_str(), StyleKey::Header)),
    ];

    match ctx.report {
        ReportType::Administrators => {
            blocks.push(sentence(vec![
                Span::new("Información de todos los administradores registrados en el sistema hasta "),
                date_span(ctx),
            ]));
            blocks.push(ContentBlock::Spacer { height: 10.0 });
        }
        ReportType::Teachers => {
            blocks.push(sentence(vec![
                Span::new("Información de todos los docentes de la carrera "),
                Span::new(ctx.entity_or(UNSPECIFIED_CAREER)).underline(),
                Span::new(" registrados en el sistema hasta "),
                date_span(ctx),
            ]));
            blocks.push(ContentBlock::Spacer { height: 10.0 });
        }
        ReportType::Periods => {
            blocks.push(sentence(vec![
                Span::new("Información de todos los periodos de la carrera "),
                Span::new(ctx.entity_or(UNSPECIFIED_CAREER)).underline(),
                Span::new(" registrados en el sistema hasta "),
                date_span(ctx),
            ]));
            blocks.push(ContentBlock::Spacer { height: 10.0 });
        }
        ReportType::TeachingHistory => {
            blocks.push(sentence(vec![
                Span::new("Información de todos los grupos impartidos por el/la docente "),
                Span::new(ctx.entity_or(UNSPECIFIED_TEACHER)).underline(),
                Span::new(" registrados en el sistema hasta "),
                date_span(ctx),
            ]));
            blocks.push(ContentBlock::Spacer { height: 5.0 });
        }
        ReportType::StudentList => {
            let sheet = ctx.group_sheet.clone().unwrap_or_default();
            blocks.push(group_labels(&sheet));
        }
        ReportType::Statistics => {}
    }

    blocks
}

/// Builds the empty table opening every page of `report`.
///
/// The student list gets one `auto` column per key of `schema`, labelled
/// `Act1..ActN`; the other reports ignore it. Statistics has no table and
/// returns `None`.
pub fn build_table_skeleton(report: ReportType, schema: &ColumnSchema) -> Option<TableBlock> {
    let percent = ColumnWidth::Percent;
    let table = match report {
        ReportType::Administrators | ReportType::Teachers => table(
            &[
                ("No", percent(5)),
                ("Nombre", percent(35)),
                ("Correo", percent(35)),
                ("Fecha", percent(15)),
                ("Hora", percent(10)),
            ],
            CellPadding::new(5.0, 3.0),
        ),
        ReportType::Periods => table(
            &[
                ("No", percent(10)),
                ("Periodo", percent(30)),
                ("Retícula", percent(20)),
                ("Fecha", percent(20)),
                ("Hora", percent(20)),
            ],
            CellPadding::new(5.0, 2.0),
        ),
        ReportType::TeachingHistory => table(
            &[
                ("Grupo", percent(10)),
                ("Materia", percent(30)),
                ("Periodo", percent(15)),
                ("Aprob.", percent(15)),
                ("Reprob.", percent(15)),
                ("Deser.", percent(15)),
            ],
            CellPadding::new(5.0, 3.0),
        ),
        ReportType::StudentList => {
            let mut widths = vec![percent(5), ColumnWidth::Star];
            let mut header = vec![Cell::header("No."), Cell::header("Nombre")];
            for label in schema.labels("Act") {
                widths.push(ColumnWidth::Auto);
                header.push(Cell::header(label));
            }
            widths.push(percent(15));
            header.push(Cell::header("Promedio"));
            TableBlock::new(widths, header)
        }
        ReportType::Statistics => return None,
    };
    Some(table)
}

fn table(columns: &[(&str, ColumnWidth)], padding: CellPadding) -> TableBlock {
    let (labels, widths): (Vec<&str>, Vec<ColumnWidth>) = columns.iter().copied().unzip();
    TableBlock::new(widths, labels.into_iter().map(Cell::header).collect()).with_padding(padding)
}

fn logo_row() -> ContentBlock {
    ContentBlock::ImageRow {
        left: ImageBlock::new(
            ImageSource::Asset(ImageAsset::PrimaryLogo),
            ImageSize::Fit {
                width: 100.0,
                height: 100.0,
            },
        ),
        right: ImageBlock::new(
            ImageSource::Asset(ImageAsset::SecondaryLogo),
            ImageSize::Fit {
                width: 60.0,
                height: 100.0,
            },
        )
        .with_alignment(HorizontalAlignment::Right),
    }
}

fn sentence(spans: Vec<Span>) -> ContentBlock {
    ContentBlock::text(TextBlock::new(spans, StyleKey::Text))
}

fn date_span(ctx: &DocumentContext) -> Span {
    Span::new(format!("{}.", ctx.as_of.date)).underline()
}

fn label_line(label: &str, value: &str) -> TextBlock {
    TextBlock::new(
        vec![Span::new(format!("{label}: ")), Span::new(value).bold()],
        StyleKey::Text,
    )
    .with_margin(Spacing::NONE)
}

fn group_labels(sheet: &GroupSheet) -> ContentBlock {
    let left = Column {
        width: ColumnWidth::Percent(80),
        lines: vec![
            label_line("DEPARTAMENTO", &sheet.department),
            label_line("MATERIA", &sheet.subject),
            label_line("PROFESOR", &sheet.teacher),
            label_line("PERIODO", &sheet.period),
        ],
    };

    let students = TextBlock::new(
        vec![
            Span::new("ALUMNOS: "),
            Span::new(sheet.students.as_str()).bold().underline(),
        ],
        StyleKey::Text,
    )
    .with_margin(Spacing::NONE);
    let right = Column {
        width: ColumnWidth::Percent(20),
        lines: vec![
            label_line("GRUPO", &sheet.group),
            label_line("UNIDAD", &sheet.unit),
            label_line("CLAVE", &sheet.subject_key),
            students,
        ],
    };

    ContentBlock::Columns {
        columns: vec![left, right],
        style: StyleKey::Text,
    }
}
