//! Report types and their document builders.
//!
//! Each report family plugs a [`ReportLayout`](crate::paginate::ReportLayout)
//! into the shared paginator; [`build_document`] selects the layout from a
//! tagged [`ReportRequest`].

mod history;
mod periods;
mod roster;
mod statistics;
mod students;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::assemble::{assemble, render_async, DocumentRenderer, PdfExport};
use crate::config::ReportConfig;
use crate::context::{AsOf, DocumentContext};
use crate::error::Result;
use crate::model::{DocumentDescription, PageFooter};
use crate::paginate::paginate;
use crate::records::{
    PeriodInput, RosterInput, StatisticsInput, StudentListInput, TeachingHistoryInput,
};

pub use history::HistoryLayout;
pub use periods::PeriodLayout;
pub use roster::RosterLayout;
pub use statistics::{statistics_content, CHART_CAPTIONS};
pub use students::StudentLayout;

/// The fixed document kinds the engine produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Administrators,
    Teachers,
    Periods,
    TeachingHistory,
    StudentList,
    Statistics,
}

impl ReportType {
    /// Every report type.
    pub const ALL: [ReportType; 6] = [
        ReportType::Administrators,
        ReportType::Teachers,
        ReportType::Periods,
        ReportType::TeachingHistory,
        ReportType::StudentList,
        ReportType::Statistics,
    ];

    /// File name of the exported attachment.
    pub fn file_name(self) -> &'static str {
        match self {
            ReportType::Administrators => "administradores.pdf",
            ReportType::Teachers => "docentes.pdf",
            ReportType::Periods => "periodos.pdf",
            ReportType::TeachingHistory => "historial_docente.pdf",
            ReportType::StudentList => "lista_alumnos.pdf",
            ReportType::Statistics => "estadisticas.pdf",
        }
    }

    /// Document title stored in the PDF metadata.
    pub fn title(self) -> &'static str {
        match self {
            ReportType::Administrators => "Administradores",
            ReportType::Teachers => "Docentes",
            ReportType::Periods => "Periodos",
            ReportType::TeachingHistory => "Historial docente",
            ReportType::StudentList => "Lista de alumnos",
            ReportType::Statistics => "Estadísticas",
        }
    }

    /// Footer printed on every page.
    pub fn footer(self) -> PageFooter {
        match self {
            ReportType::Statistics => PageFooter::None,
            _ => PageFooter::page_number(),
        }
    }

    /// Rows per table block, taken from `config`.
    pub fn page_size(self, config: &ReportConfig) -> NonZeroUsize {
        let (configured, fallback) = match self {
            ReportType::StudentList => (config.student_page_size, 30),
            _ => (config.roster_page_size, 15),
        };
        NonZeroUsize::new(configured).unwrap_or_else(|| {
            warn!(
                "Page size 0 configured for {:?}; using {} instead",
                self, fallback
            );
            NonZeroUsize::new(fallback).unwrap_or(NonZeroUsize::MIN)
        })
    }
}

/// A report request as received from the caller: the report type tag and
/// its input records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report", content = "data", rename_all = "snake_case")]
pub enum ReportRequest {
    Administrators(RosterInput),
    Teachers(RosterInput),
    Periods(PeriodInput),
    TeachingHistory(TeachingHistoryInput),
    StudentList(StudentListInput),
    Statistics(StatisticsInput),
}

impl ReportRequest {
    pub fn report_type(&self) -> ReportType {
        match self {
            ReportRequest::Administrators(_) => ReportType::Administrators,
            ReportRequest::Teachers(_) => ReportType::Teachers,
            ReportRequest::Periods(_) => ReportType::Periods,
            ReportRequest::TeachingHistory(_) => ReportType::TeachingHistory,
            ReportRequest::StudentList(_) => ReportType::StudentList,
            ReportRequest::Statistics(_) => ReportType::Statistics,
        }
    }

    /// Parses a request from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds the document description for `request`.
///
/// Pure and deterministic: identical requests with the same `as_of` yield
/// identical descriptions.
pub fn build_document(
    request: &ReportRequest,
    config: &ReportConfig,
    as_of: AsOf,
) -> DocumentDescription {
    let report = request.report_type();
    let started = Instant::now();
    let ctx = context_for(request, config, as_of);

    let content = match request {
        ReportRequest::Administrators(input) | ReportRequest::Teachers(input) => {
            paginate(&RosterLayout::new(&ctx), &input.records)
        }
        ReportRequest::Periods(input) => paginate(&PeriodLayout::new(&ctx), &input.records),
        ReportRequest::TeachingHistory(input) => {
            paginate(&HistoryLayout::new(&ctx, &input.subjects), &input.groups)
        }
        ReportRequest::StudentList(input) => {
            paginate(&StudentLayout::new(&ctx, input), &input.students)
        }
        ReportRequest::Statistics(input) => statistics_content(&ctx, input),
    };

    debug!(
        "Built {:?} content ({} blocks) in {} ms",
        report,
        content.len(),
        started.elapsed().as_millis()
    );
    assemble(content, ctx.styles, report.footer(), report.title())
}

/// The context shared by every page of `request`: the entity the report is
/// about and, for the student list, the group details.
fn context_for(request: &ReportRequest, config: &ReportConfig, as_of: AsOf) -> DocumentContext {
    let ctx = DocumentContext::new(request.report_type(), as_of, config.clone());
    match request {
        ReportRequest::Teachers(RosterInput {
            carrera: Some(carrera),
            ..
        }) => ctx.with_entity(carrera.as_str()),
        ReportRequest::Periods(input) => {
            let carrera = input
                .records
                .first()
                .and_then(|record| record.carrera.as_deref())
                .filter(|carrera| !carrera.is_empty());
            match carrera {
                Some(carrera) => ctx.with_entity(carrera),
                None => ctx,
            }
        }
        ReportRequest::TeachingHistory(TeachingHistoryInput {
            teacher: Some(teacher),
            ..
        }) if !teacher.nombre.is_empty() => ctx.with_entity(teacher.nombre.as_str()),
        ReportRequest::StudentList(input) => ctx.with_group_sheet(students::group_sheet(input)),
        _ => ctx,
    }
}

/// Builds and renders `request` into an attachment.
pub fn export<R>(
    renderer: &R,
    request: &ReportRequest,
    config: &ReportConfig,
    as_of: AsOf,
) -> Result<PdfExport>
where
    R: DocumentRenderer + ?Sized,
{
    let report = request.report_type();
    let doc = build_document(request, config, as_of);
    let started = Instant::now();
    let bytes = renderer.render(&doc)?;
    info!(
        "Rendered {} ({} bytes) in {} ms",
        report.file_name(),
        bytes.len(),
        started.elapsed().as_millis()
    );
    Ok(PdfExport::new(report, bytes))
}

/// Builds `request` on the calling task and renders it on the blocking pool,
/// honoring the configured render deadline.
pub async fn export_async<R>(
    renderer: Arc<R>,
    request: &ReportRequest,
    config: &ReportConfig,
    as_of: AsOf,
) -> Result<PdfExport>
where
    R: DocumentRenderer + Send + Sync + 'static,
{
    let report = request.report_type();
    let doc = build_document(request, config, as_of);
    let bytes = render_async(renderer, doc, config.render_deadline()).await?;
    info!("Rendered {} ({} bytes)", report.file_name(), bytes.len());
    Ok(PdfExport::new(report, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_tagged_by_report() {
        let request = ReportRequest::from_json_str(
            r#"{"report":"teachers","data":{"records":[],"carrera":"Ingeniería Civil"}}"#,
        )
        .expect("request parses");
        assert_eq!(request.report_type(), ReportType::Teachers);
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = ReportType::ALL.iter().map(|r| r.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ReportType::ALL.len());
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        let config = ReportConfig {
            roster_page_size: 0,
            student_page_size: 0,
            ..ReportConfig::default()
        };
        assert_eq!(ReportType::Periods.page_size(&config).get(), 15);
        assert_eq!(ReportType::StudentList.page_size(&config).get(), 30);
    }

    #[test]
    fn only_statistics_omits_page_numbers() {
        for report in ReportType::ALL {
            let expected = report != ReportType::Statistics;
            assert_eq!(report.footer() != PageFooter::None, expected, "{report:?}");
        }
    }
}
