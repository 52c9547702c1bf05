use std::num::NonZeroUsize;

use crate::aggregate::outcome_cell;
use crate::context::DocumentContext;
use crate::layout::{build_header, build_table_skeleton};
use crate::model::{Cell, CellValue, ContentBlock, TableBlock};
use crate::paginate::ReportLayout;
use crate::records::{SubjectRef, TeachingGroup};
use crate::schema::ColumnSchema;

/// Groups taught by one teacher with their outcome figures.
///
/// Row `i` pairs the `i`-th group with the `i`-th subject; a group without a
/// subject prints the placeholder in both subject cells.
pub struct HistoryLayout<'a> {
    ctx: &'a DocumentContext,
    subjects: &'a [SubjectRef],
    header: Vec<ContentBlock>,
    table: TableBlock,
}

impl<'a> HistoryLayout<'a> {
    pub fn new(ctx: &'a DocumentContext, subjects: &'a [SubjectRef]) -> Self {
        Self {
            ctx,
            subjects,
            header: build_header(ctx),
            table: build_table_skeleton(ctx.report, &ColumnSchema::default()).unwrap_or_default(),
        }
    }
}

impl ReportLayout for HistoryLayout<'_> {
    type Record = TeachingGroup;

    fn page_size(&self) -> NonZeroUsize {
        self.ctx.report.page_size(&self.ctx.config)
    }

    fn header(&self) -> Vec<ContentBlock> {
        self.header.clone()
    }

    fn table(&self) -> TableBlock {
        self.table.clone()
    }

    fn row(&self, group: &TeachingGroup, index: usize) -> Vec<Cell> {
        let (key, name) = match self.subjects.get(index) {
            Some(subject) => (
                CellValue::from(subject.clave_materia.as_str()),
                CellValue::from(subject.nombre_materia.as_str()),
            ),
            None => (CellValue::placeholder(), CellValue::placeholder()),
        };
        vec![
            Cell::data(key),
            Cell::data(name),
            Cell::data(group.periodo.as_str()),
            Cell::data(outcome_cell(&group.porcentaje_aprobados, &group.alumnos_aprobados)),
            Cell::data(outcome_cell(&group.porcentaje_reprobados, &group.alumnos_reprobados)),
            Cell::data(outcome_cell(&group.porcentaje_desertados, &group.alumnos_desertados)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::context::AsOf;
    use crate::reports::ReportType;

    fn group(periodo: &str) -> TeachingGroup {
        TeachingGroup {
            periodo: periodo.into(),
            alumnos_aprobados: CellValue::Integer(18),
            porcentaje_aprobados: CellValue::Integer(72),
            alumnos_reprobados: CellValue::Integer(5),
            porcentaje_reprobados: CellValue::Integer(20),
            alumnos_desertados: CellValue::Integer(2),
            porcentaje_desertados: CellValue::Integer(8),
        }
    }

    #[test]
    fn pairs_groups_with_subjects_by_position() {
        let ctx = DocumentContext::new(
            ReportType::TeachingHistory,
            AsOf::fixed("01 de enero de 2026", "08:00:00"),
            ReportConfig::default(),
        );
        let subjects = [SubjectRef {
            clave_materia: "SCD-1027".into(),
            nombre_materia: "Tópicos Avanzados de Programación".into(),
        }];
        let layout = HistoryLayout::new(&ctx, &subjects);

        let first = layout.row(&group("ENE-JUN 2025"), 0);
        assert_eq!(first[0].text.to_string(), "SCD-1027");
        assert_eq!(first[3].text.to_string(), "72% (18)");
        assert_eq!(first[5].text.to_string(), "8% (2)");

        let second = layout.row(&group("AGO-DIC 2025"), 1);
        assert_eq!(second[0].text, CellValue::placeholder());
        assert_eq!(second[1].text, CellValue::placeholder());
        assert_eq!(second[2].text.to_string(), "AGO-DIC 2025");
    }
}
