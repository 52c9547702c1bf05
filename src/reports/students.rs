use std::num::NonZeroUsize;

use crate::aggregate::{compute_average, compute_outcome_summary, format_average, summary_table};
use crate::context::{DocumentContext, GroupSheet};
use crate::layout::{build_header, build_table_skeleton};
use crate::model::{Cell, CellValue, ContentBlock, TableBlock, TextBlock, PLACEHOLDER};
use crate::paginate::ReportLayout;
use crate::records::{StudentListInput, StudentRecord};
use crate::schema::{infer_columns, ColumnSchema};
use crate::style::{HorizontalAlignment, Spacing, StyleKey};

const SIGNATURE_LINE: &str = "________________________________________";

/// Group details printed in the student list header.
pub(super) fn group_sheet(input: &StudentListInput) -> GroupSheet {
    let subject = input.subject.first();
    GroupSheet {
        department: input.group.carrera.clone(),
        subject: subject
            .map(|subject| subject.nombre_materia.clone())
            .unwrap_or_else(|| PLACEHOLDER.to_owned()),
        teacher: input.teacher.nombre.clone(),
        period: input.group.periodo.clone(),
        group: input.group.numero_grupo.to_string(),
        unit: input
            .unit
            .as_ref()
            .map_or_else(|| "0".to_owned(), CellValue::to_string),
        subject_key: subject
            .map(|subject| subject.clave_materia.clone())
            .unwrap_or_else(|| PLACEHOLDER.to_owned()),
        students: input.total_students.to_string(),
    }
}

/// Grade sheet of one group: a row per student with one column per activity
/// found anywhere in the group, followed by the outcome summary and the
/// signature block.
pub struct StudentLayout<'a> {
    ctx: &'a DocumentContext,
    input: &'a StudentListInput,
    schema: ColumnSchema,
    header: Vec<ContentBlock>,
    table: TableBlock,
}

impl<'a> StudentLayout<'a> {
    pub fn new(ctx: &'a DocumentContext, input: &'a StudentListInput) -> Self {
        let schema = infer_columns(&input.students, |student| student.activity_names());
        let table = build_table_skeleton(ctx.report, &schema).unwrap_or_default();
        Self {
            ctx,
            input,
            schema,
            header: build_header(ctx),
            table,
        }
    }

    /// Activity columns shared by every page.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    fn signature_block(&self) -> Vec<ContentBlock> {
        let centered = |text: String, margin: Spacing| {
            ContentBlock::text(
                TextBlock::plain(text, StyleKey::TableData)
                    .with_alignment(HorizontalAlignment::Center)
                    .with_margin(margin),
            )
        };
        vec![
            centered(SIGNATURE_LINE.to_owned(), Spacing::vertical(50.0, 10.0)),
            centered("Firma del profesor".to_owned(), Spacing::vertical(0.0, 10.0)),
            centered(
                "Este documento no es válido si tiene tachaduras o enmendaduras".to_owned(),
                Spacing::NONE,
            ),
            centered(
                format!(
                    "{} a {}",
                    self.ctx.config.signature_city, self.ctx.as_of.date
                ),
                Spacing::NONE,
            ),
        ]
    }
}

impl ReportLayout for StudentLayout<'_> {
    type Record = StudentRecord;

    fn page_size(&self) -> NonZeroUsize {
        self.ctx.report.page_size(&self.ctx.config)
    }

    fn header(&self) -> Vec<ContentBlock> {
        self.header.clone()
    }

    fn table(&self) -> TableBlock {
        self.table.clone()
    }

    fn row(&self, student: &StudentRecord, index: usize) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.schema.len() + 3);
        cells.push(Cell::data(index + 1));
        cells.push(Cell::new(student.nombre.as_str(), StyleKey::TableDataName));
        for activity in self.schema.keys() {
            let grade = student
                .grade_for(activity)
                .cloned()
                .unwrap_or_else(CellValue::placeholder);
            cells.push(Cell::data(grade));
        }
        let average = compute_average(student.unit_averages());
        cells.push(Cell::data(format_average(average)));
        cells
    }

    fn trailer(&self) -> Vec<ContentBlock> {
        let totals = compute_outcome_summary(&self.input.percentages, &self.input.total_students);
        let mut blocks = vec![ContentBlock::Table(summary_table(&totals))];
        blocks.extend(self.signature_block());
        blocks
    }
}
