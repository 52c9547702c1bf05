use std::num::NonZeroUsize;

use crate::context::DocumentContext;
use crate::layout::{build_header, build_table_skeleton};
use crate::model::{Cell, ContentBlock, TableBlock};
use crate::paginate::ReportLayout;
use crate::records::AccountRecord;
use crate::schema::ColumnSchema;

/// Administrator and teacher listings: number, name, email and registration
/// date and time.
pub struct RosterLayout<'a> {
    ctx: &'a DocumentContext,
    header: Vec<ContentBlock>,
    table: TableBlock,
}

impl<'a> RosterLayout<'a> {
    pub fn new(ctx: &'a DocumentContext) -> Self {
        Self {
            ctx,
            header: build_header(ctx),
            table: build_table_skeleton(ctx.report, &ColumnSchema::default()).unwrap_or_default(),
        }
    }
}

impl ReportLayout for RosterLayout<'_> {
    type Record = AccountRecord;

    fn page_size(&self) -> NonZeroUsize {
        self.ctx.report.page_size(&self.ctx.config)
    }

    fn header(&self) -> Vec<ContentBlock> {
        self.header.clone()
    }

    fn table(&self) -> TableBlock {
        self.table.clone()
    }

    fn row(&self, record: &AccountRecord, index: usize) -> Vec<Cell> {
        vec![
            Cell::data(index + 1),
            Cell::data(record.nombre.as_str()),
            Cell::data(record.correo.as_str()),
            Cell::data(record.fecha_registro.as_str()),
            Cell::data(record.hora_registro.as_str()),
        ]
    }
}
