//! Streams records into page-sized table blocks.
//!
//! Every report that prints a table follows the same layout loop: a header
//! and an empty table open the first page, and every `page_size` records a page
//! break closes the current table and opens a fresh header and table. The
//! [`ReportLayout`] trait supplies the report-specific pieces (header blocks,
//! table skeleton, row cells and an optional trailer) and [`paginate`] runs the
//! loop.

use std::num::NonZeroUsize;

use log::debug;

use crate::model::{Cell, ContentBlock, TableBlock};

/// The report-specific parts of a paginated document.
pub trait ReportLayout {
    /// One input record.
    type Record;

    /// Maximum number of body rows per table block.
    fn page_size(&self) -> NonZeroUsize;

    /// Blocks printed at the top of every page.
    fn header(&self) -> Vec<ContentBlock>;

    /// An empty table with the report's header row and column widths.
    fn table(&self) -> TableBlock;

    /// The cells of the row for `record` at 0-based position `index`.
    fn row(&self, record: &Self::Record, index: usize) -> Vec<Cell>;

    /// Blocks appended once after the last row.
    fn trailer(&self) -> Vec<ContentBlock> {
        Vec::new()
    }
}

enum PageState {
    BeforeFirstPage,
    PageOpen { table: TableBlock, rows: usize },
}

/// State machine that appends rows to the open table and starts new pages.
///
/// The open table is owned by the paginator until the next page break (or
/// [`Paginator::finish`]) moves it into the document body, after which it is
/// never touched again.
pub struct Paginator {
    page_size: NonZeroUsize,
    content: Vec<ContentBlock>,
    state: PageState,
    records_seen: usize,
    tables_closed: usize,
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            content: Vec::new(),
            state: PageState::BeforeFirstPage,
            records_seen: 0,
            tables_closed: 0,
        }
    }

    /// Opens the first page with `header` and `table`.
    ///
    /// Calling this more than once has no effect.
    pub fn open_first_page(&mut self, header: Vec<ContentBlock>, table: TableBlock) {
        if let PageState::BeforeFirstPage = self.state {
            self.content.extend(header);
            self.state = PageState::PageOpen { table, rows: 0 };
        }
    }

    /// Whether the next record starts a new page.
    pub fn needs_break(&self) -> bool {
        let index = self.records_seen;
        index > 0 && index % self.page_size.get() == 0
    }

    /// Closes the open table and starts a new page with `header` and `table`.
    pub fn break_page(&mut self, header: Vec<ContentBlock>, table: TableBlock) {
        self.close_open_table();
        self.content.push(ContentBlock::PageBreak);
        self.content.extend(header);
        self.state = PageState::PageOpen { table, rows: 0 };
    }

    /// Appends a row to the open table.
    ///
    /// Rows pushed before the first page is opened start a page with an
    /// empty header and a headerless table.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        if let PageState::BeforeFirstPage = self.state {
            let columns = row.len();
            self.open_first_page(
                Vec::new(),
                TableBlock::new(vec![crate::model::ColumnWidth::Star; columns], Vec::new()),
            );
        }
        if let PageState::PageOpen { table, rows } = &mut self.state {
            table.push_row(row);
            *rows += 1;
        }
        self.records_seen += 1;
    }

    fn close_open_table(&mut self) {
        let state = std::mem::replace(&mut self.state, PageState::BeforeFirstPage);
        if let PageState::PageOpen { table, rows } = state {
            debug!("Closing table block {} with {} rows", self.tables_closed, rows);
            self.content.push(ContentBlock::Table(table));
            self.tables_closed += 1;
        }
    }

    /// Closes the last table and returns the document body.
    pub fn finish(mut self) -> Vec<ContentBlock> {
        self.close_open_table();
        self.content
    }
}

/// Lays out `records` page by page and appends the layout's trailer.
///
/// With `L` records and page size `N` the body holds `max(1, ceil(L / N))`
/// table blocks, and record `i` lands in block `i / N`. Zero records still
/// yield the header and one empty table.
pub fn paginate<L>(layout: &L, records: &[L::Record]) -> Vec<ContentBlock>
where
    L: ReportLayout,
{
    let mut paginator = Paginator::new(layout.page_size());
    paginator.open_first_page(layout.header(), layout.table());

    for (index, record) in records.iter().enumerate() {
        if paginator.needs_break() {
            paginator.break_page(layout.header(), layout.table());
        }
        paginator.push_row(layout.row(record, index));
    }

    let mut content = paginator.finish();
    content.extend(layout.trailer());
    debug!(
        "Paginated {} records into {} blocks (page size {})",
        records.len(),
        content.len(),
        layout.page_size()
    );
    content
}

/// Number of table blocks `paginate` produces for `records` records.
pub fn table_count(records: usize, page_size: NonZeroUsize) -> usize {
    if records == 0 {
        1
    } else {
        (records + page_size.get() - 1) / page_size.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnWidth, TextBlock};
    use crate::style::StyleKey;

    struct Numbers {
        page_size: NonZeroUsize,
    }

    impl ReportLayout for Numbers {
        type Record = u32;

        fn page_size(&self) -> NonZeroUsize {
            self.page_size
        }

        fn header(&self) -> Vec<ContentBlock> {
            vec![ContentBlock::Text(TextBlock::plain("header", StyleKey::Text))]
        }

        fn table(&self) -> TableBlock {
            TableBlock::new(vec![ColumnWidth::Star], vec![Cell::header("n")])
        }

        fn row(&self, record: &u32, index: usize) -> Vec<Cell> {
            vec![Cell::data(format!("{index}:{record}"))]
        }
    }

    fn layout(page_size: usize) -> Numbers {
        Numbers {
            page_size: NonZeroUsize::new(page_size).expect("non-zero"),
        }
    }

    fn row_counts(content: &[ContentBlock]) -> Vec<usize> {
        content
            .iter()
            .filter_map(ContentBlock::as_table)
            .map(TableBlock::row_count)
            .collect()
    }

    #[test]
    fn zero_records_emit_header_and_empty_table() {
        let content = paginate(&layout(15), &[]);
        assert_eq!(content.len(), 2);
        assert!(matches!(content[0], ContentBlock::Text(_)));
        assert_eq!(row_counts(&content), vec![0]);
    }

    #[test]
    fn full_page_does_not_open_trailing_table() {
        let records: Vec<u32> = (0..15).collect();
        let content = paginate(&layout(15), &records);
        assert_eq!(row_counts(&content), vec![15]);
        assert!(content.iter().all(|block| !block.is_page_break()));
    }

    #[test]
    fn one_past_a_page_breaks_before_the_extra_record() {
        let records: Vec<u32> = (0..16).collect();
        let content = paginate(&layout(15), &records);
        assert_eq!(row_counts(&content), vec![15, 1]);

        let break_at = content
            .iter()
            .position(ContentBlock::is_page_break)
            .expect("page break");
        assert!(matches!(content[break_at - 1], ContentBlock::Table(_)));
        assert!(matches!(content[break_at + 1], ContentBlock::Text(_)));
    }

    #[test]
    fn rows_keep_input_order() {
        let records = [7, 3, 9];
        let content = paginate(&layout(2), &records);
        let cells: Vec<String> = content
            .iter()
            .filter_map(ContentBlock::as_table)
            .flat_map(|table| table.body_rows.iter())
            .map(|row| row[0].text.to_string())
            .collect();
        assert_eq!(cells, ["0:7", "1:3", "2:9"]);
    }

    #[test]
    fn table_count_matches_ceiling_division() {
        let size = NonZeroUsize::new(15).expect("non-zero");
        assert_eq!(table_count(0, size), 1);
        assert_eq!(table_count(15, size), 1);
        assert_eq!(table_count(16, size), 2);
        assert_eq!(table_count(32, size), 3);
    }
}
