mod common;

use std::num::NonZeroUsize;

use monitoreo_reports::model::{CellValue, ContentBlock, TableBlock};
use monitoreo_reports::paginate::table_count;
use monitoreo_reports::records::{RosterInput, StudentRecord};
use monitoreo_reports::schema::infer_columns;
use monitoreo_reports::{build_document, ReportConfig, ReportRequest};
use proptest::prelude::*;

fn roster_config(page_size: usize) -> ReportConfig {
    ReportConfig {
        roster_page_size: page_size,
        ..ReportConfig::default()
    }
}

fn administrators(count: usize) -> ReportRequest {
    ReportRequest::Administrators(RosterInput {
        records: common::accounts(count),
        carrera: None,
    })
}

fn body_tables(content: &[ContentBlock]) -> Vec<&TableBlock> {
    content.iter().filter_map(ContentBlock::as_table).collect()
}

/// Number of body rows emitted before each page break.
fn rows_before_breaks(content: &[ContentBlock]) -> Vec<usize> {
    let mut rows = 0;
    let mut breaks = Vec::new();
    for block in content {
        match block {
            ContentBlock::Table(table) => rows += table.row_count(),
            ContentBlock::PageBreak => breaks.push(rows),
            _ => {}
        }
    }
    breaks
}

fn name_cell(table: &TableBlock, row: usize) -> &CellValue {
    &table.body_rows[row][1].text
}

#[test]
fn thirty_two_admins_fill_three_tables() {
    let doc = build_document(&administrators(32), &roster_config(15), common::as_of());

    let rows: Vec<usize> = doc.tables().map(TableBlock::row_count).collect();
    assert_eq!(rows, vec![15, 15, 2]);
    assert_eq!(rows_before_breaks(&doc.content), vec![15, 30]);

    let tables = body_tables(&doc.content);
    assert_eq!(
        name_cell(tables[1], 0),
        &CellValue::Text("Administrador 15".into())
    );
    assert_eq!(
        name_cell(tables[2], 0),
        &CellValue::Text("Administrador 30".into())
    );
}

#[test]
fn every_page_repeats_the_header() {
    let doc = build_document(&administrators(32), &roster_config(15), common::as_of());
    let image_rows = doc
        .content
        .iter()
        .filter(|block| matches!(block, ContentBlock::ImageRow { .. }))
        .count();
    assert_eq!(image_rows, 3);
    assert!(matches!(doc.content[0], ContentBlock::ImageRow { .. }));
}

#[test]
fn full_page_does_not_open_an_empty_table() {
    let doc = build_document(&administrators(15), &roster_config(15), common::as_of());
    assert_eq!(doc.tables().count(), 1);
    assert_eq!(doc.page_break_count(), 0);
}

#[test]
fn empty_roster_keeps_header_and_empty_table() {
    let doc = build_document(&administrators(0), &roster_config(15), common::as_of());
    let tables: Vec<&TableBlock> = doc.tables().collect();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 0);
    assert!(tables[0].has_header());
    assert_eq!(doc.page_break_count(), 0);
}

#[test]
fn empty_student_list_has_skeleton_and_zero_summary() {
    let request = ReportRequest::StudentList(common::student_list(Vec::new()));
    let doc = build_document(&request, &ReportConfig::default(), common::as_of());

    assert!(matches!(doc.content[0], ContentBlock::ImageRow { .. }));
    assert_eq!(doc.page_break_count(), 0);

    let tables: Vec<&TableBlock> = doc.tables().collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].row_count(), 0);
    // No., Nombre and Promedio only.
    assert_eq!(tables[0].column_count(), 3);

    let summary = tables[1];
    for row in &summary.body_rows[..3] {
        assert_eq!(row[1].text, CellValue::Integer(0));
        assert_eq!(row[2].text, CellValue::Integer(0));
    }
    assert_eq!(summary.body_rows[3][1].text, CellValue::Integer(0));
}

#[test]
fn missing_activity_renders_placeholder() {
    let students = vec![
        common::student("Ana", &[("Examen", 90), ("Tarea", 80)], &[85.0]),
        common::student("Luis", &[("Examen", 70)], &[70.0]),
    ];
    let request = ReportRequest::StudentList(common::student_list(students));
    let doc = build_document(&request, &ReportConfig::default(), common::as_of());

    let table = doc.tables().next().expect("grade table");
    // No., Nombre, Examen, Tarea, Promedio
    assert_eq!(table.column_count(), 5);
    assert_eq!(table.body_rows[1][3].text, CellValue::Text("-".into()));
    assert_eq!(table.body_rows[1][2].text, CellValue::Integer(70));
}

#[test]
fn student_without_units_gets_placeholder_average() {
    let request = ReportRequest::StudentList(common::student_list(vec![common::student(
        "Sin unidades",
        &[],
        &[],
    )]));
    let doc = build_document(&request, &ReportConfig::default(), common::as_of());
    let table = doc.tables().next().expect("grade table");
    let average = table.body_rows[0].last().expect("average cell");
    assert_eq!(average.text, CellValue::Text("-".into()));
}

#[test]
fn identical_requests_build_identical_documents() {
    let students = vec![
        common::student("Ana", &[("Examen", 90), ("Tarea", 80)], &[85.0, 92.5]),
        common::student("Luis", &[("Proyecto", 70)], &[70.0]),
    ];
    let request = ReportRequest::StudentList(common::student_list(students));
    let config = ReportConfig::default();

    let first = build_document(&request, &config, common::as_of());
    let second = build_document(&request, &config, common::as_of());
    assert_eq!(first, second);
    assert_eq!(
        first.to_json().expect("serialize"),
        second.to_json().expect("serialize")
    );
}

fn activity_sets() -> impl Strategy<Value = Vec<Vec<String>>> {
    let name = prop::sample::select(vec![
        "Examen", "Tarea 1", "Tarea 2", "Proyecto", "Exposición", "Práctica",
    ])
    .prop_map(str::to_owned);
    prop::collection::vec(prop::collection::vec(name, 0..4), 0..12)
}

proptest! {
    #[test]
    fn table_blocks_match_ceiling(len in 0usize..120, page_size in 1usize..40) {
        let doc = build_document(&administrators(len), &roster_config(page_size), common::as_of());
        let page = NonZeroUsize::new(page_size).expect("non-zero");

        prop_assert_eq!(doc.tables().count(), table_count(len, page));
        prop_assert_eq!(doc.page_break_count(), table_count(len, page) - 1);
    }

    #[test]
    fn row_lands_in_its_block(len in 1usize..120, page_size in 1usize..40) {
        let doc = build_document(&administrators(len), &roster_config(page_size), common::as_of());
        let tables = body_tables(&doc.content);

        for index in 0..len {
            let table = tables[index / page_size];
            let expected = CellValue::Text(format!("Administrador {index:02}"));
            prop_assert_eq!(name_cell(table, index % page_size), &expected);
        }
    }

    #[test]
    fn columns_ignore_record_order(
        (sets, shuffled) in activity_sets()
            .prop_flat_map(|sets| (Just(sets.clone()), Just(sets).prop_shuffle()))
    ) {
        let students = |sets: &[Vec<String>]| -> Vec<StudentRecord> {
            sets.iter()
                .map(|names| {
                    let grades: Vec<(&str, i64)> =
                        names.iter().map(|name| (name.as_str(), 100)).collect();
                    common::student("Alumno", &grades, &[90.0])
                })
                .collect()
        };
        let original = students(&sets);
        let permuted = students(&shuffled);

        let schema = infer_columns(&original, |s| s.activity_names());
        prop_assert_eq!(&schema, &infer_columns(&permuted, |s| s.activity_names()));

        let again: Vec<&str> = schema.keys().iter().map(String::as_str).collect();
        let rebuilt: monitoreo_reports::schema::ColumnSchema = again.into_iter().collect();
        prop_assert_eq!(schema, rebuilt);
    }
}
