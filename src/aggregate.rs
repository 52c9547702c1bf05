//! Derived values for summary tables: grade averages and outcome counts.

use serde::{Deserialize, Serialize};

use crate::model::{Cell, CellValue, ColumnWidth, TableBlock, PLACEHOLDER};
use crate::style::Spacing;

/// Mean of the unit averages of a student's grade groups.
///
/// Groups without an average count as 0. Returns `None` for a student with no
/// grade groups at all.
pub fn compute_average<I>(unit_averages: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = unit_averages
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), average| {
            (sum + average.unwrap_or(0.0), count + 1)
        });
    (count > 0).then(|| sum / count as f64)
}

/// Prints an average with two decimals, or the placeholder when there is none.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) if value.is_finite() => format!("{value:.2}"),
        _ => PLACEHOLDER.to_owned(),
    }
}

/// Pass/fail/dropout counts and percentages as supplied by the caller.
///
/// Values are printed as given; nothing here checks that they add up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSummary {
    pub aprobados: CellValue,
    pub aprobados_porcentaje: CellValue,
    pub reprobados: CellValue,
    pub reprobados_porcentaje: CellValue,
    pub desertados: CellValue,
    pub desertados_porcentaje: CellValue,
}

impl Default for OutcomeSummary {
    fn default() -> Self {
        Self {
            aprobados: CellValue::Integer(0),
            aprobados_porcentaje: CellValue::Integer(0),
            reprobados: CellValue::Integer(0),
            reprobados_porcentaje: CellValue::Integer(0),
            desertados: CellValue::Integer(0),
            desertados_porcentaje: CellValue::Integer(0),
        }
    }
}

/// Outcome figures of a group, ready for the summary table.
#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeTotals {
    pub passed: CellValue,
    pub failed: CellValue,
    pub dropped: CellValue,
    pub passed_pct: CellValue,
    pub failed_pct: CellValue,
    pub dropped_pct: CellValue,
    pub total: CellValue,
}

/// Pairs the caller-supplied counts with the group total.
pub fn compute_outcome_summary(counts: &OutcomeSummary, total: &CellValue) -> OutcomeTotals {
    OutcomeTotals {
        passed: counts.aprobados.clone(),
        failed: counts.reprobados.clone(),
        dropped: counts.desertados.clone(),
        passed_pct: counts.aprobados_porcentaje.clone(),
        failed_pct: counts.reprobados_porcentaje.clone(),
        dropped_pct: counts.desertados_porcentaje.clone(),
        total: total.clone(),
    }
}

/// Builds the summary table printed after the last student row.
pub fn summary_table(totals: &OutcomeTotals) -> TableBlock {
    let rows = [
        ("Alumnos aprobados", &totals.passed, &totals.passed_pct),
        ("Alumnos reprobados", &totals.failed, &totals.failed_pct),
        ("Alumnos desertados", &totals.dropped, &totals.dropped_pct),
    ];

    let mut table = TableBlock::new(
        vec![ColumnWidth::Star, ColumnWidth::Percent(15), ColumnWidth::Percent(15)],
        Vec::new(),
    )
    .with_margin(Spacing::vertical(25.0, 0.0));

    for (label, count, percentage) in rows {
        table.push_row(vec![
            Cell::data(label),
            Cell::data(count.clone()),
            Cell::data(percentage.clone()),
        ]);
    }
    table.push_row(vec![
        Cell::data("Total"),
        Cell::data(totals.total.clone()),
        Cell::data("100%"),
    ]);
    table
}

/// `"<pct>% (<count>)"`, the outcome cell of the teaching history.
pub fn outcome_cell(percentage: &CellValue, count: &CellValue) -> String {
    format!("{percentage}% ({count})")
}
