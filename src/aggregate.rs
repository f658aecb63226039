//! Folding parsed items into the report: one detail row per input row, one
//! summary row per order, a grand-total row, and the per-item diagnostic
//! trail.
//!
//! Values stay tagged ([`Cell`]) all the way through aggregation; the
//! `"<n> + C"` rendering of the counted-marker category happens only at the
//! table boundary in [`build_report_book`]. Absent data stays [`Cell::Empty`]
//! rather than zero, so "no units" and "zero units" remain distinguishable.

use std::collections::BTreeMap;

use crate::config::CategoryMap;
use crate::extract::{extract_fields, split_blocks};
use crate::model::{ItemOutput, ItemRecord, ItemValue, OrderRow};
use crate::quantify::quantify;

/// Sheet name for the per-row detail table.
pub const DETAIL_SHEET: &str = "ItensDetalhados";
/// Sheet name for the per-order summary table.
pub const SUMMARY_SHEET: &str = "Resumo";
/// Sheet name for the per-item diagnostic table.
pub const DIAGNOSTICS_SHEET: &str = "Diagnostico";

/// Order identifier of the synthetic grand-total row.
pub const TOTAL_ORDER_SN: &str = "TOTAL";

/// One aggregated category cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// No item contributed to this column.
    Empty,
    /// Accumulated unit total.
    Number(u64),
    /// Accumulated purchased-kit count for the counted-marker category.
    Counted(u64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn number(&self) -> Option<u64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// The leading integer of the cell's rendering, used when summing the
    /// counted-marker column.
    fn leading_count(&self) -> Option<u64> {
        match self {
            Cell::Empty => None,
            Cell::Number(value) | Cell::Counted(value) => Some(*value),
        }
    }
}

/// One row of the detail table: identifying fields plus one cell per
/// category column.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub order_sn: String,
    /// All non-empty raw SKUs seen across the row's blocks, `"; "`-joined.
    pub skus: String,
    /// All non-empty variation labels seen across the row's blocks.
    pub variations: String,
    pub product_info: String,
    pub cells: Vec<Cell>,
}

impl DetailRow {
    /// True when no category column received a value; this is the condition
    /// that surfaces unmapped products to the operator.
    pub fn is_unmapped(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub order_sn: String,
    pub cells: Vec<Cell>,
}

/// A diagnostic row: the parsed item record, keyed by its order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRow {
    pub order_sn: String,
    pub record: ItemRecord,
}

/// The complete enrichment result, still in tagged form.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Category column names in report order.
    pub columns: Vec<String>,
    pub detail: Vec<DetailRow>,
    /// One row per distinct order, sorted by order identifier.
    pub summary: Vec<SummaryRow>,
    pub total: SummaryRow,
    pub diagnostics: Vec<DiagnosticRow>,
}

#[derive(Default)]
struct OrderFold {
    numeric: BTreeMap<String, u64>,
    counted_kits: u64,
}

impl OrderFold {
    fn add(&mut self, output: ItemOutput) {
        match output.value {
            ItemValue::Numeric(value) => {
                let slot = self.numeric.entry(output.category).or_insert(0);
                *slot = slot.saturating_add(value);
            }
            ItemValue::CountedKits(kits) => {
                self.counted_kits = self.counted_kits.saturating_add(kits);
            }
        }
    }
}

/// Runs the full pipeline over the input rows: split, extract, classify,
/// quantify, and aggregate per row, per order, and in total.
pub fn enrich(rows: &[OrderRow], map: &CategoryMap) -> Report {
    let columns = map.column_order();
    let counted_column = columns
        .iter()
        .position(|name| *name == map.special_rules.enc_capa_category);

    let mut detail = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();

    for row in rows {
        let mut fold = OrderFold::default();
        let mut skus: Vec<String> = Vec::new();
        let mut variations: Vec<String> = Vec::new();

        let blocks = row
            .product_info
            .text()
            .map(split_blocks)
            .unwrap_or_default();
        for block in blocks {
            let fields = extract_fields(block);
            let (output, record) = quantify(&fields, map);
            if !record.sku_raw.is_empty() {
                skus.push(record.sku_raw.clone());
            }
            if !record.variation_seen.is_empty() {
                variations.push(record.variation_seen.clone());
            }
            if let Some(output) = output {
                fold.add(output);
            }
            diagnostics.push(DiagnosticRow {
                order_sn: row.order_sn.clone(),
                record,
            });
        }

        let cells = columns
            .iter()
            .enumerate()
            .map(|(index, name)| {
                if Some(index) == counted_column && fold.counted_kits > 0 {
                    Cell::Counted(fold.counted_kits)
                } else {
                    fold.numeric.get(name).map_or(Cell::Empty, |v| Cell::Number(*v))
                }
            })
            .collect();

        detail.push(DetailRow {
            order_sn: row.order_sn.clone(),
            skus: skus.join("; "),
            variations: variations.join("; "),
            product_info: row.product_info.display().to_string(),
            cells,
        });
    }

    let mut groups: BTreeMap<&str, Vec<&DetailRow>> = BTreeMap::new();
    for row in &detail {
        groups.entry(row.order_sn.as_str()).or_default().push(row);
    }
    let summary = groups
        .into_iter()
        .map(|(order_sn, rows)| SummaryRow {
            order_sn: order_sn.to_string(),
            cells: sum_columns(columns.len(), counted_column, &rows),
        })
        .collect();

    let all_rows: Vec<&DetailRow> = detail.iter().collect();
    let total = SummaryRow {
        order_sn: TOTAL_ORDER_SN.to_string(),
        cells: sum_columns(columns.len(), counted_column, &all_rows),
    };

    Report {
        columns,
        detail,
        summary,
        total,
        diagnostics,
    }
}

fn sum_columns(width: usize, counted_column: Option<usize>, rows: &[&DetailRow]) -> Vec<Cell> {
    (0..width)
        .map(|index| {
            let counted = Some(index) == counted_column;
            let mut sum: Option<u64> = None;
            for row in rows {
                let contribution = if counted {
                    row.cells[index].leading_count()
                } else {
                    row.cells[index].number()
                };
                if let Some(value) = contribution {
                    sum = Some(sum.unwrap_or(0).saturating_add(value));
                }
            }
            match (sum, counted) {
                (None, _) => Cell::Empty,
                (Some(value), true) => Cell::Counted(value),
                (Some(value), false) => Cell::Number(value),
            }
        })
        .collect()
}

/// A table that will be materialised as a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellData>>,
    /// Zero-based data-row indices to fill with the triage highlight.
    pub highlight_rows: Vec<u32>,
}

/// A presentation-ready cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellData {
    Empty,
    Text(String),
    Number(f64),
}

impl CellData {
    fn text(value: &str) -> Self {
        CellData::Text(value.to_string())
    }

    /// Display length, used for column autosizing.
    pub fn width(&self) -> usize {
        match self {
            CellData::Empty => 0,
            CellData::Text(value) => value.chars().count(),
            CellData::Number(value) => value.to_string().len(),
        }
    }
}

impl From<Cell> for CellData {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => CellData::Empty,
            Cell::Number(value) => CellData::Number(value as f64),
            Cell::Counted(count) => CellData::Text(format!("{count} + C")),
        }
    }
}

/// Represents all tables required to materialise the report workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBook {
    pub tables: Vec<SheetTable>,
}

/// Renders the tagged report into worksheet tables. This is the presentation
/// boundary: counted-marker cells become `"<n> + C"` text here and nowhere
/// else.
pub fn build_report_book(report: &Report, include_diagnostics: bool) -> ReportBook {
    let mut detail_columns = vec![
        "order_sn".to_string(),
        "SKU Reference No.".to_string(),
        "Variation Name".to_string(),
        "product_info".to_string(),
    ];
    detail_columns.extend(report.columns.iter().cloned());

    let mut highlight_rows = Vec::new();
    let detail_rows = report
        .detail
        .iter()
        .enumerate()
        .map(|(index, row)| {
            if row.is_unmapped() {
                highlight_rows.push(index as u32);
            }
            let mut cells = vec![
                CellData::text(&row.order_sn),
                CellData::text(&row.skus),
                CellData::text(&row.variations),
                CellData::text(&row.product_info),
            ];
            cells.extend(row.cells.iter().map(|cell| CellData::from(*cell)));
            cells
        })
        .collect();

    let mut summary_columns = vec!["order_sn".to_string()];
    summary_columns.extend(report.columns.iter().cloned());
    let summary_rows = report
        .summary
        .iter()
        .chain(std::iter::once(&report.total))
        .map(|row| {
            let mut cells = vec![CellData::text(&row.order_sn)];
            cells.extend(row.cells.iter().map(|cell| CellData::from(*cell)));
            cells
        })
        .collect();

    let mut tables = vec![
        SheetTable {
            sheet_name: DETAIL_SHEET.to_string(),
            columns: detail_columns,
            rows: detail_rows,
            highlight_rows,
        },
        SheetTable {
            sheet_name: SUMMARY_SHEET.to_string(),
            columns: summary_columns,
            rows: summary_rows,
            highlight_rows: Vec::new(),
        },
    ];

    if include_diagnostics {
        tables.push(SheetTable {
            sheet_name: DIAGNOSTICS_SHEET.to_string(),
            columns: [
                "order_sn",
                "sku_raw",
                "sku_norm",
                "category",
                "kit_qty",
                "kits_purchased",
                "unidades",
                "variation_seen",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            rows: report
                .diagnostics
                .iter()
                .map(|diag| {
                    vec![
                        CellData::text(&diag.order_sn),
                        CellData::text(&diag.record.sku_raw),
                        CellData::text(&diag.record.sku_norm),
                        CellData::text(&diag.record.category),
                        CellData::Number(diag.record.kit_qty as f64),
                        CellData::Number(diag.record.kits_purchased as f64),
                        CellData::Number(diag.record.unidades as f64),
                        CellData::text(&diag.record.variation_seen),
                    ]
                })
                .collect(),
            highlight_rows: Vec::new(),
        });
    }

    ReportBook { tables }
}
