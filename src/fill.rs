use std::path::Path;

use tracing::{debug, info, instrument};

use crate::aggregate::{self, build_report_book};
use crate::config::CategoryMap;
use crate::error::Result;
use crate::io::{excel_read, excel_write};

/// Reads an orders export, runs the enrichment pipeline, and writes the
/// report workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn fill_workbook(
    input: &Path,
    output: &Path,
    map: &CategoryMap,
    diagnostics: bool,
) -> Result<()> {
    let orders = excel_read::read_orders(input)?;
    info!(row_count = orders.len(), "read order rows from workbook");
    let report = aggregate::enrich(&orders, map);
    info!(
        item_count = report.diagnostics.len(),
        order_count = report.summary.len(),
        "orders enriched"
    );
    let book = build_report_book(&report, diagnostics);
    debug!(sheet_count = book.tables.len(), "workbook constructed");
    excel_write::write_workbook(output, &book)
}
