use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{ListError, Result};
use crate::model::{OrderRow, ProductInfo};

/// Header of the required product-description column.
pub const PRODUCT_INFO_COLUMN: &str = "product_info";
/// Header of the optional order-identifier column.
pub const ORDER_SN_COLUMN: &str = "order_sn";

/// Reads order rows from the first worksheet of a marketplace export.
///
/// The header row must carry a `product_info` column. When `order_sn` is
/// absent, each row gets a synthesized `#<n>` identifier so it aggregates as
/// its own order.
pub fn read_orders(path: &Path) -> Result<Vec<OrderRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_first_sheet(&mut workbook)?;

    let headers: Vec<String> = match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };
    let product_info_col = headers
        .iter()
        .position(|header| header == PRODUCT_INFO_COLUMN)
        .ok_or_else(|| ListError::MissingColumn(PRODUCT_INFO_COLUMN.to_string()))?;
    let order_sn_col = headers.iter().position(|header| header == ORDER_SN_COLUMN);

    let mut orders = Vec::new();
    for (index, row) in range.rows().skip(1).enumerate() {
        let order_sn = match order_sn_col {
            Some(col) => cell_to_string(row.get(col)),
            None => format!("#{}", index + 1),
        };
        let product_info = match row.get(product_info_col) {
            Some(DataType::String(value)) => ProductInfo::Text(value.clone()),
            Some(DataType::Empty) | None => ProductInfo::Empty,
            Some(other) => ProductInfo::Other(other.to_string()),
        };
        orders.push(OrderRow {
            order_sn,
            product_info,
        });
    }
    Ok(orders)
}

fn read_first_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
) -> Result<calamine::Range<DataType>> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ListError::InvalidWorkbook("workbook has no sheets".into()))?;
    let range_result = workbook
        .worksheet_range(&name)
        .ok_or_else(|| ListError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ListError::from)?;
    Ok(range)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_orders_sheet(path: &Path, headers: &[&str], rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, *header)
                .expect("header written");
        }
        for (row_idx, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet
                    .write_string((row_idx + 1) as u32, col as u16, *value)
                    .expect("cell written");
            }
        }
        workbook.save(path).expect("workbook saved");
    }

    #[test]
    fn reads_order_and_product_columns() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("orders.xlsx");
        write_orders_sheet(
            &path,
            &["order_sn", "buyer", "product_info"],
            &[&["A1", "someone", "SKU Reference No. : R70"]],
        );

        let orders = read_orders(&path).expect("orders read");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_sn, "A1");
        assert_eq!(
            orders[0].product_info,
            ProductInfo::Text("SKU Reference No. : R70".to_string())
        );
    }

    #[test]
    fn synthesizes_ids_without_order_column() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("orders.xlsx");
        write_orders_sheet(&path, &["product_info"], &[&["first"], &["second"]]);

        let orders = read_orders(&path).expect("orders read");
        assert_eq!(orders[0].order_sn, "#1");
        assert_eq!(orders[1].order_sn, "#2");
    }

    #[test]
    fn missing_product_info_column_is_an_error() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("orders.xlsx");
        write_orders_sheet(&path, &["order_sn"], &[&["A1"]]);

        match read_orders(&path) {
            Err(ListError::MissingColumn(column)) => assert_eq!(column, "product_info"),
            other => panic!("expected missing column error, got {other:?}"),
        }
    }

    #[test]
    fn empty_product_cell_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("orders.xlsx");
        write_orders_sheet(&path, &["order_sn", "product_info"], &[&["A1"]]);

        let orders = read_orders(&path).expect("orders read");
        assert_eq!(orders[0].product_info, ProductInfo::Empty);
    }
}
