use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use lista_brasoft::config::{CategoryMap, CategorySpec};
use lista_brasoft::fill;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn write_orders(path: &Path, rows: &[(&str, &str)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .write_string(0, 0, "order_sn")
        .expect("header written");
    worksheet
        .write_string(0, 1, "product_info")
        .expect("header written");
    for (index, (order_sn, product_info)) in rows.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet
            .write_string(row, 0, *order_sn)
            .expect("cell written");
        worksheet
            .write_string(row, 1, *product_info)
            .expect("cell written");
    }
    workbook.save(path).expect("orders workbook saved");
}

fn category_map() -> CategoryMap {
    let mut map = CategoryMap::default();
    for (name, aliases) in [
        ("R70", vec!["r70"]),
        ("ENC", vec!["enc"]),
        ("ENC_CAPA", Vec::new()),
    ] {
        map.categories.insert(
            name.to_string(),
            CategorySpec {
                aliases: aliases.into_iter().map(str::to_string).collect(),
                ..CategorySpec::default()
            },
        );
    }
    map
}

fn sheet_to_strings(path: &Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("report opened");
    let range = workbook
        .worksheet_range(sheet)
        .expect("sheet present")
        .expect("sheet read");
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    DataType::String(value) => value.clone(),
                    DataType::Float(value) => value.to_string(),
                    DataType::Int(value) => value.to_string(),
                    DataType::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn fill_produces_summary_and_total() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("orders.xlsx");
    let output = temp_dir.path().join("preenchido.xlsx");
    write_orders(
        &input,
        &[
            (
                "A",
                "[1] SKU Reference No. : R70; Variation Name : 2 units; Quantity: 4",
            ),
            (
                "B",
                "[1] SKU Reference No. : ENC; Variation Name : Encosto + Capa Extra; Quantity: 2",
            ),
        ],
    );

    fill::fill_workbook(&input, &output, &category_map(), true).expect("workbook filled");

    let resumo = sheet_to_strings(&output, "Resumo");
    assert_eq!(resumo[0], ["order_sn", "R70", "ENC", "ENC_CAPA"]);
    assert_eq!(resumo[1], ["A", "8", "", ""]);
    assert_eq!(resumo[2], ["B", "", "", "2 + C"]);
    assert_eq!(resumo[3], ["TOTAL", "8", "", "2 + C"]);

    let detail = sheet_to_strings(&output, "ItensDetalhados");
    assert_eq!(
        detail[0][..4],
        ["order_sn", "SKU Reference No.", "Variation Name", "product_info"]
    );
    assert_eq!(detail[1][1], "R70");
    assert_eq!(detail[1][2], "2 units");

    let diagnostico = sheet_to_strings(&output, "Diagnostico");
    assert_eq!(diagnostico.len(), 3);
    assert_eq!(diagnostico[2][3], "ENC_CAPA");
}

#[test]
fn no_diagnostics_flag_drops_the_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("orders.xlsx");
    let output = temp_dir.path().join("preenchido.xlsx");
    write_orders(&input, &[("A", "SKU Reference No. : R70; Quantity: 1")]);

    fill::fill_workbook(&input, &output, &category_map(), false).expect("workbook filled");

    let workbook: Xlsx<_> = open_workbook(&output).expect("report opened");
    assert_eq!(workbook.sheet_names(), ["ItensDetalhados", "Resumo"]);
}

#[test]
fn unmapped_order_stays_empty_but_diagnosed() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("orders.xlsx");
    let output = temp_dir.path().join("preenchido.xlsx");
    write_orders(
        &input,
        &[("A", "[1] SKU Reference No. : mystery; Quantity: 2")],
    );

    fill::fill_workbook(&input, &output, &category_map(), true).expect("workbook filled");

    let resumo = sheet_to_strings(&output, "Resumo");
    assert_eq!(resumo[1], ["A", "", "", ""]);

    let diagnostico = sheet_to_strings(&output, "Diagnostico");
    assert_eq!(diagnostico[1][1], "mystery");
    assert_eq!(diagnostico[1][3], "");
}

#[test]
fn map_loaded_from_disk_drives_the_fill() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("orders.xlsx");
    let output = temp_dir.path().join("preenchido.xlsx");
    let map_path = temp_dir.path().join("sku_map.json");
    write_orders(&input, &[("A", "SKU Reference No. : 2 Promo; Quantity: 3")]);

    std::fs::write(
        &map_path,
        r#"{"categories": {"PR": {"aliases": ["2Promo"]}}}"#,
    )
    .expect("map written");
    let map = CategoryMap::load(&map_path).expect("map loaded");

    fill::fill_workbook(&input, &output, &map, false).expect("workbook filled");

    let resumo = sheet_to_strings(&output, "Resumo");
    assert_eq!(resumo[0], ["order_sn", "PR"]);
    assert_eq!(resumo[1], ["A", "3"]);
    assert_eq!(resumo[2], ["TOTAL", "3"]);
}
