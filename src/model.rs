//! Data representations flowing through the enrichment pipeline: raw order
//! rows on the way in, extracted item fields in the middle, and tagged
//! per-item outputs plus diagnostic records on the way out.

/// The free-text product description cell of an order row.
///
/// Only text cells are split into item blocks; any other cell kind is carried
/// for display but contributes zero items (uncontrolled input degrades, it
/// never errors).
#[derive(Debug, Clone, PartialEq)]
pub enum ProductInfo {
    /// A text cell, candidate for block splitting.
    Text(String),
    /// A non-text cell (number, boolean, error), kept as its display string.
    Other(String),
    /// An empty or absent cell.
    Empty,
}

impl ProductInfo {
    /// The text to split into item blocks, when the cell was textual.
    pub fn text(&self) -> Option<&str> {
        match self {
            ProductInfo::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The as-seen rendering used in the detail sheet.
    pub fn display(&self) -> &str {
        match self {
            ProductInfo::Text(value) | ProductInfo::Other(value) => value,
            ProductInfo::Empty => "",
        }
    }
}

/// One row of the orders export.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    /// Order identifier used for grouping. Synthesized (`#<n>`) when the
    /// export carries no `order_sn` column.
    pub order_sn: String,
    pub product_info: ProductInfo,
}

/// Fields pulled out of a single item block.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    /// SKU as it appears in the block; empty when the label is absent.
    pub sku_raw: String,
    /// Variation label as it appears in the block; empty when absent.
    pub variation: String,
    /// Purchased quantity; defaults to 1 when no pattern matched.
    pub quantity: u64,
}

/// The contribution a classified item makes to its category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValue {
    /// Total units (kit quantity times kits purchased).
    Numeric(u64),
    /// Purchased kits for the counted-marker category, rendered `"<n> + C"`.
    CountedKits(u64),
}

/// A classified item's output: which column it lands in and with what value.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutput {
    pub category: String,
    pub value: ItemValue,
}

/// Diagnostic trail for one parsed item block, produced whether or not the
/// item resolved to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub sku_raw: String,
    pub sku_norm: String,
    /// Resolved category name, empty when unclassified.
    pub category: String,
    pub kit_qty: u64,
    pub kits_purchased: u64,
    pub unidades: u64,
    pub variation_seen: String,
}
