//! Splitting a `product_info` blob into item blocks and pulling the labeled
//! fields out of each block.
//!
//! Marketplace exports embed one block per purchased line item, each opened by
//! a bracketed positional marker (`[1] ...`). Field extraction is regex-driven
//! and total: a field that does not match degrades to its documented default
//! (empty SKU/variation, quantity 1) instead of failing the pipeline.
//!
//! Quantity extraction is an ordered rule list rather than a single pattern,
//! so new export formats can be covered by appending a rule without touching
//! the resolution logic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ItemFields;

static BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\][^\[]+").expect("valid regex"));

static SKU_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)SKU Reference No\.\s*:\s*([A-Za-z0-9_\-\. ]+)").expect("valid regex")
});

static VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Variation Name\s*:\s*([^;\n]+)").expect("valid regex"));

/// Quantity matchers in decreasing precedence; the first rule that matches
/// and parses wins, the rest are ignored.
static QUANTITY_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Quantity:\s*(\d+)",
        r#"(?i)"Quantity"\s*[:=]\s*"?(\d+)"?"#,
        r"(?i)\bqty\s*[:=]\s*(\d+)",
        r"(?i)\bquantity\s*[:=]\s*(\d+)",
        r"(?i)^\s*\[(\d+)\]\s",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Splits product-info text into one block per purchased line item.
///
/// A block runs from a bracketed marker up to the next marker or the end of
/// the text. Text without any marker is treated as a single block.
pub fn split_blocks(text: &str) -> Vec<&str> {
    let blocks: Vec<&str> = BLOCK_RE.find_iter(text).map(|m| m.as_str()).collect();
    if blocks.is_empty() { vec![text] } else { blocks }
}

/// Extracts SKU, variation label, and quantity from one item block.
pub fn extract_fields(block: &str) -> ItemFields {
    ItemFields {
        sku_raw: capture_trimmed(&SKU_RE, block),
        variation: capture_trimmed(&VAR_RE, block),
        quantity: extract_quantity(block),
    }
}

fn capture_trimmed(pattern: &Regex, block: &str) -> String {
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn extract_quantity(block: &str) -> u64 {
    for rule in QUANTITY_RULES.iter() {
        let Some(caps) = rule.captures(block) else {
            continue;
        };
        // A token too large for u64 fails this rule and falls through.
        if let Ok(quantity) = caps[1].parse::<u64>() {
            return quantity;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_marked_blocks() {
        let text = "[1] SKU Reference No. : ABC; Quantity: 2 [2] SKU Reference No. : DEF; Quantity: 3";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);

        let first = extract_fields(blocks[0]);
        assert_eq!(first.sku_raw, "ABC");
        assert_eq!(first.quantity, 2);

        let second = extract_fields(blocks[1]);
        assert_eq!(second.sku_raw, "DEF");
        assert_eq!(second.quantity, 3);
    }

    #[test]
    fn unmarked_text_is_a_single_block() {
        let blocks = split_blocks("SKU Reference No. : ABC; Quantity: 4");
        assert_eq!(blocks, ["SKU Reference No. : ABC; Quantity: 4"]);
    }

    #[test]
    fn blocks_span_newlines() {
        let text = "[1] SKU Reference No. : ABC\nVariation Name : 2 units\n[2] SKU Reference No. : DEF";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(extract_fields(blocks[0]).variation, "2 units");
    }

    #[test]
    fn labeled_quantity_beats_short_keys() {
        let fields = extract_fields("Quantity: 5 qty=9");
        assert_eq!(fields.quantity, 5);
    }

    #[test]
    fn quoted_quantity_form_is_recognized() {
        assert_eq!(extract_fields(r#""Quantity"="7""#).quantity, 7);
    }

    #[test]
    fn leading_index_is_the_last_resort() {
        assert_eq!(extract_fields("[3] SKU Reference No. : ABC").quantity, 3);
    }

    #[test]
    fn absent_fields_degrade_to_defaults() {
        let fields = extract_fields("free text without any labels");
        assert_eq!(fields.sku_raw, "");
        assert_eq!(fields.variation, "");
        assert_eq!(fields.quantity, 1);
    }

    #[test]
    fn variation_stops_at_semicolon_or_line_end() {
        let fields = extract_fields("Variation Name : Encosto + Capa; Quantity: 1");
        assert_eq!(fields.variation, "Encosto + Capa");

        let fields = extract_fields("Variation Name : Encosto\nQuantity: 1");
        assert_eq!(fields.variation, "Encosto");
    }

    #[test]
    fn sku_value_is_trimmed() {
        let fields = extract_fields("SKU Reference No. : 2Promo Novo ; Quantity: 1");
        assert_eq!(fields.sku_raw, "2Promo Novo");
    }

    #[test]
    fn oversized_quantity_falls_through_to_next_rule() {
        let fields = extract_fields("[2] Quantity: 99999999999999999999999");
        assert_eq!(fields.quantity, 2);
    }
}
