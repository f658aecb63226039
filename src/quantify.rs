//! Turning one extracted item into its category contribution and its
//! diagnostic record.
//!
//! Variation labels bundle several units into one purchased kit ("2 units"),
//! so the unit total is the kit quantity times the kits purchased. The
//! counted-marker category is the exception: it counts purchased kits, not
//! total units.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::resolve_category;
use crate::config::CategoryMap;
use crate::model::{ItemFields, ItemOutput, ItemRecord, ItemValue};
use crate::normalize::normalize_token;

static KIT_QTY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\b").expect("valid regex"));

/// Units bundled per purchased kit: the first integer anywhere in the
/// variation label, 1 when there is none.
pub fn kit_quantity(variation: &str) -> u64 {
    KIT_QTY_RE
        .captures(variation)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

/// Computes an item's category contribution (if it resolved to a category)
/// and its diagnostic record (always).
pub fn quantify(fields: &ItemFields, map: &CategoryMap) -> (Option<ItemOutput>, ItemRecord) {
    let kit_qty = kit_quantity(&fields.variation);
    let kits_purchased = if fields.quantity != 0 { fields.quantity } else { 1 };
    let unidades = kit_qty.saturating_mul(kits_purchased);

    let category = resolve_category(&fields.sku_raw, &fields.variation, map);
    let output = category.as_deref().map(|name| {
        let counted = name == map.special_rules.enc_capa_category
            && normalize_token(&fields.variation).contains("capaextra");
        ItemOutput {
            category: name.to_string(),
            value: if counted {
                ItemValue::CountedKits(kits_purchased)
            } else {
                ItemValue::Numeric(unidades)
            },
        }
    });

    let record = ItemRecord {
        sku_raw: fields.sku_raw.clone(),
        sku_norm: normalize_token(&fields.sku_raw),
        category: category.unwrap_or_default(),
        kit_qty,
        kits_purchased,
        unidades,
        variation_seen: fields.variation.clone(),
    };
    (output, record)
}
