//! Resolving an item to its report category.
//!
//! Resolution is a two-step affair: an alias lookup on the normalized SKU,
//! then override rules driven by the variation label. Product naming embeds
//! accessory bundling in the variation ("Encosto + Capa Extra"), and that
//! bundling reclassifies the item independent of its base SKU alias.

use crate::config::CategoryMap;
use crate::normalize::{normalize_token, squash};

/// Maps an item to a category name, or `None` when the SKU matches no
/// configured alias and no override applies.
pub fn resolve_category(sku_raw: &str, variation: &str, map: &CategoryMap) -> Option<String> {
    let initial = map.category_for_alias(&normalize_token(sku_raw));
    apply_variation_overrides(initial, variation, map)
}

/// Override rules, evaluated in order:
///
/// 1. backrest and an extra cover → the enc-capa category, regardless of the
///    initial resolution;
/// 2. backrest bundled with a cover (but not an extra one) → the enc-base
///    category, unless already resolved to the enc-capa category;
/// 3. otherwise the initial resolution stands.
fn apply_variation_overrides(
    initial: Option<&str>,
    variation: &str,
    map: &CategoryMap,
) -> Option<String> {
    let rules = &map.special_rules;
    let key = normalize_token(variation);
    let has_encosto = key.contains("encosto");

    if has_encosto && key.contains("capaextra") {
        return Some(rules.enc_capa_category.clone());
    }
    // "+capa" is matched on the squashed form: full normalization strips the
    // "+" the rule hinges on.
    let with_cover = key.contains("comcapa") || squash(variation).contains("+capa");
    if has_encosto && with_cover && initial != Some(rules.enc_capa_category.as_str()) {
        return Some(rules.enc_base_category.clone());
    }
    initial.map(str::to_string)
}
