//! Stock allocation maps and net delta computation
//!
//! Both workflow services reason about stock per product, not per line
//! item: a payload may name the same product on several lines, and an
//! update may shuffle quantities between lines. Collapsing everything to
//! a per-product map first means a single signed adjustment per product,
//! with no transient window where stock dips negative and recovers.

use std::collections::BTreeMap;

/// Quantity per product id ("table:id" string form)
pub type AllocationMap = BTreeMap<String, i64>;

/// Accumulate line quantities into a per-product map
pub fn allocation_map(lines: impl IntoIterator<Item = (String, i64)>) -> AllocationMap {
    let mut map = AllocationMap::new();
    for (product, quantity) in lines {
        *map.entry(product).or_insert(0) += quantity;
    }
    map
}

/// Net per-product change between two allocations: `new - old`.
///
/// Positive values mean the new allocation demands more of the product,
/// negative values mean it releases some. Products with no net change
/// are omitted.
pub fn net_deltas(old: &AllocationMap, new: &AllocationMap) -> AllocationMap {
    let mut deltas = AllocationMap::new();
    for (product, &quantity) in new {
        let before = old.get(product).copied().unwrap_or(0);
        if quantity != before {
            deltas.insert(product.clone(), quantity - before);
        }
    }
    for (product, &quantity) in old {
        if !new.contains_key(product) {
            deltas.insert(product.clone(), -quantity);
        }
    }
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(pairs: &[(&str, i64)]) -> AllocationMap {
        pairs
            .iter()
            .map(|(p, q)| (p.to_string(), *q))
            .collect()
    }

    #[test]
    fn test_allocation_map_accumulates_duplicate_products() {
        let map = allocation_map(vec![
            ("product:pen".to_string(), 2),
            ("product:ink".to_string(), 1),
            ("product:pen".to_string(), 3),
        ]);
        assert_eq!(map.get("product:pen"), Some(&5));
        assert_eq!(map.get("product:ink"), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_net_deltas_unchanged_product_is_omitted() {
        let old = alloc(&[("product:pen", 3)]);
        let new = alloc(&[("product:pen", 3)]);
        assert!(net_deltas(&old, &new).is_empty());
    }

    #[test]
    fn test_net_deltas_added_product_is_positive() {
        let old = alloc(&[]);
        let new = alloc(&[("product:pen", 4)]);
        let deltas = net_deltas(&old, &new);
        assert_eq!(deltas.get("product:pen"), Some(&4));
    }

    #[test]
    fn test_net_deltas_removed_product_is_negative() {
        let old = alloc(&[("product:pen", 4)]);
        let new = alloc(&[]);
        let deltas = net_deltas(&old, &new);
        assert_eq!(deltas.get("product:pen"), Some(&-4));
    }

    #[test]
    fn test_net_deltas_mixed() {
        let old = alloc(&[("product:pen", 5), ("product:ink", 2), ("product:pad", 1)]);
        let new = alloc(&[("product:pen", 3), ("product:ink", 2), ("product:clip", 6)]);
        let deltas = net_deltas(&old, &new);
        assert_eq!(deltas.get("product:pen"), Some(&-2));
        assert_eq!(deltas.get("product:ink"), None);
        assert_eq!(deltas.get("product:pad"), Some(&-1));
        assert_eq!(deltas.get("product:clip"), Some(&6));
    }

    #[test]
    fn test_net_deltas_quantity_shuffle_between_lines_nets_out() {
        // Two lines of the same product swap quantities: no net change
        let old = allocation_map(vec![
            ("product:pen".to_string(), 2),
            ("product:pen".to_string(), 5),
        ]);
        let new = allocation_map(vec![
            ("product:pen".to_string(), 5),
            ("product:pen".to_string(), 2),
        ]);
        assert!(net_deltas(&old, &new).is_empty());
    }
}
