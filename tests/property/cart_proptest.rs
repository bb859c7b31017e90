//! Property-based tests for the persisted cart

use std::collections::HashMap;
use std::sync::Arc;

use bizdesk::desk_app::{CartStore, CountBadge, MemoryStorage};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_quantity_counts_every_add(ids in prop::collection::vec(1i64..6, 0..40)) {
        let mut cart = CartStore::new(Arc::new(MemoryStorage::new()));
        let badge = Arc::new(CountBadge::default());
        cart.subscribe(badge.clone());

        for id in &ids {
            cart.add_to_cart(*id, &format!("Produto {}", id), 2.5).unwrap();
        }

        let mut expected: HashMap<i64, u32> = HashMap::new();
        for id in &ids {
            *expected.entry(*id).or_default() += 1;
        }

        let items = cart.items();
        prop_assert_eq!(items.len(), expected.len());
        for item in &items {
            prop_assert_eq!(Some(item.counted_quantity()), expected.get(&item.id).copied());
        }
        prop_assert_eq!(cart.update_cart_count() as usize, ids.len());
        prop_assert_eq!(badge.get() as usize, ids.len());
    }

    #[test]
    fn test_total_is_price_times_adds(adds in 0usize..20, price in 0.0f64..500.0) {
        let cart = CartStore::new(Arc::new(MemoryStorage::new()));
        for _ in 0..adds {
            cart.add_to_cart(7, "Filtro", price).unwrap();
        }
        prop_assert!((cart.total() - price * adds as f64).abs() < 1e-6);
    }
}
