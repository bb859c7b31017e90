//! # Cart Store
//!
//! The cart lives in storage under `keys::CART` as a JSON array of
//! `CartItem`. Storage is the only source of truth: every operation reads
//! the persisted array fresh, mutates it, and writes it back within one
//! synchronous call. Nothing holds a copy across calls, so a write made by
//! another `CartStore` (or another process sharing the directory) is never
//! clobbered by a stale snapshot. Two processes writing at the same moment
//! still race; the last write wins.
//!
//! An absent or unreadable cart is an empty cart, never an error.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::desk_app::notifications::{Notification, NotificationSink};
use crate::desk_app::storage::{keys, read_json, write_json, SharedStorage, StorageError};
use crate::shared::catalog::{CartItem, ProductId};

/// Receives the recomputed cart count
pub trait CartObserver: Send + Sync {
    fn cart_count_changed(&self, count: u32);
}

/// Count badge shown in the top bar
#[derive(Debug, Default)]
pub struct CountBadge {
    count: AtomicU32,
}

impl CountBadge {
    pub fn get(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

impl CartObserver for CountBadge {
    fn cart_count_changed(&self, count: u32) {
        self.count.store(count, Ordering::Relaxed);
    }
}

/// Persisted cart
pub struct CartStore {
    storage: SharedStorage,
    observers: Vec<Arc<dyn CartObserver>>,
    notifier: Option<Arc<dyn NotificationSink>>,
}

impl CartStore {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            observers: Vec::new(),
            notifier: None,
        }
    }

    /// Register a count observer
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// Register where "added to cart" confirmations go
    pub fn set_notifier(&mut self, notifier: Arc<dyn NotificationSink>) {
        self.notifier = Some(notifier);
    }

    /// Fresh snapshot of the persisted cart
    pub fn items(&self) -> Vec<CartItem> {
        read_json(self.storage.as_ref(), keys::CART).unwrap_or_default()
    }

    /// Add one unit of a product, then recompute the count.
    ///
    /// Returns the new count.
    pub fn add_to_cart(&self, id: ProductId, name: &str, price: f64) -> Result<u32, StorageError> {
        let mut items = self.items();
        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => item.increment(),
            None => items.push(CartItem::new(id, name, price)),
        }
        write_json(self.storage.as_ref(), keys::CART, &items)?;

        let count = self.update_cart_count();

        let message = format!("{} adicionado ao carrinho.", name);
        match &self.notifier {
            Some(notifier) => notifier.notify(Notification::success(message)),
            None => tracing::info!(product_id = id, "{}", message),
        }
        Ok(count)
    }

    /// Sum of quantities in the persisted cart, pushed to every observer.
    ///
    /// Call after every mutation and once when the catalog is first shown,
    /// so a cart carried over from an earlier session is reflected.
    pub fn update_cart_count(&self) -> u32 {
        let count = self
            .items()
            .iter()
            .map(CartItem::counted_quantity)
            .fold(0u32, u32::saturating_add);
        for observer in &self.observers {
            observer.cart_count_changed(count);
        }
        count
    }

    /// Sum of price × quantity
    pub fn total(&self) -> f64 {
        self.items().iter().map(CartItem::line_total).sum()
    }

    /// Empty the cart
    pub fn clear(&self) -> Result<u32, StorageError> {
        self.storage.remove_item(keys::CART)?;
        Ok(self.update_cart_count())
    }
}
