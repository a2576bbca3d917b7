//! JSON-blob persistence.
//!
//! State lives in one JSON file per key under the data directory, mirroring
//! the string-keyed blobs of the system this replaces: the three master
//! lists plus the order ledger. Keys that have no persisted file yet are
//! served from the embedded seed data and only written once first mutated.
//! The routing table is static and never persisted.
//!
//! Every mutation publishes the changed key on a broadcast channel so other
//! connected clients can re-read — best-effort cache invalidation, not a
//! consistency protocol.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::models::{Item, Location, Order, OrderStatus, Supplier};
use crate::seed;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Persisted storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    MasterItems,
    MasterLocations,
    MasterSuppliers,
    LocalOrders,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::MasterItems => "master_items",
            StoreKey::MasterLocations => "master_locations",
            StoreKey::MasterSuppliers => "master_suppliers",
            StoreKey::LocalOrders => "local_orders",
        }
    }
}

pub struct JsonStore {
    data_dir: PathBuf,
    items: RwLock<Vec<Item>>,
    locations: RwLock<Vec<Location>>,
    suppliers: RwLock<Vec<Supplier>>,
    orders: RwLock<Vec<Order>>,
    route_map: HashMap<String, Vec<String>>,
    changes: broadcast::Sender<StoreKey>,
}

impl JsonStore {
    /// Opens the store, loading each key from disk when a persisted copy
    /// exists and falling back to the embedded seeds otherwise. Malformed
    /// persisted JSON fails startup rather than silently resetting state.
    pub async fn open(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        let items =
            load_or_seed(&data_dir, StoreKey::MasterItems, || seed::ITEMS.clone()).await?;
        let locations = load_or_seed(&data_dir, StoreKey::MasterLocations, || {
            seed::LOCATIONS.clone()
        })
        .await?;
        let suppliers = load_or_seed(&data_dir, StoreKey::MasterSuppliers, || {
            seed::SUPPLIERS.clone()
        })
        .await?;
        let orders = load_or_seed(&data_dir, StoreKey::LocalOrders, seed::orders).await?;

        let route_map = seed::ROUTE_MAP.clone();
        for (source, dests) in &route_map {
            for dest in dests {
                let known = locations.iter().any(|l| &l.id == dest)
                    || suppliers.iter().any(|s| &s.id == dest);
                if !known {
                    warn!(source, dest, "route map references an unknown entity");
                }
            }
        }

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        info!(
            data_dir = %data_dir.display(),
            items = items.len(),
            locations = locations.len(),
            suppliers = suppliers.len(),
            orders = orders.len(),
            "Storage ready"
        );

        Ok(Self {
            data_dir,
            items: RwLock::new(items),
            locations: RwLock::new(locations),
            suppliers: RwLock::new(suppliers),
            orders: RwLock::new(orders),
            route_map,
            changes,
        })
    }

    /// Subscribe to change notices for all keys.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreKey> {
        self.changes.subscribe()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    pub async fn locations(&self) -> Vec<Location> {
        self.locations.read().await.clone()
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.suppliers.read().await.clone()
    }

    /// Full ledger, newest first.
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    /// Destination ids reachable from a source. Unknown sources map to an
    /// empty slice rather than an error.
    pub fn route_ids(&self, source_id: &str) -> &[String] {
        self.route_map
            .get(source_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub async fn replace_items(&self, next: Vec<Item>) -> Result<(), ServiceError> {
        self.persist(StoreKey::MasterItems, &next).await?;
        *self.items.write().await = next;
        self.notify(StoreKey::MasterItems);
        Ok(())
    }

    pub async fn replace_locations(&self, next: Vec<Location>) -> Result<(), ServiceError> {
        self.persist(StoreKey::MasterLocations, &next).await?;
        *self.locations.write().await = next;
        self.notify(StoreKey::MasterLocations);
        Ok(())
    }

    pub async fn replace_suppliers(&self, next: Vec<Supplier>) -> Result<(), ServiceError> {
        self.persist(StoreKey::MasterSuppliers, &next).await?;
        *self.suppliers.write().await = next;
        self.notify(StoreKey::MasterSuppliers);
        Ok(())
    }

    /// Appends a freshly placed order to the head of the ledger. The write
    /// hits disk before memory so a failed persist leaves both unchanged.
    pub async fn prepend_order(&self, order: Order) -> Result<(), ServiceError> {
        let mut orders = self.orders.write().await;
        let mut next = Vec::with_capacity(orders.len() + 1);
        next.push(order);
        next.extend(orders.iter().cloned());
        self.persist(StoreKey::LocalOrders, &next).await?;
        *orders = next;
        drop(orders);
        self.notify(StoreKey::LocalOrders);
        Ok(())
    }

    /// Flips the status of an existing order. Orders are never deleted;
    /// this is the only permitted mutation after creation. Persists first
    /// and swaps the in-memory ledger only on success, so a failed write
    /// never leaves memory ahead of disk.
    pub async fn set_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, ServiceError> {
        let mut orders = self.orders.write().await;
        let idx = orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;
        let mut next = orders.clone();
        next[idx].status = status;
        self.persist(StoreKey::LocalOrders, &next).await?;
        let updated = next[idx].clone();
        *orders = next;
        drop(orders);
        self.notify(StoreKey::LocalOrders);
        Ok(updated)
    }

    fn notify(&self, key: StoreKey) {
        // No receivers is fine; notices are advisory.
        let _ = self.changes.send(key);
    }

    /// Atomic write: serialize to a temp file in the same directory, then
    /// rename over the target.
    async fn persist<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), ServiceError> {
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn key_path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(format!("{}.json", key.as_str()))
    }
}

async fn load_or_seed<T, F>(data_dir: &Path, key: StoreKey, seed: F) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    let path = data_dir.join(format!("{}.json", key.as_str()));
    match tokio::fs::read(&path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing persisted blob {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(seed()),
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    async fn store_in(dir: &tempfile::TempDir) -> JsonStore {
        JsonStore::open(dir.path()).await.expect("store opens")
    }

    #[tokio::test]
    async fn seeds_when_data_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        assert_eq!(store.items().await.len(), 68);
        assert_eq!(store.locations().await.len(), 13);
        assert_eq!(store.suppliers().await.len(), 6);
        assert_eq!(store.orders().await.len(), 2);
    }

    #[tokio::test]
    async fn mutations_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store_in(&dir).await;
            let mut items = store.items().await;
            items.truncate(3);
            store.replace_items(items).await.unwrap();
        }
        let store = store_in(&dir).await;
        assert_eq!(store.items().await.len(), 3);
        // Untouched keys still come from the seed.
        assert_eq!(store.suppliers().await.len(), 6);
    }

    #[tokio::test]
    async fn prepend_puts_the_order_at_the_head() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let mut order = store.orders().await[0].clone();
        order.id = "ORD-TEST-1".to_string();
        store.prepend_order(order).await.unwrap();

        let orders = store.orders().await;
        assert_eq!(orders[0].id, "ORD-TEST-1");
        assert_eq!(orders.len(), 3);
    }

    #[tokio::test]
    async fn set_order_status_rejects_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let err = store
            .set_order_status("ORD-MISSING", OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_persist_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        // Occupy the temp-file path with a directory so the write fails.
        tokio::fs::create_dir(dir.path().join("local_orders.json.tmp"))
            .await
            .unwrap();

        let err = store
            .set_order_status("ORDER-20231205-002", OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::StorageError(_)));
        let order = store
            .orders()
            .await
            .into_iter()
            .find(|o| o.id == "ORDER-20231205-002")
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let mut order = order;
        order.id = "ORD-TEST-1".to_string();
        assert!(store.prepend_order(order).await.is_err());
        assert_eq!(store.orders().await.len(), 2);
    }

    #[tokio::test]
    async fn malformed_persisted_json_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("local_orders.json"), b"{not json")
            .await
            .unwrap();
        assert!(JsonStore::open(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn change_notices_are_broadcast() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let mut rx = store.subscribe();
        store.replace_items(store.items().await).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), StoreKey::MasterItems);
    }

    #[tokio::test]
    async fn unknown_route_source_yields_empty_slice() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        assert!(store.route_ids("NOPE").is_empty());
        assert_eq!(store.route_ids("S001"), ["F001".to_string()]);
    }
}
