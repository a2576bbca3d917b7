//! Master data management.
//!
//! The three master lists are admin-editable reference data. Edits replace a
//! list wholesale and are persisted immediately; existing orders keep their
//! snapshots and are never touched by a master edit.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Item, Location, Supplier};
use crate::store::JsonStore;

#[derive(Clone)]
pub struct MasterDataService {
    store: Arc<JsonStore>,
    event_sender: EventSender,
}

impl MasterDataService {
    pub fn new(store: Arc<JsonStore>, event_sender: EventSender) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    pub async fn items(&self) -> Vec<Item> {
        self.store.items().await
    }

    pub async fn locations(&self) -> Vec<Location> {
        self.store.locations().await
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.store.suppliers().await
    }

    pub async fn item(&self, item_id: &str) -> Option<Item> {
        self.store.items().await.into_iter().find(|i| i.id == item_id)
    }

    pub async fn location(&self, location_id: &str) -> Option<Location> {
        self.store
            .locations()
            .await
            .into_iter()
            .find(|l| l.id == location_id)
    }

    /// Display name of any source/destination id. Suppliers take precedence
    /// over locations, matching how documents resolve the receiving side;
    /// unknown ids fall back to the raw id.
    pub async fn display_name(&self, entity_id: &str) -> String {
        if let Some(supplier) = self
            .store
            .suppliers()
            .await
            .into_iter()
            .find(|s| s.id == entity_id)
        {
            return supplier.name;
        }
        if let Some(location) = self
            .store
            .locations()
            .await
            .into_iter()
            .find(|l| l.id == entity_id)
        {
            return location.name;
        }
        entity_id.to_string()
    }

    #[instrument(skip(self, next))]
    pub async fn replace_items(&self, next: Vec<Item>) -> Result<Vec<Item>, ServiceError> {
        validate_ids("item", next.iter().map(|i| i.id.as_str()))?;
        let count = next.len();
        self.store.replace_items(next.clone()).await?;
        self.event_sender
            .send_or_log(Event::MasterDataReplaced {
                kind: "items".to_string(),
                count,
            })
            .await;
        Ok(next)
    }

    #[instrument(skip(self, next))]
    pub async fn replace_locations(
        &self,
        next: Vec<Location>,
    ) -> Result<Vec<Location>, ServiceError> {
        validate_ids("location", next.iter().map(|l| l.id.as_str()))?;
        let count = next.len();
        self.store.replace_locations(next.clone()).await?;
        self.event_sender
            .send_or_log(Event::MasterDataReplaced {
                kind: "locations".to_string(),
                count,
            })
            .await;
        Ok(next)
    }

    #[instrument(skip(self, next))]
    pub async fn replace_suppliers(
        &self,
        next: Vec<Supplier>,
    ) -> Result<Vec<Supplier>, ServiceError> {
        validate_ids("supplier", next.iter().map(|s| s.id.as_str()))?;
        let count = next.len();
        self.store.replace_suppliers(next.clone()).await?;
        self.event_sender
            .send_or_log(Event::MasterDataReplaced {
                kind: "suppliers".to_string(),
                count,
            })
            .await;
        Ok(next)
    }
}

fn validate_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "every {} must have a non-empty id",
                kind
            )));
        }
        if !seen.insert(id) {
            return Err(ServiceError::ValidationError(format!(
                "duplicate {} id: {}",
                kind, id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = validate_ids("item", ["I0001", "I0002", "I0001"].into_iter()).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert!(validate_ids("supplier", ["  "].into_iter()).is_err());
        assert!(validate_ids("supplier", ["SUP001"].into_iter()).is_ok());
    }
}
