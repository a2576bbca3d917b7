//! Route-map lookup: which destinations a source may order from.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::JsonStore;

/// A destination a source may order from: either another location (a
/// factory) or an external supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub kind: DestinationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Location,
    Supplier,
}

#[derive(Clone)]
pub struct RoutingService {
    store: Arc<JsonStore>,
}

impl RoutingService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// Destinations reachable from a source: the locations and suppliers
    /// whose ids appear in the source's route entry, locations first,
    /// deduplicated (the head factory can show up on both sides). A source
    /// with no route entry gets an empty list, not an error.
    pub async fn destinations(&self, source_id: &str) -> Vec<Destination> {
        let dest_ids: HashSet<&String> = self.store.route_ids(source_id).iter().collect();
        if dest_ids.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut combined = Vec::new();
        for location in self.store.locations().await {
            if dest_ids.contains(&location.id) && seen.insert(location.id.clone()) {
                combined.push(Destination {
                    id: location.id,
                    name: location.name,
                    kind: DestinationKind::Location,
                });
            }
        }
        for supplier in self.store.suppliers().await {
            if dest_ids.contains(&supplier.id) && seen.insert(supplier.id.clone()) {
                combined.push(Destination {
                    id: supplier.id,
                    name: supplier.name,
                    kind: DestinationKind::Supplier,
                });
            }
        }
        combined
    }

    /// Auto-selection: a source with exactly one reachable destination gets
    /// it picked automatically; a previous selection that is no longer
    /// reachable is cleared; anything else is left as-is.
    pub async fn effective_destination(
        &self,
        source_id: &str,
        current: Option<&str>,
    ) -> Option<String> {
        let destinations = self.destinations(source_id).await;
        if destinations.len() == 1 {
            return Some(destinations[0].id.clone());
        }
        current
            .filter(|id| destinations.iter().any(|d| d.id == *id))
            .map(str::to_string)
    }

    /// Whether `destination_id` is reachable from `source_id`.
    pub async fn is_reachable(&self, source_id: &str, destination_id: &str) -> bool {
        self.destinations(source_id)
            .await
            .iter()
            .any(|d| d.id == destination_id)
    }
}
