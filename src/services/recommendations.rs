//! Frequently-ordered item detection and catalog listing.
//!
//! An item counts once per past order from the source that contains it;
//! items reaching the configured threshold (default 2) are flagged and
//! sorted to the top of the catalog. No time window is applied to the
//! aggregation — only the separate duplicate-order check is time-bounded.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Item;
use crate::store::JsonStore;

/// A catalog item decorated with its recommendation flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub item: Item,
    pub recommended: bool,
}

/// Catalog listing filters. All optional; an absent `source_id` disables
/// recommendation flagging entirely.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    pub source_id: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub recommended_only: bool,
}

#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<JsonStore>,
    min_count: usize,
}

impl RecommendationService {
    pub fn new(store: Arc<JsonStore>, min_count: usize) -> Self {
        Self { store, min_count }
    }

    /// Ids of items that occurred in at least `min_count` past orders from
    /// the source.
    pub async fn recommended_item_ids(&self, source_id: &str) -> HashSet<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for order in self.store.orders().await {
            if order.source_id != source_id {
                continue;
            }
            for line in &order.items {
                *counts.entry(line.item_id.clone()).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count >= self.min_count)
            .map(|(id, _)| id)
            .collect()
    }

    /// Filtered catalog with recommended items stable-sorted to the front:
    /// ties keep the item-master order.
    pub async fn catalog(&self, filter: &CatalogFilter) -> Vec<CatalogEntry> {
        let recommended = match filter.source_id.as_deref() {
            Some(source_id) => self.recommended_item_ids(source_id).await,
            None => HashSet::new(),
        };
        let search = filter.search.as_deref().map(str::to_lowercase);

        let mut entries: Vec<CatalogEntry> = self
            .store
            .items()
            .await
            .into_iter()
            .filter(|item| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| item.category == c)
            })
            .filter(|item| {
                search.as_deref().map_or(true, |q| {
                    item.name.to_lowercase().contains(q) || item.id.to_lowercase().contains(q)
                })
            })
            .map(|item| {
                let flagged = recommended.contains(&item.id);
                CatalogEntry {
                    item,
                    recommended: flagged,
                }
            })
            .filter(|entry| !filter.recommended_only || entry.recommended)
            .collect();

        entries.sort_by_key(|entry| !entry.recommended);
        entries
    }

    /// Distinct item categories in first-seen (master) order.
    pub async fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.store
            .items()
            .await
            .into_iter()
            .filter_map(|item| seen.insert(item.category.clone()).then_some(item.category))
            .collect()
    }
}
