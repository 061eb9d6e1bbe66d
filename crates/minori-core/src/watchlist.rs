//! In-memory cache of the user's watch-list membership.
//!
//! Hydrated from the server once per page load and mutated only after a
//! confirmed server-side toggle, so it is eventually consistent with the
//! authoritative list. Hydration failure leaves the set empty: cards render
//! as "not in list" rather than blocking the page.

use std::collections::HashSet;

use minori_api::CatalogService;

/// Set of anime ids already on the authenticated user's list.
#[derive(Debug, Clone, Default)]
pub struct WatchList {
    ids: HashSet<u64>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set wholesale from the server. A no-op for anonymous
    /// viewers; any failure fails open to an empty set.
    pub async fn hydrate<S: CatalogService>(&mut self, service: &S, authenticated: bool) {
        if !authenticated {
            return;
        }
        match service.my_anime_ids().await {
            Ok(ids) => {
                tracing::debug!(count = ids.len(), "watch-list hydrated");
                self.ids = ids.into_iter().collect();
            }
            Err(e) => {
                tracing::warn!(error = %e, "watch-list hydration failed, rendering as empty");
                self.ids.clear();
            }
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Record a confirmed addition. Called only after the server reported
    /// the toggle succeeded.
    pub fn insert(&mut self, id: u64) {
        self.ids.insert(id);
    }

    /// Record a confirmed removal.
    pub fn remove(&mut self, id: u64) {
        self.ids.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
