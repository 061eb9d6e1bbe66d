//! List-mutation handlers.
//!
//! Each handler disables its triggering control for the duration of exactly
//! one request (the in-flight set), applies the UI effect only on confirmed
//! success, and re-enables the control on every exit path. The set is
//! interior-mutable so a second trigger arriving while an earlier call is
//! still awaiting sees the id claimed and is ignored. No retries: a failure
//! surfaces a blocking notice and leaves prior state intact.

use std::collections::HashSet;
use std::sync::Mutex;

use minori_api::types::{Ack, AnimeSummary, ToggleOutcome};
use minori_api::CatalogService;

use crate::watchlist::WatchList;

pub const CONNECTION_ERROR: &str = "Ошибка соединения с сервером";
pub const UPDATE_ERROR: &str = "Ошибка при обновлении";
pub const DELETE_ERROR: &str = "Ошибка при удалении";
pub const TOGGLE_ERROR: &str = "Не удалось добавить в список";
pub const NSFW_SAVED: &str = "Настройки 18+ обновлены!";

/// What the UI should do after a handler completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Toggle confirmed; flip the button face to the new membership state.
    Toggled { in_list: bool },
    /// Edit confirmed; no visual change beyond the control's own state.
    Updated,
    /// Delete confirmed; remove the card element.
    Deleted,
    /// NSFW flag saved server-side; show the confirmation notice.
    NsfwSaved,
    /// The control was already busy with an earlier request; ignored.
    Busy,
    /// Blocking notice; prior state intact.
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ListMutations {
    in_flight: Mutex<HashSet<u64>>,
}

impl ListMutations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, id: u64) -> bool {
        self.in_flight.lock().unwrap().contains(&id)
    }

    fn claim(&self, id: u64) -> bool {
        self.in_flight.lock().unwrap().insert(id)
    }

    fn release(&self, id: u64) {
        self.in_flight.lock().unwrap().remove(&id);
    }

    /// Add or remove one title. The watch-list cache is updated only after
    /// the server confirmed the toggle.
    pub async fn toggle<S: CatalogService>(
        &self,
        service: &S,
        watchlist: &mut WatchList,
        anime: &AnimeSummary,
    ) -> MutationOutcome {
        let id = anime.mal_id;
        if !self.claim(id) {
            return MutationOutcome::Busy;
        }
        let result = service.toggle_list(anime).await;
        self.release(id);

        match result {
            Ok(ToggleOutcome::Added) => {
                watchlist.insert(id);
                MutationOutcome::Toggled { in_list: true }
            }
            Ok(ToggleOutcome::Removed) => {
                watchlist.remove(id);
                MutationOutcome::Toggled { in_list: false }
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "toggle failed");
                MutationOutcome::Failed(TOGGLE_ERROR.to_string())
            }
        }
    }

    pub async fn set_status<S: CatalogService>(
        &self,
        service: &S,
        id: u64,
        status: &str,
    ) -> MutationOutcome {
        if !self.claim(id) {
            return MutationOutcome::Busy;
        }
        let result = service.update_status(id, status).await;
        self.release(id);
        ack_outcome(result, UPDATE_ERROR)
    }

    /// `None` clears the score.
    pub async fn set_score<S: CatalogService>(
        &self,
        service: &S,
        id: u64,
        score: Option<u8>,
    ) -> MutationOutcome {
        if !self.claim(id) {
            return MutationOutcome::Busy;
        }
        let result = service.update_score(id, score).await;
        self.release(id);
        ack_outcome(result, UPDATE_ERROR)
    }

    pub async fn set_privacy<S: CatalogService>(
        &self,
        service: &S,
        id: u64,
        is_private: bool,
    ) -> MutationOutcome {
        if !self.claim(id) {
            return MutationOutcome::Busy;
        }
        let result = service.update_privacy(id, is_private).await;
        self.release(id);
        ack_outcome(result, UPDATE_ERROR)
    }

    pub async fn set_comment<S: CatalogService>(
        &self,
        service: &S,
        id: u64,
        comment: &str,
    ) -> MutationOutcome {
        if !self.claim(id) {
            return MutationOutcome::Busy;
        }
        let result = service.update_comment(id, comment).await;
        self.release(id);
        ack_outcome(result, UPDATE_ERROR)
    }

    /// The card is removed only after server confirmation.
    pub async fn delete<S: CatalogService>(&self, service: &S, id: u64) -> MutationOutcome {
        if !self.claim(id) {
            return MutationOutcome::Busy;
        }
        let result = service.delete_from_list(id).await;
        self.release(id);
        match ack_outcome(result, DELETE_ERROR) {
            MutationOutcome::Updated => MutationOutcome::Deleted,
            other => other,
        }
    }

    /// Push the NSFW flag to the server for an authenticated user.
    pub async fn push_nsfw<S: CatalogService>(
        &self,
        service: &S,
        allowed: bool,
    ) -> MutationOutcome {
        match service.set_nsfw(allowed).await {
            Ok(ack) if ack.success => MutationOutcome::NsfwSaved,
            Ok(ack) => MutationOutcome::Failed(
                ack.error.unwrap_or_else(|| UPDATE_ERROR.to_string()),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "set_nsfw failed");
                MutationOutcome::Failed(CONNECTION_ERROR.to_string())
            }
        }
    }
}

fn ack_outcome<E: std::error::Error>(result: Result<Ack, E>, failure: &str) -> MutationOutcome {
    match result {
        Ok(ack) if ack.success => MutationOutcome::Updated,
        Ok(ack) => {
            if let Some(error) = ack.error {
                tracing::warn!(error, "mutation refused");
            }
            MutationOutcome::Failed(failure.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "mutation request failed");
            MutationOutcome::Failed(CONNECTION_ERROR.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{summary, FakeCatalog, FakeError};

    #[tokio::test]
    async fn toggle_round_trip_restores_membership() {
        let service = FakeCatalog::default();
        service.script_toggle(Ok(ToggleOutcome::Added));
        service.script_toggle(Ok(ToggleOutcome::Removed));

        let handlers = ListMutations::new();
        let mut watchlist = WatchList::new();
        let anime = summary(20, "Naruto");

        let first = handlers.toggle(&service, &mut watchlist, &anime).await;
        assert_eq!(first, MutationOutcome::Toggled { in_list: true });
        assert!(watchlist.contains(20));

        let second = handlers.toggle(&service, &mut watchlist, &anime).await;
        assert_eq!(second, MutationOutcome::Toggled { in_list: false });
        assert!(!watchlist.contains(20));
    }

    #[tokio::test]
    async fn toggle_failure_leaves_cache_untouched() {
        let service = FakeCatalog::default();
        service.script_toggle(Err(FakeError));

        let handlers = ListMutations::new();
        let mut watchlist = WatchList::new();
        watchlist.insert(20);

        let outcome = handlers
            .toggle(&service, &mut watchlist, &summary(20, "Naruto"))
            .await;
        assert_eq!(outcome, MutationOutcome::Failed(TOGGLE_ERROR.into()));
        assert!(watchlist.contains(20));
        // Control is re-enabled after the failure.
        assert!(!handlers.is_busy(20));
    }

    #[tokio::test]
    async fn second_trigger_while_in_flight_is_ignored() {
        let service = FakeCatalog::default();
        let gate = service.hold_next_mutation();
        service.script_ack(Ok(Ack {
            success: true,
            error: None,
        }));

        let handlers = ListMutations::new();
        let mut watchlist = WatchList::new();
        let anime = summary(20, "Naruto");

        // The first call parks inside the request; the second fires while
        // the id is still claimed and must be ignored without touching the
        // service or the cache.
        let slow = handlers.set_status(&service, 20, "watching");
        let retry = async {
            let outcome = handlers.toggle(&service, &mut watchlist, &anime).await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(slow, retry);

        assert_eq!(first, MutationOutcome::Updated);
        assert_eq!(second, MutationOutcome::Busy);
        assert!(watchlist.is_empty());
        // The id is released once the slow call completes.
        assert!(!handlers.is_busy(20));
    }

    #[tokio::test]
    async fn update_distinguishes_refusal_from_transport_failure() {
        let service = FakeCatalog::default();
        service.script_ack(Ok(Ack {
            success: false,
            error: Some("Anime not found".into()),
        }));
        service.script_ack(Err(FakeError));

        let handlers = ListMutations::new();
        let refused = handlers.set_status(&service, 7, "watching").await;
        assert_eq!(refused, MutationOutcome::Failed(UPDATE_ERROR.into()));

        let offline = handlers.set_score(&service, 7, Some(9)).await;
        assert_eq!(offline, MutationOutcome::Failed(CONNECTION_ERROR.into()));
    }

    #[tokio::test]
    async fn delete_removes_card_only_on_confirmation() {
        let service = FakeCatalog::default();
        service.script_ack(Ok(Ack {
            success: true,
            error: None,
        }));
        service.script_ack(Ok(Ack {
            success: false,
            error: None,
        }));

        let handlers = ListMutations::new();
        assert_eq!(
            handlers.delete(&service, 1).await,
            MutationOutcome::Deleted
        );
        assert_eq!(
            handlers.delete(&service, 2).await,
            MutationOutcome::Failed(DELETE_ERROR.into())
        );
    }

    #[tokio::test]
    async fn nsfw_push_reports_confirmation() {
        let service = FakeCatalog::default();
        service.script_ack(Ok(Ack {
            success: true,
            error: None,
        }));

        let handlers = ListMutations::new();
        assert_eq!(
            handlers.push_nsfw(&service, true).await,
            MutationOutcome::NsfwSaved
        );
    }
}
