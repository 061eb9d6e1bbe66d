//! Service trait for the catalog backend.
//!
//! The controller, watch-list cache, and mutation handlers are written
//! against this trait, so tests drive them with an in-memory fake and the
//! binary plugs in the HTTP client.

use std::future::Future;

use crate::request::PageRequest;
use crate::types::{Ack, AnimeDetail, AnimeSummary, Genre, PageEnvelope, ToggleOutcome};

/// The catalog backend as consumed by the presentation layer.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of grid results for any mode.
    fn fetch_page(
        &self,
        req: &PageRequest,
    ) -> impl Future<Output = Result<PageEnvelope, Self::Error>> + Send;

    /// The selectable genre list for the filter panel.
    fn genres(&self) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send;

    /// Extended detail for one title.
    fn get_anime(&self, id: u64)
        -> impl Future<Output = Result<AnimeDetail, Self::Error>> + Send;

    /// Ids of everything already on the authenticated user's list.
    fn my_anime_ids(&self) -> impl Future<Output = Result<Vec<u64>, Self::Error>> + Send;

    /// Add or remove one title from the user's list.
    fn toggle_list(
        &self,
        anime: &AnimeSummary,
    ) -> impl Future<Output = Result<ToggleOutcome, Self::Error>> + Send;

    /// Mutation acks: a transport failure is `Err`, an application-level
    /// refusal is `Ok` with `success = false`. The handlers surface the
    /// two differently.
    fn update_status(
        &self,
        id: u64,
        status: &str,
    ) -> impl Future<Output = Result<Ack, Self::Error>> + Send;

    /// `None` clears the score.
    fn update_score(
        &self,
        id: u64,
        score: Option<u8>,
    ) -> impl Future<Output = Result<Ack, Self::Error>> + Send;

    fn update_privacy(
        &self,
        id: u64,
        is_private: bool,
    ) -> impl Future<Output = Result<Ack, Self::Error>> + Send;

    fn update_comment(
        &self,
        id: u64,
        comment: &str,
    ) -> impl Future<Output = Result<Ack, Self::Error>> + Send;

    fn delete_from_list(&self, id: u64) -> impl Future<Output = Result<Ack, Self::Error>> + Send;

    /// Persist the server-side NSFW flag for the authenticated user.
    fn set_nsfw(&self, allowed: bool) -> impl Future<Output = Result<Ack, Self::Error>> + Send;
}
