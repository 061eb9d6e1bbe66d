//! In-memory `CatalogService` fake for controller and handler tests.
//!
//! Responses are scripted per operation and consumed in order; an
//! unscripted call panics so tests fail loudly on unexpected traffic.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use minori_api::request::PageRequest;
use minori_api::types::{Ack, AnimeDetail, AnimeSummary, Genre, PageEnvelope, ToggleOutcome};
use minori_api::CatalogService;

#[derive(Debug, thiserror::Error)]
#[error("соединение оборвалось")]
pub struct FakeError;

#[derive(Default)]
pub struct FakeCatalog {
    pages: Mutex<VecDeque<Result<PageEnvelope, FakeError>>>,
    ids: Mutex<VecDeque<Result<Vec<u64>, FakeError>>>,
    toggles: Mutex<VecDeque<Result<ToggleOutcome, FakeError>>>,
    acks: Mutex<VecDeque<Result<Ack, FakeError>>>,
    details: Mutex<VecDeque<Result<AnimeDetail, FakeError>>>,
    seen_pages: Mutex<Vec<PageRequest>>,
    ids_requests: Mutex<usize>,
    hold: Mutex<Option<Arc<Notify>>>,
}

impl FakeCatalog {
    pub fn script_page(&self, r: Result<PageEnvelope, FakeError>) {
        self.pages.lock().unwrap().push_back(r);
    }

    pub fn script_ids(&self, r: Result<Vec<u64>, FakeError>) {
        self.ids.lock().unwrap().push_back(r);
    }

    pub fn script_toggle(&self, r: Result<ToggleOutcome, FakeError>) {
        self.toggles.lock().unwrap().push_back(r);
    }

    pub fn script_ack(&self, r: Result<Ack, FakeError>) {
        self.acks.lock().unwrap().push_back(r);
    }

    pub fn script_detail(&self, r: Result<AnimeDetail, FakeError>) {
        self.details.lock().unwrap().push_back(r);
    }

    /// Page requests the controller actually issued, in order.
    pub fn seen_pages(&self) -> Vec<PageRequest> {
        self.seen_pages.lock().unwrap().clone()
    }

    pub fn ids_requests(&self) -> usize {
        *self.ids_requests.lock().unwrap()
    }

    /// Make the next mutation call park on the returned gate before
    /// resolving, so a test can observe in-flight state from another future.
    pub fn hold_next_mutation(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn pause(&self) {
        let gate = self.hold.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

impl CatalogService for FakeCatalog {
    type Error = FakeError;

    async fn fetch_page(&self, req: &PageRequest) -> Result<PageEnvelope, FakeError> {
        self.seen_pages.lock().unwrap().push(req.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted fetch_page call")
    }

    async fn genres(&self) -> Result<Vec<Genre>, FakeError> {
        Ok(Vec::new())
    }

    async fn get_anime(&self, _id: u64) -> Result<AnimeDetail, FakeError> {
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted get_anime call")
    }

    async fn my_anime_ids(&self) -> Result<Vec<u64>, FakeError> {
        *self.ids_requests.lock().unwrap() += 1;
        self.ids
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted my_anime_ids call")
    }

    async fn toggle_list(&self, _anime: &AnimeSummary) -> Result<ToggleOutcome, FakeError> {
        self.pause().await;
        self.toggles
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted toggle_list call")
    }

    async fn update_status(&self, _id: u64, _status: &str) -> Result<Ack, FakeError> {
        self.pause().await;
        self.pop_ack()
    }

    async fn update_score(&self, _id: u64, _score: Option<u8>) -> Result<Ack, FakeError> {
        self.pause().await;
        self.pop_ack()
    }

    async fn update_privacy(&self, _id: u64, _is_private: bool) -> Result<Ack, FakeError> {
        self.pause().await;
        self.pop_ack()
    }

    async fn update_comment(&self, _id: u64, _comment: &str) -> Result<Ack, FakeError> {
        self.pause().await;
        self.pop_ack()
    }

    async fn delete_from_list(&self, _id: u64) -> Result<Ack, FakeError> {
        self.pause().await;
        self.pop_ack()
    }

    async fn set_nsfw(&self, _allowed: bool) -> Result<Ack, FakeError> {
        self.pause().await;
        self.pop_ack()
    }
}

impl FakeCatalog {
    fn pop_ack(&self) -> Result<Ack, FakeError> {
        self.acks
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted mutation call")
    }
}

/// A minimal summary for grid and toggle tests.
pub fn summary(id: u64, title: &str) -> AnimeSummary {
    AnimeSummary {
        mal_id: id,
        title: title.to_string(),
        image: None,
        media_type: Some("TV".into()),
        episodes: Some(26),
        start_date: Some("2002-10-03T00:00:00+00:00".into()),
        synopsis: Some("...".into()),
        score: Some(7.99),
        popularity: Some(8),
        genres: vec![],
    }
}

pub fn page_of(items: Vec<AnimeSummary>, has_next: bool) -> PageEnvelope {
    PageEnvelope {
        data: items,
        pagination: Some(minori_api::types::Pagination {
            has_next_page: has_next,
        }),
        total: None,
        error: None,
    }
}
