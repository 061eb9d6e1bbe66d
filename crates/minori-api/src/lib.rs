//! HTTP client for the anime catalog backend.
//!
//! The backend exposes a small JSON API (search, curated rankings, filtered
//! random draws, per-title detail, and the authenticated user's list
//! mutations). Everything network-facing lives here; presentation state is
//! built on top of the [`traits::CatalogService`] abstraction so it never
//! touches `reqwest` directly.

pub mod client;
pub mod error;
pub mod request;
pub mod traits;
pub mod types;

pub use client::CatalogClient;
pub use error::ApiError;
pub use request::{CuratedKind, FilterSet, PageRequest, SortKey, LIST_PAGE_SIZE, RANDOM_PAGE_SIZE};
pub use traits::CatalogService;
