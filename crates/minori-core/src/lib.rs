//! Presentation-state layer for the anime catalog client.
//!
//! Ties search input, curated rankings, filters, sort order, NSFW gating,
//! and server-driven pagination together into consistent view state. The
//! controller owns all of it explicitly, with no ambient shared state, and
//! talks to the backend only through `minori_api::CatalogService`.

pub mod debounce;
pub mod format;
pub mod modal;
pub mod mutations;
pub mod prefs;
pub mod query;
pub mod render;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod testutil;

pub use debounce::Debouncer;
pub use modal::ModalViewer;
pub use mutations::ListMutations;
pub use prefs::{PrefStore, Theme};
pub use query::{PageConfig, QueryController};
pub use watchlist::WatchList;
