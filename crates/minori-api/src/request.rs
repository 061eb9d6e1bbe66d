//! Typed grid requests and their query-string derivation.
//!
//! The query controller reduces its state to one [`PageRequest`]; this
//! module owns the mapping from that value to the exact parameters the
//! backend expects, so every page mode goes over the wire the same way.

use std::collections::BTreeSet;

/// Page size for search results and curated rankings.
pub const LIST_PAGE_SIZE: u32 = 12;
/// Page size for random and filtered-random draws.
pub const RANDOM_PAGE_SIZE: u32 = 20;

/// A server-ranked collection, as opposed to search or a random draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuratedKind {
    Popular,
    Top,
    Airing,
}

impl CuratedKind {
    fn path(self) -> &'static str {
        match self {
            Self::Popular => "/api/popular_anime",
            Self::Top => "/api/top_anime",
            Self::Airing => "/api/airing_anime",
        }
    }
}

/// Server-side sort key for search results.
///
/// `Score` is the backend default; the controller only sends an explicit
/// key when the user picked something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Score,
    Popularity,
    StartDate,
    Episodes,
}

impl SortKey {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Popularity => "popularity",
            Self::StartDate => "start_date",
            Self::Episodes => "episodes",
        }
    }
}

/// The filter panel's selection. Genres are kept ordered so the derived
/// query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub media_type: Option<String>,
    pub status: Option<String>,
    pub rating: Option<String>,
    pub min_year: Option<u32>,
    pub max_year: Option<u32>,
    pub genre_ids: BTreeSet<u64>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn genres_param(&self) -> String {
        let mut out = String::new();
        for id in &self.genre_ids {
            if !out.is_empty() {
                out.push(',');
            }
            out.push_str(&id.to_string());
        }
        out
    }
}

/// One grid-filling request, fully derived from controller state.
///
/// Every variant carries `sfw`, computed by the caller as the negation of
/// the resolved NSFW preference.
#[derive(Debug, Clone, PartialEq)]
pub enum PageRequest {
    Search {
        term: String,
        page: u32,
        sort: Option<SortKey>,
        sfw: bool,
    },
    Curated {
        kind: CuratedKind,
        page: u32,
        sfw: bool,
    },
    RandomFiltered {
        filters: FilterSet,
        sfw: bool,
    },
    Random {
        sfw: bool,
    },
}

impl PageRequest {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Search { .. } => "/api/search_anime",
            Self::Curated { kind, .. } => kind.path(),
            Self::RandomFiltered { .. } | Self::Random { .. } => "/api/random_anime_filtered",
        }
    }

    /// Query parameters in the order the original client sent them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Search {
                term,
                page,
                sort,
                sfw,
            } => {
                let mut pairs = vec![
                    ("q", term.clone()),
                    ("page", page.to_string()),
                    ("limit", LIST_PAGE_SIZE.to_string()),
                    ("sfw", sfw.to_string()),
                ];
                if let Some(key) = sort {
                    pairs.push(("order_by", key.as_param().to_string()));
                    pairs.push(("sort", "desc".to_string()));
                }
                pairs
            }
            Self::Curated { page, sfw, .. } => vec![
                ("page", page.to_string()),
                ("limit", LIST_PAGE_SIZE.to_string()),
                ("sfw", sfw.to_string()),
            ],
            Self::RandomFiltered { filters, sfw } => vec![
                ("type", filters.media_type.clone().unwrap_or_default()),
                ("status", filters.status.clone().unwrap_or_default()),
                ("rating", filters.rating.clone().unwrap_or_default()),
                (
                    "min_year",
                    filters.min_year.map(|y| y.to_string()).unwrap_or_default(),
                ),
                (
                    "max_year",
                    filters.max_year.map(|y| y.to_string()).unwrap_or_default(),
                ),
                ("genres", filters.genres_param()),
                ("limit", RANDOM_PAGE_SIZE.to_string()),
                ("sfw", sfw.to_string()),
            ],
            Self::Random { sfw } => vec![
                ("limit", RANDOM_PAGE_SIZE.to_string()),
                ("sfw", sfw.to_string()),
            ],
        }
    }
}
