//! Wire types for the catalog backend's JSON responses.
//!
//! The backend proxies an upstream catalog and is loose with types: episode
//! counts arrive as numbers or `"?"`, scores as numbers or an em-dash
//! placeholder. The lenient deserializers below normalize those to typed
//! options so the rest of the code never sees sentinel strings.

use serde::{Deserialize, Deserializer, Serialize};

/// One anime as it appears in a result grid. Identified by `mal_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub mal_id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl AnimeSummary {
    /// Release year: the first four characters of the start date, if any.
    pub fn release_year(&self) -> Option<&str> {
        self.start_date.as_deref().and_then(|d| d.get(..4))
    }
}

/// Extended detail for one title, fetched individually and never cached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimeDetail {
    pub mal_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub title_jp: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_display")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub episodes: Option<u32>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub links: Vec<ExternalLink>,
    #[serde(default)]
    pub error: Option<String>,
}

/// An ordered external link on the detail view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExternalLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// A selectable genre from `/api/genres`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub mal_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenresEnvelope {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Envelope for every grid-filling endpoint.
///
/// All fields are defaulted: the search endpoint omits `total`, the filtered
/// random endpoint omits `pagination`, and errors come as a lone `error`
/// field in an otherwise successful response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub data: Vec<AnimeSummary>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Server-driven pagination hint. There is no page total, only a
/// one-step-ahead flag.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub has_next_page: bool,
}

/// Result of `POST /api/toggle_list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ToggleEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Acknowledgement for list-mutation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ids: Vec<u64>,
}

// ── Lenient deserializers ─────────────────────────────────────────

fn lenient_u32<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(de)?;
    Ok(v.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as u32),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(de)?;
    Ok(v.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Accept a string or number and keep it as display text; placeholders
/// (`—`, `N/A`) count as absent.
fn lenient_display<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(de)?;
    Ok(v.and_then(|v| match v {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) => match s.as_str() {
            "" | "\u{2014}" | "N/A" => None,
            _ => Some(s),
        },
        _ => None,
    }))
}
