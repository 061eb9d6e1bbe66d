//! Card markup rendering.
//!
//! A pure transform from anime records plus a watch-list snapshot to HTML
//! fragments. No network, no shared state: the add/remove button's initial
//! face is read from the snapshot at render time, once, not per click.
//!
//! Cards carry only a `data-anime-id` attribute; the full record for a
//! clicked card is resolved through [`RenderedPage::lookup`] instead of
//! being round-tripped through the DOM as serialized JSON.

use std::collections::HashMap;
use std::fmt::Write;

use minori_api::types::AnimeSummary;

use crate::format;
use crate::watchlist::WatchList;

/// Fallback poster for records without an image.
pub const NO_IMAGE: &str = "/static/images/no-image.png";

pub const BTN_IN_LIST: &str = "В списке";
pub const BTN_ADD: &str = "В список";

/// Who is looking, and what is already on their list.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub authenticated: bool,
    pub watchlist: &'a WatchList,
}

/// A rendered grid plus the id-to-record index for its cards.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub markup: String,
    index: HashMap<u64, AnimeSummary>,
}

impl RenderedPage {
    /// Resolve a clicked card back to its record. Unknown ids are logged
    /// and ignored rather than surfaced as errors.
    pub fn lookup(&self, id: u64) -> Option<&AnimeSummary> {
        let found = self.index.get(&id);
        if found.is_none() {
            tracing::warn!(id, "click on a card with no backing record, ignoring");
        }
        found
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Render a result grid. Deterministic and side-effect free.
pub fn render_page(items: &[AnimeSummary], ctx: &RenderContext<'_>) -> RenderedPage {
    let mut markup = String::new();
    let mut index = HashMap::with_capacity(items.len());

    for anime in items {
        markup.push_str(&render_card(anime, ctx));
        index.insert(anime.mal_id, anime.clone());
    }

    RenderedPage { markup, index }
}

/// The add/remove button face for a membership state.
pub fn button_face(in_list: bool) -> String {
    if in_list {
        format!("<span class=\"btn-icon\">✔</span> {BTN_IN_LIST}")
    } else {
        format!("<span class=\"btn-icon\">➕</span> {BTN_ADD}")
    }
}

fn render_card(anime: &AnimeSummary, ctx: &RenderContext<'_>) -> String {
    let title = escape_html(&anime.title);
    let image = escape_html(anime.image.as_deref().unwrap_or(NO_IMAGE));
    let media_type = escape_html(anime.media_type.as_deref().unwrap_or(format::PLACEHOLDER));
    let year = format::year(anime.start_date.as_deref());
    let score = format::score(anime.score);
    let popularity = format::popularity(anime.popularity);
    let episodes = format::episodes(anime.episodes);
    let synopsis = escape_html(anime.synopsis.as_deref().unwrap_or_default());

    let mut card = String::new();
    let _ = write!(
        card,
        "<div class=\"card\" data-anime-id=\"{id}\">\
         <div class=\"card-image\">\
         <img src=\"{image}\" alt=\"{title}\" loading=\"lazy\">\
         <div class=\"card-badges\">\
         <span class=\"badge badge-type\">{media_type}</span>\
         <span class=\"badge badge-year\">{year}</span>\
         </div></div>\
         <div class=\"card-info\">\
         <div class=\"card-title\">{title}</div>\
         <div class=\"card-stats\">\
         <div class=\"stat\"><span class=\"stat-icon\">⭐</span><span class=\"stat-value\">{score}</span></div>\
         <div class=\"stat\"><span class=\"stat-icon\">👥</span><span class=\"stat-value\">{popularity}</span></div>\
         <div class=\"stat\"><span class=\"stat-icon\">🎬</span><span class=\"stat-value\">{episodes} эп.</span></div>\
         </div>\
         <div class=\"card-synopsis\">{synopsis}</div>",
        id = anime.mal_id,
    );

    if ctx.authenticated {
        let in_list = ctx.watchlist.contains(anime.mal_id);
        let added_class = if in_list { " added" } else { "" };
        let _ = write!(
            card,
            "<button class=\"btn-add{added_class}\">{}</button>",
            button_face(in_list)
        );
    }

    card.push_str("</div></div>");
    card
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
