//! Modal detail viewer.
//!
//! Fetch-and-display of one title's extended detail, with a lifecycle
//! independent of the grid: at most one detail is shown at a time, content
//! is rebuilt from scratch on every open, and failures leave the modal
//! closed with a notice instead of half-filled state.

use minori_api::types::{AnimeDetail, ExternalLink};

use crate::format;

pub const LOAD_FAILED: &str = "Не удалось загрузить информацию";
pub const DATA_FAILED: &str = "Не удалось загрузить данные об аниме";
pub const NO_SYNOPSIS: &str = "Описание отсутствует";
pub const NO_LINKS: &str = "Ссылки недоступны";
pub const LINK_LABEL_FALLBACK: &str = "Ссылка";

/// One external link, display-ready. Inert links render dimmed and
/// non-clickable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub url: String,
    pub label: String,
    pub inert: bool,
}

impl LinkView {
    fn from_wire(link: ExternalLink) -> Self {
        let url = link.url.unwrap_or_default();
        let inert = url.is_empty() || url == "#" || url::Url::parse(&url).is_err();
        Self {
            url: if url.is_empty() { "#".to_string() } else { url },
            label: link
                .label
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| LINK_LABEL_FALLBACK.to_string()),
            inert,
        }
    }
}

/// Detail fields with every optional value resolved to display text.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub mal_id: u64,
    pub title: String,
    /// `EN: …` line, only when the English title exists.
    pub title_en: Option<String>,
    /// `JP: …` line, only when the Japanese title exists.
    pub title_jp: Option<String>,
    pub image: String,
    pub score_line: String,
    pub year: String,
    pub episodes_line: String,
    pub media_type: String,
    pub synopsis: String,
    pub links: Vec<LinkView>,
}

impl DetailView {
    fn from_detail(d: AnimeDetail) -> Self {
        Self {
            mal_id: d.mal_id,
            title: d
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format::PLACEHOLDER.to_string()),
            title_en: d.title_en.filter(|t| !t.is_empty()).map(|t| format!("EN: {t}")),
            title_jp: d.title_jp.filter(|t| !t.is_empty()).map(|t| format!("JP: {t}")),
            image: d
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| crate::render::NO_IMAGE.to_string()),
            score_line: match d.score {
                Some(s) if s > 0.0 => format!("⭐ {s}"),
                _ => format!("⭐ {}", format::PLACEHOLDER),
            },
            year: d.year.unwrap_or_else(|| format::PLACEHOLDER.to_string()),
            episodes_line: match d.episodes {
                Some(e) if e > 0 => format!("{e} эп."),
                _ => format!("{} эп.", format::PLACEHOLDER),
            },
            media_type: d
                .media_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format::PLACEHOLDER.to_string()),
            synopsis: d
                .synopsis
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| NO_SYNOPSIS.to_string()),
            links: d.links.into_iter().map(LinkView::from_wire).collect(),
        }
    }

    /// Placeholder line shown when the title has no links at all.
    pub fn links_placeholder(&self) -> Option<&'static str> {
        self.links.is_empty().then_some(NO_LINKS)
    }
}

/// The modal's lifecycle state.
#[derive(Debug, Default)]
pub struct ModalViewer {
    current: Option<DetailView>,
    scroll_locked: bool,
    notice: Option<String>,
}

impl ModalViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a fetched detail. On any failure the modal stays closed (or
    /// keeps showing what it already had) and a notice is queued. Returns
    /// whether the modal is now showing the new detail.
    pub fn open<E: std::error::Error>(&mut self, fetched: Result<AnimeDetail, E>) -> bool {
        match fetched {
            Err(e) => {
                tracing::warn!(error = %e, "detail fetch failed");
                self.notice = Some(LOAD_FAILED.to_string());
                false
            }
            Ok(d) if d.error.is_some() => {
                self.notice = Some(DATA_FAILED.to_string());
                false
            }
            Ok(d) => {
                // Prior content is discarded wholesale; links never leak
                // through from a previously shown title.
                self.current = Some(DetailView::from_detail(d));
                self.scroll_locked = true;
                true
            }
        }
    }

    /// Close and restore page scroll. Backdrop clicks and the close control
    /// both land here.
    pub fn close(&mut self) {
        self.current = None;
        self.scroll_locked = false;
    }

    /// Escape closes the modal only while it is open.
    pub fn on_escape(&mut self) {
        if self.is_open() {
            self.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&DetailView> {
        self.current.as_ref()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// The pending failure notice, if any, consuming it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: u64) -> AnimeDetail {
        AnimeDetail {
            mal_id: id,
            title: Some("Стальной алхимик".into()),
            title_en: Some("Fullmetal Alchemist: Brotherhood".into()),
            title_jp: None,
            image: None,
            score: Some(9.1),
            year: Some("2009".into()),
            episodes: Some(64),
            media_type: Some("TV".into()),
            status: None,
            synopsis: None,
            links: vec![
                ExternalLink {
                    url: Some("https://myanimelist.net/anime/5114".into()),
                    label: Some("MyAnimeList".into()),
                },
                ExternalLink {
                    url: Some("#".into()),
                    label: None,
                },
            ],
            error: None,
        }
    }

    #[test]
    fn open_fills_placeholders_and_marks_inert_links() {
        let mut modal = ModalViewer::new();
        assert!(modal.open(Ok::<_, crate::testutil::FakeError>(detail(5114))));
        assert!(modal.scroll_locked());

        let view = modal.current().unwrap();
        assert_eq!(view.title_en.as_deref(), Some("EN: Fullmetal Alchemist: Brotherhood"));
        assert_eq!(view.title_jp, None);
        assert_eq!(view.synopsis, NO_SYNOPSIS);
        assert_eq!(view.episodes_line, "64 эп.");
        assert_eq!(view.links.len(), 2);
        assert!(!view.links[0].inert);
        assert!(view.links[1].inert);
        assert_eq!(view.links[1].label, LINK_LABEL_FALLBACK);
        assert!(view.links_placeholder().is_none());
    }

    #[test]
    fn fetch_failure_leaves_modal_closed() {
        let mut modal = ModalViewer::new();
        assert!(!modal.open(Err::<AnimeDetail, _>(crate::testutil::FakeError)));
        assert!(!modal.is_open());
        assert!(!modal.scroll_locked());
        assert_eq!(modal.take_notice().as_deref(), Some(LOAD_FAILED));
        assert_eq!(modal.take_notice(), None);
    }

    #[test]
    fn payload_error_field_leaves_modal_closed() {
        let mut modal = ModalViewer::new();
        let mut d = detail(1);
        d.error = Some("Не удалось загрузить данные".into());
        assert!(!modal.open(Ok::<_, crate::testutil::FakeError>(d)));
        assert!(!modal.is_open());
        assert_eq!(modal.take_notice().as_deref(), Some(DATA_FAILED));
    }

    #[test]
    fn reopening_replaces_content_entirely() {
        let mut modal = ModalViewer::new();
        modal.open(Ok::<_, crate::testutil::FakeError>(detail(5114)));

        let mut second = detail(1);
        second.links.clear();
        modal.open(Ok::<_, crate::testutil::FakeError>(second));

        let view = modal.current().unwrap();
        assert_eq!(view.mal_id, 1);
        assert!(view.links.is_empty());
        assert_eq!(view.links_placeholder(), Some(NO_LINKS));
    }

    #[test]
    fn escape_closes_only_when_open() {
        let mut modal = ModalViewer::new();
        modal.on_escape();
        assert!(!modal.is_open());

        modal.open(Ok::<_, crate::testutil::FakeError>(detail(5114)));
        modal.on_escape();
        assert!(!modal.is_open());
        assert!(!modal.scroll_locked());
    }
}
