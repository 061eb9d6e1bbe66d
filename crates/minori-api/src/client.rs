use reqwest::Client;
use serde_json::json;

use crate::error::ApiError;
use crate::request::PageRequest;
use crate::traits::CatalogService;
use crate::types::{
    Ack, AnimeDetail, AnimeSummary, Genre, GenresEnvelope, IdsEnvelope, PageEnvelope,
    ToggleEnvelope, ToggleOutcome,
};

/// HTTP client for the catalog backend.
pub struct CatalogClient {
    base_url: String,
    http: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "catalog API error");
            Err(ApiError::Api {
                status,
                message: body,
            })
        }
    }

    async fn post_ack(&self, path: &str, body: serde_json::Value) -> Result<Ack, ApiError> {
        let resp = self.http.post(self.url(path)).json(&body).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl CatalogService for CatalogClient {
    type Error = ApiError;

    async fn fetch_page(&self, req: &PageRequest) -> Result<PageEnvelope, ApiError> {
        tracing::debug!(path = req.path(), "fetching page");
        let resp = self
            .http
            .get(self.url(req.path()))
            .query(&req.query_pairs())
            .send()
            .await?;

        // Grid endpoints report application errors through the envelope's
        // `error` field even on non-2xx statuses, so parse the body first.
        let status = resp.status();
        let body = resp.text().await?;
        match serde_json::from_str::<PageEnvelope>(&body) {
            Ok(env) => Ok(env),
            Err(_) if !status.is_success() => {
                tracing::warn!(status = status.as_u16(), "catalog API error");
                Err(ApiError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
            Err(e) => Err(ApiError::Parse(e.to_string())),
        }
    }

    async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let resp = self.http.get(self.url("/api/genres")).send().await?;
        let resp = Self::check_response(resp).await?;
        let env: GenresEnvelope = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(env.genres)
    }

    async fn get_anime(&self, id: u64) -> Result<AnimeDetail, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/anime/{id}")))
            .send()
            .await?;

        // An application-level `error` field stays in the payload; the modal
        // layer distinguishes it from transport failures.
        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn my_anime_ids(&self) -> Result<Vec<u64>, ApiError> {
        let resp = self.http.get(self.url("/api/my_anime_ids")).send().await?;
        let resp = Self::check_response(resp).await?;
        let env: IdsEnvelope = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(env.ids)
    }

    async fn toggle_list(&self, anime: &AnimeSummary) -> Result<ToggleOutcome, ApiError> {
        // The backend stores the card snapshot it is handed, including the
        // derived release year.
        let body = json!({
            "mal_id": anime.mal_id,
            "title": anime.title,
            "image": anime.image,
            "type": anime.media_type,
            "episodes": anime.episodes,
            "year": anime.release_year(),
            "synopsis": anime.synopsis,
            "score": anime.score,
            "popularity": anime.popularity,
        });

        let resp = self
            .http
            .post(self.url("/api/toggle_list"))
            .json(&body)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let env: ToggleEnvelope = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if let Some(message) = env.error {
            return Err(ApiError::Api {
                status: 200,
                message,
            });
        }
        match env.status.as_deref() {
            Some("added") => Ok(ToggleOutcome::Added),
            Some("removed") => Ok(ToggleOutcome::Removed),
            other => Err(ApiError::Parse(format!(
                "unexpected toggle status: {other:?}"
            ))),
        }
    }

    async fn update_status(&self, id: u64, status: &str) -> Result<Ack, ApiError> {
        self.post_ack("/api/update_status", json!({ "id": id, "status": status }))
            .await
    }

    async fn update_score(&self, id: u64, score: Option<u8>) -> Result<Ack, ApiError> {
        self.post_ack("/api/update_score", json!({ "id": id, "score": score }))
            .await
    }

    async fn update_privacy(&self, id: u64, is_private: bool) -> Result<Ack, ApiError> {
        self.post_ack(
            "/api/update_private",
            json!({ "id": id, "is_private": is_private }),
        )
        .await
    }

    async fn update_comment(&self, id: u64, comment: &str) -> Result<Ack, ApiError> {
        self.post_ack(
            "/api/update_comment",
            json!({ "id": id, "comment": comment }),
        )
        .await
    }

    async fn delete_from_list(&self, id: u64) -> Result<Ack, ApiError> {
        self.post_ack("/api/delete_from_list", json!({ "id": id }))
            .await
    }

    async fn set_nsfw(&self, allowed: bool) -> Result<Ack, ApiError> {
        self.post_ack("/api/set_nsfw", json!({ "nsfw": allowed }))
            .await
    }
}
