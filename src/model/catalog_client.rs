//! HTTP client for the Saavn catalog API

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::catalog::{
    Album, AlbumDetail, ApiResponse, Artist, ArtistDetail, HomeFeed, Lyrics, SearchPage, Song,
};
use crate::{log_api_request, log_api_result};

pub const DEFAULT_BASE_URL: &str = "https://saavn.sumit.co/api/";
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{endpoint} reported an unsuccessful response")]
    Unsuccessful { endpoint: String },
    #[error("{endpoint} returned no data")]
    MissingData { endpoint: String },
}

impl CatalogError {
    /// The backend answered but had nothing for us
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self, CatalogError::Unsuccessful { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only access to the music catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search_songs(&self, query: &str, limit: u32) -> CatalogResult<Vec<Song>>;
    async fn search_artists(&self, query: &str, limit: u32) -> CatalogResult<Vec<Artist>>;
    async fn search_albums(&self, query: &str, limit: u32) -> CatalogResult<Vec<Album>>;
    async fn artist_detail(&self, id: &str) -> CatalogResult<ArtistDetail>;
    async fn album_detail(&self, id: &str) -> CatalogResult<AlbumDetail>;
    async fn home_feed(&self, language: &str) -> CatalogResult<HomeFeed>;
    async fn lyrics(&self, id: &str) -> CatalogResult<Option<Lyrics>>;
}

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("saavn-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one GET and unwrap the `{ success, data }` envelope
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<Option<T>> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(CatalogError::Unsuccessful { endpoint: endpoint.to_string() });
        }

        Ok(envelope.data)
    }

    async fn search<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<T>> {
        let params = [("query", query.to_string()), ("limit", limit.to_string())];
        let page: Option<SearchPage<T>> = self.get(endpoint, &params).await?;
        Ok(page.and_then(|p| p.results).unwrap_or_default())
    }

    async fn detail<T: DeserializeOwned>(&self, endpoint: &str, id: &str) -> CatalogResult<T> {
        self.get(endpoint, &[("id", id.to_string())])
            .await?
            .ok_or_else(|| CatalogError::MissingData { endpoint: endpoint.to_string() })
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search_songs(&self, query: &str, limit: u32) -> CatalogResult<Vec<Song>> {
        log_api_request!("search_songs", query = query, limit = limit);
        let result = self.search("search/songs", query, limit).await;
        log_api_result!("search_songs", result);
        result
    }

    async fn search_artists(&self, query: &str, limit: u32) -> CatalogResult<Vec<Artist>> {
        log_api_request!("search_artists", query = query, limit = limit);
        let result = self.search("search/artists", query, limit).await;
        log_api_result!("search_artists", result);
        result
    }

    async fn search_albums(&self, query: &str, limit: u32) -> CatalogResult<Vec<Album>> {
        log_api_request!("search_albums", query = query, limit = limit);
        let result = self.search("search/albums", query, limit).await;
        log_api_result!("search_albums", result);
        result
    }

    async fn artist_detail(&self, id: &str) -> CatalogResult<ArtistDetail> {
        log_api_request!("artist_detail", id = id);
        let result = self.detail("artists", id).await;
        log_api_result!("artist_detail", result);
        result
    }

    async fn album_detail(&self, id: &str) -> CatalogResult<AlbumDetail> {
        log_api_request!("album_detail", id = id);
        let result = self.detail("albums", id).await;
        log_api_result!("album_detail", result);
        result
    }

    async fn home_feed(&self, language: &str) -> CatalogResult<HomeFeed> {
        log_api_request!("home_feed", language = language);
        let result = self
            .get("modules", &[("language", language.to_string())])
            .await
            .map(Option::unwrap_or_default);
        log_api_result!("home_feed", result);
        result
    }

    async fn lyrics(&self, id: &str) -> CatalogResult<Option<Lyrics>> {
        log_api_request!("lyrics", id = id);
        let result = self.get("songs/lyrics", &[("id", id.to_string())]).await;
        log_api_result!("lyrics", result);
        result
    }
}
