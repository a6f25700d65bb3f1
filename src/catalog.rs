//! Music catalog client.
//!
//! Talks to the catalog's JSON API with a bearer token from a
//! [`TokenProvider`]. Response bodies are parsed by the free functions
//! [`parse_release`], [`parse_tracks`] and [`parse_albums_page`] so they can
//! be exercised without a network.
//!
//! # Status mapping
//!
//! | HTTP | Error |
//! |------|-------|
//! | 451 | [`CatalogError::Withheld`] |
//! | 404 | [`CatalogError::NotFound`] |
//! | other non-2xx | [`FetchError::Status`] |
//! | timeout | [`FetchError::Timeout`] |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::config::{CatalogConfig, HttpConfig};
use crate::error::{CatalogError, FetchError};
use crate::fetch::{build_client, with_retries};
use crate::models::{DiscographyEntry, ReleaseInfo, Track};
use crate::traits::{CatalogApi, DiscographyPage, TokenProvider};

const MEDIA_TYPE: &str = "application/vnd.tidal.v1+json";
const TRACKS_PAGE_LIMIT: usize = 100;

// ═══════════════════════════════════════════════════════════════════════
// Wire format
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    resource: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumResource {
    title: String,
    release_date: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    duration: u64,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    id: serde_json::Value,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    data: Vec<ListItem<T>>,
    #[serde(default)]
    metadata: Option<ListMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListItem<T> {
    #[serde(default = "default_item_status")]
    status: u16,
    #[serde(default)]
    resource: Option<T>,
}

fn default_item_status() -> u16 {
    200
}

#[derive(Debug, Deserialize)]
struct ListMetadata {
    #[serde(default)]
    total: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackResource {
    track_number: u32,
    title: String,
    duration: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedAlbum {
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════

fn decode<T: DeserializeOwned>(resource: &str, body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::InvalidResponse {
        resource: resource.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a single-album response.
pub fn parse_release(resource: &str, body: &str) -> Result<ReleaseInfo, CatalogError> {
    let album: Envelope<AlbumResource> = decode(resource, body)?;
    let album = album.resource;

    let artist = album
        .artists
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::InvalidResponse {
            resource: resource.to_string(),
            reason: "album has no artists".to_string(),
        })?;

    let artist_id = match artist.id {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    };

    Ok(ReleaseInfo {
        title: album.title,
        artist: artist.name,
        artist_id,
        release_date: album.release_date,
        duration_secs: album.duration,
    })
}

/// One page of an album's track listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    /// Raw items on the page, withheld tracks included. Drives pagination.
    pub returned: usize,
    pub total: usize,
}

/// Parse a track-listing page. Withheld items carry no resource and are
/// dropped, but still count toward `returned`.
pub fn parse_tracks(resource: &str, body: &str) -> Result<TrackPage, CatalogError> {
    let list: ListResponse<TrackResource> = decode(resource, body)?;
    let returned = list.data.len();
    let tracks = list
        .data
        .into_iter()
        .filter_map(|item| item.resource)
        .map(|t| Track {
            number: t.track_number,
            title: t.title,
            duration_secs: t.duration,
        })
        .collect();
    let total = list
        .metadata
        .and_then(|m| m.total)
        .unwrap_or(returned);
    Ok(TrackPage {
        tracks,
        returned,
        total,
    })
}

/// Parse one page of an artist's album listing.
///
/// Items with status 451 become [`DiscographyEntry::Withheld`]; of the
/// rest, only `ALBUM` resources are kept.
pub fn parse_albums_page(resource: &str, body: &str) -> Result<DiscographyPage, CatalogError> {
    let list: ListResponse<ListedAlbum> = decode(resource, body)?;
    let returned = list.data.len();

    let entries = list
        .data
        .into_iter()
        .filter_map(|item| {
            if item.status == 451 {
                return Some(DiscographyEntry::Withheld);
            }
            let album = item.resource?;
            if !album
                .kind
                .as_deref()
                .is_some_and(|k| k.eq_ignore_ascii_case("album"))
            {
                return None;
            }
            Some(DiscographyEntry::Listed {
                title: album.title,
                release_date: album.release_date.filter(|d| !d.is_empty()),
            })
        })
        .collect();

    let total = list
        .metadata
        .and_then(|m| m.total)
        .unwrap_or(returned);

    Ok(DiscographyPage {
        entries,
        returned,
        total,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// HTTP client
// ═══════════════════════════════════════════════════════════════════════

/// Live catalog client.
pub struct TidalCatalog {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    api_base: String,
    country_code: String,
    max_retries: u32,
}

impl TidalCatalog {
    pub fn new(
        catalog: &CatalogConfig,
        http: &HttpConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(http)?,
            tokens,
            api_base: catalog.api_base.trim_end_matches('/').to_string(),
            country_code: catalog.country_code.clone(),
            max_retries: http.max_retries,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.api_base, path);
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))?;

        let result = with_retries(self.max_retries, &url, || async {
            debug!(url = %url, "catalog request");
            let response = self
                .client
                .get(&url)
                .query(&[("countryCode", self.country_code.as_str())])
                .query(query)
                .header(reqwest::header::ACCEPT, MEDIA_TYPE)
                .header(reqwest::header::CONTENT_TYPE, MEDIA_TYPE)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(&url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            response
                .text()
                .await
                .map_err(|e| FetchError::from_reqwest(&url, e))
        })
        .await;

        match result {
            Ok(body) => Ok(body),
            Err(FetchError::Status { status: 451, .. }) => {
                Err(CatalogError::Withheld { resource: url })
            }
            Err(FetchError::Status { status: 404, .. }) => {
                Err(CatalogError::NotFound { resource: url })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CatalogApi for TidalCatalog {
    async fn release(&self, album_id: &str) -> Result<ReleaseInfo, CatalogError> {
        let path = format!("/albums/{}", album_id);
        let body = self.get(&path, &[]).await?;
        parse_release(&path, &body)
    }

    async fn tracks(&self, album_id: &str) -> Result<Vec<Track>, CatalogError> {
        let path = format!("/albums/{}/items", album_id);
        let mut tracks = Vec::new();
        let mut offset: usize = 0;
        loop {
            let body = self
                .get(
                    &path,
                    &[
                        ("offset", offset.to_string()),
                        ("limit", TRACKS_PAGE_LIMIT.to_string()),
                    ],
                )
                .await?;
            let page = parse_tracks(&path, &body)?;
            if page.returned == 0 {
                break;
            }
            offset += page.returned;
            tracks.extend(page.tracks);
            if offset >= page.total {
                break;
            }
        }
        Ok(tracks)
    }

    async fn artist_albums_page(
        &self,
        artist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<DiscographyPage, CatalogError> {
        let path = format!("/artists/{}/albums", artist_id);
        let body = self
            .get(
                &path,
                &[("offset", offset.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        parse_albums_page(&path, &body)
    }
}
