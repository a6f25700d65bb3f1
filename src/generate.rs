//! Album article build.
//!
//! Runs the whole pipeline for one release, strictly in order:
//!
//! ```text
//! release ─▶ (pause) ─▶ tracks ─▶ reviews ─▶ discography ─▶ neighbors ─▶ render ─▶ write
//! ```
//!
//! Catalog failures and review timeouts abort the build. Individual reviews
//! that cannot be cited are dropped by the [`ReviewEngine`].

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::auth::ClientCredentials;
use crate::catalog::TidalCatalog;
use crate::config::Config;
use crate::discography::{list_discography, Direction, Discography};
use crate::document::{AlbumDocument, ExternalLinks};
use crate::fetch::{build_client, PageFetcher};
use crate::models::{Member, NeighborResult, ReleaseInfo};
use crate::review::ReviewEngine;
use crate::sources::SourceRegistry;
use crate::traits::CatalogApi;

/// What the caller wants in the article beyond catalog data.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Bare album id or a catalog browse URL.
    pub album: String,
    pub reviews: Vec<String>,
    pub members: Vec<Member>,
    pub links: ExternalLinks,
}

/// Previous and next album around a release.
#[derive(Debug, Clone)]
pub struct Neighbors {
    pub release: ReleaseInfo,
    pub previous: NeighborResult,
    pub next: NeighborResult,
}

/// Album id from `102314585` or `https://tidal.com/browse/album/102314585`.
pub fn parse_album_id(input: &str) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('/');
    let path = match url::Url::parse(trimmed) {
        Ok(url) => url.path().trim_end_matches('/').to_string(),
        Err(_) => trimmed.to_string(),
    };
    path.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Catalog client built from `[catalog]` and `[http]`.
pub fn connect_catalog(config: &Config) -> Result<TidalCatalog> {
    let (client_id, client_secret) = config.catalog.credentials()?;
    let tokens = ClientCredentials::new(
        build_client(&config.http)?,
        &config.catalog.auth_url,
        client_id,
        client_secret,
    );
    TidalCatalog::new(&config.catalog, &config.http, Arc::new(tokens))
}

fn neighbors_in(config: &Config, discography: &Discography, release: ReleaseInfo) -> Neighbors {
    let policy = config.discography.unavailable_policy;
    let previous = discography.find_neighbor(&release.title, Direction::Previous, policy);
    let next = discography.find_neighbor(&release.title, Direction::Next, policy);
    Neighbors {
        release,
        previous,
        next,
    }
}

/// Resolve only the neighbors of a release.
pub async fn resolve_neighbors(
    config: &Config,
    catalog: &dyn CatalogApi,
    album: &str,
) -> Result<Neighbors> {
    let album_id =
        parse_album_id(album).with_context(|| format!("Invalid album id: '{}'", album))?;
    let release = catalog
        .release(&album_id)
        .await
        .with_context(|| format!("Failed to fetch album {}", album_id))?;
    let discography = list_discography(
        catalog,
        &release.artist_id,
        config.catalog.page_limit as usize,
    )
    .await
    .with_context(|| format!("Failed to list albums of {}", release.artist))?;

    Ok(neighbors_in(config, &discography, release))
}

/// Gather everything for one article.
pub async fn build_document(
    config: &Config,
    catalog: &dyn CatalogApi,
    fetcher: &dyn PageFetcher,
    registry: &SourceRegistry,
    request: &BuildRequest,
) -> Result<AlbumDocument> {
    let album_id = parse_album_id(&request.album)
        .with_context(|| format!("Invalid album id: '{}'", request.album))?;

    let release = catalog
        .release(&album_id)
        .await
        .with_context(|| format!("Failed to fetch album {}", album_id))?;
    info!(album = %release.title, artist = %release.artist, "release fetched");

    tokio::time::sleep(config.http.request_interval()).await;

    let tracks = catalog
        .tracks(&album_id)
        .await
        .with_context(|| format!("Failed to fetch tracks of album {}", album_id))?;

    let engine = ReviewEngine::new(registry, fetcher).cite_unrated(!config.citation.require_rating);
    let reviews = engine
        .extract_all(&request.reviews)
        .await
        .context("Review fetch timed out")?;

    let discography = list_discography(
        catalog,
        &release.artist_id,
        config.catalog.page_limit as usize,
    )
    .await
    .with_context(|| format!("Failed to list albums of {}", release.artist))?;
    let neighbors = neighbors_in(config, &discography, release);

    Ok(AlbumDocument {
        release: neighbors.release,
        tracks,
        members: request.members.clone(),
        reviews,
        previous: neighbors.previous,
        next: neighbors.next,
        links: request.links.clone(),
    })
}

/// Write the article under `[output].dir`, replacing any earlier version.
pub fn write_document(config: &Config, document: &AlbumDocument) -> Result<PathBuf> {
    let dir = &config.output.dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(document.file_name());
    std::fs::write(&path, document.render())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "document written");
    Ok(path)
}
