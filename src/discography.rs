//! Discography listing and neighbor resolution.
//!
//! [`list_discography`] flattens an artist's paginated album listing into
//! one [`Discography`], in the catalog's order (newest first, but not
//! guaranteed monotonic). [`Discography::find_neighbor`] walks that listing
//! from the current release toward older or newer entries.

use tracing::{debug, info};

use crate::config::UnavailablePolicy;
use crate::error::CatalogError;
use crate::models::{DiscographyEntry, Neighbor, NeighborResult};
use crate::traits::CatalogApi;

/// Which way to scan from the current release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward older releases (later in the listing).
    Previous,
    /// Toward newer releases (earlier in the listing).
    Next,
}

/// An artist's albums in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discography {
    entries: Vec<DiscographyEntry>,
}

impl Discography {
    pub fn new(entries: Vec<DiscographyEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DiscographyEntry] {
        &self.entries
    }

    /// Index of the first entry whose title equals `title` exactly.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.title() == Some(title))
    }

    /// Nearest distinct, dated release from `current` in `direction`.
    ///
    /// Entries titled like `current` are duplicate listings and skipped, as
    /// are listed entries without a release date. A withheld entry either
    /// ends the search with no result ([`UnavailablePolicy::Abort`]) or is
    /// stepped over ([`UnavailablePolicy::Skip`]).
    pub fn find_neighbor(
        &self,
        current: &str,
        direction: Direction,
        policy: UnavailablePolicy,
    ) -> NeighborResult {
        let index = self.position(current)?;

        let candidates: Box<dyn Iterator<Item = &DiscographyEntry>> = match direction {
            Direction::Previous => Box::new(self.entries[index + 1..].iter()),
            Direction::Next => Box::new(self.entries[..index].iter().rev()),
        };

        for entry in candidates {
            match entry {
                DiscographyEntry::Withheld => match policy {
                    UnavailablePolicy::Abort => {
                        debug!(current, ?direction, "withheld release blocks neighbor");
                        return None;
                    }
                    UnavailablePolicy::Skip => continue,
                },
                DiscographyEntry::Listed { title, .. } if title == current => continue,
                DiscographyEntry::Listed {
                    release_date: None, ..
                } => continue,
                DiscographyEntry::Listed {
                    title,
                    release_date: Some(date),
                } => {
                    return Some(Neighbor {
                        title: title.clone(),
                        year: release_year(date).to_string(),
                    });
                }
            }
        }

        None
    }
}

/// Year portion of an ISO date.
pub fn release_year(date: &str) -> &str {
    date.split('-').next().unwrap_or(date)
}

/// Fetch every page of an artist's album listing.
///
/// Stops when the catalog-reported total is reached or a page comes back
/// empty. Catalog errors are returned as is; they end the build.
pub async fn list_discography(
    catalog: &dyn CatalogApi,
    artist_id: &str,
    page_limit: usize,
) -> Result<Discography, CatalogError> {
    let mut entries = Vec::new();
    let mut offset: usize = 0;

    loop {
        let page = catalog
            .artist_albums_page(artist_id, offset, page_limit)
            .await?;
        debug!(
            artist_id,
            offset,
            returned = page.returned,
            total = page.total,
            "discography page"
        );

        if page.returned == 0 {
            break;
        }
        offset += page.returned;
        entries.extend(page.entries);

        if offset >= page.total {
            break;
        }
    }

    info!(artist_id, albums = entries.len(), "discography listed");
    Ok(Discography::new(entries))
}
