//! Review extraction engine.
//!
//! Turns review URLs into citation fragments:
//!
//! ```text
//! URL → domain → registry gate → fetch → extract_fields → normalize → compose
//! ```
//!
//! Per-URL failures (unsupported host, malformed page, missing rating, a
//! non-success HTTP status) degrade to "no contribution" for that URL only.
//! A timeout is returned as an error and ends the build.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use url::Url;

use crate::citation::{self, CitationFragment};
use crate::error::ReviewError;
use crate::fetch::PageFetcher;
use crate::models::RawReviewPage;
use crate::rating;
use crate::sources::SourceRegistry;

/// Runs review URLs through the registry, fetcher and composer.
pub struct ReviewEngine<'a> {
    registry: &'a SourceRegistry,
    fetcher: &'a dyn PageFetcher,
    accessed: NaiveDate,
    cite_unrated: bool,
}

impl<'a> ReviewEngine<'a> {
    /// Engine stamping today's local date as the access date.
    pub fn new(registry: &'a SourceRegistry, fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            registry,
            fetcher,
            accessed: Local::now().date_naive(),
            cite_unrated: false,
        }
    }

    pub fn with_access_date(mut self, accessed: NaiveDate) -> Self {
        self.accessed = accessed;
        self
    }

    /// Cite reviews that have no discoverable rating (reference only).
    pub fn cite_unrated(mut self, cite_unrated: bool) -> Self {
        self.cite_unrated = cite_unrated;
        self
    }

    /// Extract one review.
    ///
    /// `Ok(None)` means the URL contributes nothing; `Err` is always fatal.
    pub async fn extract(&self, url: &str) -> Result<Option<CitationFragment>, ReviewError> {
        match self.try_extract(url).await {
            Ok(fragment) => Ok(fragment),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(url, error = %e, "skipping review");
                Ok(None)
            }
        }
    }

    /// Extract every URL in submission order, keeping only contributions.
    pub async fn extract_all<S: AsRef<str>>(
        &self,
        urls: &[S],
    ) -> Result<Vec<CitationFragment>, ReviewError> {
        let mut fragments = Vec::new();
        for url in urls {
            if let Some(fragment) = self.extract(url.as_ref()).await? {
                fragments.push(fragment);
            }
        }
        info!(
            submitted = urls.len(),
            cited = fragments.len(),
            "reviews processed"
        );
        Ok(fragments)
    }

    async fn try_extract(&self, url: &str) -> Result<Option<CitationFragment>, ReviewError> {
        let domain = resolve_domain(url)?;
        let source = self.registry.rule_set_for(&domain)?;

        let body = self.fetcher.fetch(url).await?;
        let page = RawReviewPage {
            url: url.to_string(),
            domain,
            body,
        };

        let review = source.extract_fields(&page)?;
        let rating = rating::normalize(
            source.rating_encoding(),
            source.max_scale(),
            review.raw_rating.as_ref(),
        );
        debug!(url, ?rating, title = %review.title, "review extracted");

        let fragment =
            citation::compose(source, &review, &rating, self.accessed, self.cite_unrated);
        if fragment.is_none() {
            info!(url, "no rating found, review not cited");
        }
        Ok(fragment)
    }
}

/// Host of an absolute `http`/`https` URL.
pub fn resolve_domain(url: &str) -> Result<String, ReviewError> {
    let invalid = || ReviewError::InvalidUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    parsed.host_str().map(str::to_string).ok_or_else(invalid)
}
