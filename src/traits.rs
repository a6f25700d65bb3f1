//! Extension traits for review sources and the music catalog.
//!
//! Each supported publisher is one [`ReviewSource`] adapter. The registry in
//! [`crate::sources`] keys adapters by domain; the review engine only talks
//! to this trait, so adding a publisher means adding one adapter.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │             SourceRegistry               │
//! │  ┌──────────┐ ┌────────┐ ┌────────────┐  │
//! │  │Kaaoszine │ │ Soundi │ │ Blabber-   │  │
//! │  │Metallil. │ │MetalS. │ │ mouth, MI  │  │
//! │  └──────────┘ └────────┘ └────────────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!     ReviewEngine::extract() → CitationFragment
//! ```
//!
//! The catalog side is the same shape: [`CatalogApi`] and [`TokenProvider`]
//! are implemented for the live service in [`crate::catalog`] and
//! [`crate::auth`], and by in-memory doubles in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::error::{CatalogError, ExtractionError};
use crate::models::{DiscographyEntry, ExtractedReview, RawReviewPage, ReleaseInfo, Track};
use crate::rating::{RatingEncoding, RatingScale};

// ═══════════════════════════════════════════════════════════════════════
// ReviewSource Trait
// ═══════════════════════════════════════════════════════════════════════

/// How a source writes bylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorStyle {
    /// Real names, rewritten `First Last` → `Last, First`.
    RealName,
    /// Display handles, passed through unchanged.
    Handle,
}

/// A supported review publisher.
///
/// # Example
///
/// ```rust
/// use wafer::error::ExtractionError;
/// use wafer::models::{ExtractedReview, RawReviewPage, ReviewDate};
/// use wafer::rating::{RatingEncoding, RatingScale};
/// use wafer::traits::ReviewSource;
///
/// pub struct ZineSource;
///
/// impl ReviewSource for ZineSource {
///     fn domain(&self) -> &'static str { "zine.example" }
///     fn display_name(&self) -> &'static str { "Zine" }
///     fn rating_encoding(&self) -> RatingEncoding { RatingEncoding::FractionText }
///     fn max_scale(&self) -> RatingScale { RatingScale::Ten }
///
///     fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError> {
///         Ok(ExtractedReview {
///             url: page.url.clone(),
///             domain: page.domain.clone(),
///             title: "Title".to_string(),
///             author: String::new(),
///             date: ReviewDate::Unavailable,
///             raw_rating: None,
///         })
///     }
/// }
/// ```
pub trait ReviewSource: Send + Sync {
    /// Host name this adapter handles, exactly as it appears in URLs.
    fn domain(&self) -> &'static str;

    /// Site name used in the rating line and the reference block.
    fn display_name(&self) -> &'static str;

    /// How the rating is encoded in this source's markup.
    fn rating_encoding(&self) -> RatingEncoding;

    /// The source's maximum rating.
    fn max_scale(&self) -> RatingScale;

    /// Foreign-language sources get a language tag in the reference.
    fn is_foreign_language(&self) -> bool {
        false
    }

    /// Language code for the tag, when foreign.
    fn language_code(&self) -> &'static str {
        "en"
    }

    /// Whether the source ever exposes a usable publication date.
    fn provides_date(&self) -> bool {
        true
    }

    fn author_style(&self) -> AuthorStyle {
        AuthorStyle::RealName
    }

    /// Pull title, author, date and the raw rating token out of a page.
    ///
    /// Only a missing title is an error; every other field degrades to its
    /// absent value.
    fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog Traits
// ═══════════════════════════════════════════════════════════════════════

/// Supplies bearer tokens for catalog requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid access token, refreshed if needed.
    async fn access_token(&self) -> Result<String>;
}

/// One page of an artist's album listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscographyPage {
    pub entries: Vec<DiscographyEntry>,
    /// Number of raw items the catalog returned on this page, before
    /// non-album entries were dropped. Drives pagination.
    pub returned: usize,
    /// Total items the catalog reports for the artist.
    pub total: usize,
}

/// The music catalog as the build pipeline needs it.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn release(&self, album_id: &str) -> Result<ReleaseInfo, CatalogError>;

    async fn tracks(&self, album_id: &str) -> Result<Vec<Track>, CatalogError>;

    async fn artist_albums_page(
        &self,
        artist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<DiscographyPage, CatalogError>;
}
