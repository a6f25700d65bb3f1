//! Core data models used throughout wafer.
//!
//! These types carry a review page, the fields pulled out of it, and the
//! catalog records that flow through one document build. None of them
//! outlive the build that created them.

use serde::Serialize;

/// A fetched review page before any field extraction.
#[derive(Debug, Clone)]
pub struct RawReviewPage {
    pub url: String,
    pub domain: String,
    pub body: String,
}

/// Publication date as exposed by a review source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDate {
    /// Already rendered for the reference block (`14.3.2023`, `Maaliskuu 2023`).
    Published(String),
    /// The page has no usable date, or the source never exposes one.
    Unavailable,
}

impl ReviewDate {
    /// The value written into the reference block. Empty when unavailable.
    pub fn as_citation_field(&self) -> &str {
        match self {
            ReviewDate::Published(date) => date,
            ReviewDate::Unavailable => "",
        }
    }
}

/// The raw rating token read off a review page, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRating {
    /// Repeated rating icons; `half` counts half-step icons.
    Icons { full: usize, half: usize },
    /// Filled markers out of a fixed-length marker list.
    Markers { filled: usize, total: usize },
    /// Free text containing a fraction such as `8/10`.
    Fraction(String),
    /// Image filename or URL with an embedded two-digit code.
    Filename(String),
}

/// Fields pulled from one review page by a source adapter.
#[derive(Debug, Clone)]
pub struct ExtractedReview {
    pub url: String,
    pub domain: String,
    pub title: String,
    /// Empty when the page has no byline.
    pub author: String,
    pub date: ReviewDate,
    pub raw_rating: Option<RawRating>,
}

/// One entry in an artist's discography listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscographyEntry {
    Listed {
        title: String,
        /// ISO `YYYY-MM-DD`, absent when the catalog left it blank.
        release_date: Option<String>,
    },
    /// Rights-withheld release: it exists, but carries no title or date.
    Withheld,
}

impl DiscographyEntry {
    pub fn listed(title: &str, release_date: &str) -> Self {
        DiscographyEntry::Listed {
            title: title.to_string(),
            release_date: Some(release_date.to_string()),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            DiscographyEntry::Listed { title, .. } => Some(title),
            DiscographyEntry::Withheld => None,
        }
    }
}

/// A resolved discography neighbor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub title: String,
    pub year: String,
}

/// Result of a neighbor lookup. `None` covers every unresolved case.
pub type NeighborResult = Option<Neighbor>;

/// Canonical release metadata from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseInfo {
    pub title: String,
    pub artist: String,
    pub artist_id: String,
    /// ISO `YYYY-MM-DD`.
    pub release_date: String,
    pub duration_secs: u64,
}

impl ReleaseInfo {
    pub fn year(&self) -> &str {
        self.release_date.split('-').next().unwrap_or(&self.release_date)
    }

    pub fn minutes(&self) -> u64 {
        self.duration_secs / 60
    }

    /// Leftover seconds, zero-padded.
    pub fn seconds_label(&self) -> String {
        format!("{:02}", self.duration_secs % 60)
    }
}

/// One track of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub number: u32,
    pub title: String,
    pub duration_secs: u64,
}

impl Track {
    /// `M.SS` as used in the track list template.
    pub fn duration_label(&self) -> String {
        format!("{}.{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }
}

/// A lineup member with one or more instruments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub instruments: Vec<String>,
}

impl Member {
    /// Parse `Name=guitar, vocals`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (name, instruments) = spec.split_once('=')?;
        let name = name.trim();
        let instruments: Vec<String> = instruments
            .split(',')
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        if name.is_empty() || instruments.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            instruments,
        })
    }
}
