//! Typed errors for the review and catalog layers.
//!
//! Library code returns these; the build pipeline and the CLI wrap them in
//! `anyhow` with context. Which variants abort a build is decided here
//! ([`ReviewError::is_fatal`]), not at each call site.

use thiserror::Error;

/// Failure fetching a single HTTP resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Timeouts and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Transport { .. } => false,
        }
    }
}

/// A review page lacks the structure its source declares.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("{domain}: page has no {field}")]
    MissingField {
        domain: String,
        field: &'static str,
    },

    #[error("{domain}: invalid selector `{selector}`")]
    InvalidSelector { domain: String, selector: String },
}

/// Why a review URL contributed nothing, or why the build must stop.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("not a reviewable URL: {url}")]
    InvalidUrl { url: String },

    #[error("unsupported review source: {domain}")]
    UnsupportedSource { domain: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Network(#[from] FetchError),
}

impl ReviewError {
    /// Only a timeout against a review page aborts the whole build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReviewError::Network(FetchError::Timeout { .. }))
    }
}

/// Failures talking to the music catalog. Every variant is fatal to a build.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{resource}: unavailable due to demand from the right-holders")]
    Withheld { resource: String },

    #[error("{resource}: not found")]
    NotFound { resource: String },

    #[error("{resource}: unexpected response: {reason}")]
    InvalidResponse { resource: String, reason: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
