//! Metal Injection (`metalinjection.net`).
//!
//! English-language; the verdict box shows the score as a fraction of ten.

use scraper::Html;

use crate::error::ExtractionError;
use crate::extract;
use crate::models::{ExtractedReview, RawReviewPage};
use crate::rating::{RatingEncoding, RatingScale};
use crate::traits::ReviewSource;

pub struct MetalInjectionSource;

const DOMAIN: &str = "metalinjection.net";

impl ReviewSource for MetalInjectionSource {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn display_name(&self) -> &'static str {
        "Metal Injection"
    }

    fn rating_encoding(&self) -> RatingEncoding {
        RatingEncoding::FractionText
    }

    fn max_scale(&self) -> RatingScale {
        RatingScale::Ten
    }

    fn is_foreign_language(&self) -> bool {
        true
    }

    fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError> {
        let doc = Html::parse_document(&page.body);

        let title = extract::require_title(&doc, DOMAIN, &["h1.entry-title", "h1"])?;
        let author = extract::first_text(&doc, DOMAIN, &[".author-name", "a[rel='author']"])?;
        let date = extract::first_timestamp(
            &doc,
            DOMAIN,
            &[("meta[property='article:published_time']", "content")],
        )?;
        let raw_rating =
            extract::fraction_rating(&doc, DOMAIN, &[".review-score", ".score-box .score"])?;

        Ok(ExtractedReview {
            url: page.url.clone(),
            domain: page.domain.clone(),
            title,
            author: extract::format_author(self.author_style(), author),
            date,
            raw_rating,
        })
    }
}
