//! Blabbermouth (`blabbermouth.net`).
//!
//! English-language; scores are written out as text (`8.5/10`).

use scraper::Html;

use crate::error::ExtractionError;
use crate::extract;
use crate::models::{ExtractedReview, RawReviewPage};
use crate::rating::{RatingEncoding, RatingScale};
use crate::traits::ReviewSource;

pub struct BlabbermouthSource;

const DOMAIN: &str = "blabbermouth.net";

impl ReviewSource for BlabbermouthSource {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn display_name(&self) -> &'static str {
        "Blabbermouth"
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

        let title = extract::require_title(&doc, DOMAIN, &[".review-header h1", "h1"])?;
        let author = extract::first_text(&doc, DOMAIN, &[".byline a", ".byline"])?;
        let date = extract::first_timestamp(&doc, DOMAIN, &[("time[datetime]", "datetime")])?;
        let raw_rating = extract::fraction_rating(&doc, DOMAIN, &[".rating", ".review-rating"])?;

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
