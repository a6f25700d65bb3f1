//! Soundi (`www.soundi.fi`).
//!
//! Reviews are reprints from the print magazine: the only date on the page
//! is the issue label (`Soundi 3/2023`), so dates come out as a Finnish
//! month and year. Ratings are star icons with half stars.

use scraper::Html;

use crate::error::ExtractionError;
use crate::extract;
use crate::models::{ExtractedReview, RawReviewPage, ReviewDate};
use crate::rating::{RatingEncoding, RatingScale};
use crate::traits::ReviewSource;

pub struct SoundiSource;

const DOMAIN: &str = "www.soundi.fi";

impl ReviewSource for SoundiSource {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn display_name(&self) -> &'static str {
        "Soundi"
    }

    fn rating_encoding(&self) -> RatingEncoding {
        RatingEncoding::IconCount
    }

    fn max_scale(&self) -> RatingScale {
        RatingScale::Five
    }

    fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError> {
        let doc = Html::parse_document(&page.body);

        let title = extract::require_title(&doc, DOMAIN, &["h1.entry-title", "article h1"])?;
        let author = extract::first_text(&doc, DOMAIN, &[".review-author", ".author-name"])?;
        let date = extract::first_text(&doc, DOMAIN, &[".issue"])?
            .map(|label| extract::month_year_date(&label))
            .unwrap_or(ReviewDate::Unavailable);
        let raw_rating = extract::icon_rating(
            &doc,
            DOMAIN,
            ".review-rating .fa-star",
            ".review-rating .fa-star-half-o",
        )?;

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
