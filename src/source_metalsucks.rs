//! MetalSucks (`www.metalsucks.net`).
//!
//! English-language. Bylines are writer handles and the review template
//! never carries a usable publication date. Ratings are horn icons, with a
//! half-horn for half points.

use scraper::Html;

use crate::error::ExtractionError;
use crate::extract;
use crate::models::{ExtractedReview, RawReviewPage, ReviewDate};
use crate::rating::{RatingEncoding, RatingScale};
use crate::traits::{AuthorStyle, ReviewSource};

pub struct MetalSucksSource;

const DOMAIN: &str = "www.metalsucks.net";

impl ReviewSource for MetalSucksSource {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn display_name(&self) -> &'static str {
        "MetalSucks"
    }

    fn rating_encoding(&self) -> RatingEncoding {
        RatingEncoding::IconCount
    }

    fn max_scale(&self) -> RatingScale {
        RatingScale::Five
    }

    fn is_foreign_language(&self) -> bool {
        true
    }

    fn provides_date(&self) -> bool {
        false
    }

    fn author_style(&self) -> AuthorStyle {
        AuthorStyle::Handle
    }

    fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError> {
        let doc = Html::parse_document(&page.body);

        let title = extract::require_title(&doc, DOMAIN, &["h1.entry-title", "h1"])?;
        let author = extract::first_text(&doc, DOMAIN, &[".author a", ".author"])?;
        let raw_rating =
            extract::icon_rating(&doc, DOMAIN, ".horns .horn-full", ".horns .horn-half")?;

        Ok(ExtractedReview {
            url: page.url.clone(),
            domain: page.domain.clone(),
            title,
            author: extract::format_author(self.author_style(), author),
            date: ReviewDate::Unavailable,
            raw_rating,
        })
    }
}
