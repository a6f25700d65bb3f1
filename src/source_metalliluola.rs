//! Metalliluola (`metalliluola.fi`).
//!
//! Finnish-language WordPress site. The rating is an image whose filename
//! carries the score as two digits (`arvio-35.png` is 3.5 out of 5).

use scraper::Html;

use crate::error::ExtractionError;
use crate::extract;
use crate::models::{ExtractedReview, RawRating, RawReviewPage};
use crate::rating::{RatingEncoding, RatingScale};
use crate::traits::ReviewSource;

pub struct MetalliluolaSource;

const DOMAIN: &str = "metalliluola.fi";

impl ReviewSource for MetalliluolaSource {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn display_name(&self) -> &'static str {
        "Metalliluola"
    }

    fn rating_encoding(&self) -> RatingEncoding {
        RatingEncoding::CodedFilename
    }

    fn max_scale(&self) -> RatingScale {
        RatingScale::Five
    }

    fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError> {
        let doc = Html::parse_document(&page.body);

        let title = extract::require_title(&doc, DOMAIN, &["h1.entry-title", "h1"])?;
        let author = extract::first_text(&doc, DOMAIN, &[".entry-meta .author a", ".author"])?;
        let date = extract::first_timestamp(
            &doc,
            DOMAIN,
            &[
                ("meta[property='article:published_time']", "content"),
                ("time.entry-date", "datetime"),
            ],
        )?;
        let raw_rating =
            extract::first_attr(&doc, DOMAIN, ".arvosana img", "src")?.map(RawRating::Filename);

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
