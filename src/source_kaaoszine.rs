//! Kaaoszine (`kaaoszine.fi`).
//!
//! Finnish-language. Ratings are a row of five `div` markers inside
//! `div.rating`, filled ones carrying the class `one`. The byline sits in
//! `div.author-and-date` with the author's name in `<strong>`.

use scraper::Html;

use crate::error::ExtractionError;
use crate::extract;
use crate::models::{ExtractedReview, RawReviewPage, ReviewDate};
use crate::rating::{RatingEncoding, RatingScale};
use crate::traits::ReviewSource;

pub struct KaaoszineSource;

const DOMAIN: &str = "kaaoszine.fi";

impl ReviewSource for KaaoszineSource {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn display_name(&self) -> &'static str {
        "Kaaoszine"
    }

    fn rating_encoding(&self) -> RatingEncoding {
        RatingEncoding::FilledMarkers
    }

    fn max_scale(&self) -> RatingScale {
        RatingScale::Five
    }

    fn extract_fields(&self, page: &RawReviewPage) -> Result<ExtractedReview, ExtractionError> {
        let doc = Html::parse_document(&page.body);

        let title = extract::require_title(&doc, DOMAIN, &[".article-title"])?;
        let author = extract::first_text(&doc, DOMAIN, &["div.author-and-date strong"])?;
        let mut date = extract::first_timestamp(
            &doc,
            DOMAIN,
            &[
                ("meta[property='article:published_time']", "content"),
                ("div.author-and-date time[datetime]", "datetime"),
            ],
        )?;
        if date == ReviewDate::Unavailable {
            if let Some(byline) = extract::first_text(&doc, DOMAIN, &["div.author-and-date"])? {
                date = extract::byline_date(&byline);
            }
        }
        let raw_rating = extract::marker_rating(&doc, DOMAIN, "div.rating", "div", "one")?;

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
