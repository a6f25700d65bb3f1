//! Citation markup for one review.
//!
//! A [`CitationFragment`] is the rating line plus the footnoted reference
//! the document lists under its reviews section:
//!
//! ```text
//! * [[Kaaoszine]]: {{Arvostelutähdet|4|5}}<ref>{{Verkkoviite | Osoite = ... }}</ref>
//! ```

use chrono::NaiveDate;

use crate::extract::day_month_year;
use crate::models::ExtractedReview;
use crate::rating::{NormalizedRating, Rating};
use crate::traits::ReviewSource;

/// Rating line and reference block contributed by one review URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationFragment {
    /// Absent only when citing unrated reviews is enabled.
    pub rating_line: Option<String>,
    pub reference: String,
}

impl CitationFragment {
    /// The fragment as one document line: rating line followed by the footnote.
    pub fn render(&self) -> String {
        match &self.rating_line {
            Some(line) => format!("{}{}", line, self.reference),
            None => self.reference.clone(),
        }
    }
}

/// Compose the citation for a review.
///
/// Returns `None` for an unrated review unless `cite_unrated` is set, in
/// which case only the reference block is produced. `accessed` stamps the
/// reference's access date.
pub fn compose(
    source: &dyn ReviewSource,
    review: &ExtractedReview,
    rating: &Rating,
    accessed: NaiveDate,
    cite_unrated: bool,
) -> Option<CitationFragment> {
    let rating_line = match rating {
        Rating::Scored(score) => Some(rating_line(source, score)),
        Rating::Unrated if cite_unrated => None,
        Rating::Unrated => return None,
    };

    Some(CitationFragment {
        rating_line,
        reference: reference(source, review, accessed),
    })
}

fn rating_line(source: &dyn ReviewSource, rating: &NormalizedRating) -> String {
    format!(
        "* [[{}]]: {{{{Arvostelutähdet|{}|{}}}}}",
        source.display_name(),
        rating.score_label(),
        rating.scale()
    )
}

fn reference(source: &dyn ReviewSource, review: &ExtractedReview, accessed: NaiveDate) -> String {
    let mut fields = vec![
        format!("Osoite = {}", review.url),
        format!("Nimeke = {}", review.title),
        format!("Tekijä = {}", review.author),
        format!("Sivusto = {}", source.display_name()),
        format!("Ajankohta = {}", review.date.as_citation_field()),
        format!("Viitattu = {}", day_month_year(accessed)),
    ];
    if source.is_foreign_language() {
        fields.push(format!("Kieli = {{{{{}}}}}", source.language_code()));
    }

    format!("<ref>{{{{Verkkoviite | {} }}}}</ref>", fields.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawRating, ReviewDate};
    use crate::rating::RatingScale;
    use crate::source_blabbermouth::BlabbermouthSource;
    use crate::source_kaaoszine::KaaoszineSource;

    fn review(url: &str, date: ReviewDate) -> ExtractedReview {
        ExtractedReview {
            url: url.to_string(),
            domain: "kaaoszine.fi".to_string(),
            title: "Arvio".to_string(),
            author: "Meikäläinen, Matti".to_string(),
            date,
            raw_rating: Some(RawRating::Markers {
                filled: 4,
                total: 5,
            }),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_native_source_fragment() {
        let rating = Rating::Scored(NormalizedRating::new(4.0, RatingScale::Five).unwrap());
        let fragment = compose(
            &KaaoszineSource,
            &review(
                "https://kaaoszine.fi/a",
                ReviewDate::Published("1.3.2024".to_string()),
            ),
            &rating,
            day(),
            false,
        )
        .unwrap();

        assert_eq!(
            fragment.rating_line.as_deref(),
            Some("* [[Kaaoszine]]: {{Arvostelutähdet|4|5}}")
        );
        assert_eq!(
            fragment.reference,
            "<ref>{{Verkkoviite | Osoite = https://kaaoszine.fi/a | Nimeke = Arvio | \
             Tekijä = Meikäläinen, Matti | Sivusto = Kaaoszine | Ajankohta = 1.3.2024 | \
             Viitattu = 5.3.2024 }}</ref>"
        );
    }

    #[test]
    fn test_foreign_source_gets_language_tag() {
        let rating = Rating::Scored(NormalizedRating::new(8.5, RatingScale::Ten).unwrap());
        let fragment = compose(
            &BlabbermouthSource,
            &review("https://blabbermouth.net/r", ReviewDate::Unavailable),
            &rating,
            day(),
            false,
        )
        .unwrap();

        assert_eq!(
            fragment.rating_line.as_deref(),
            Some("* [[Blabbermouth]]: {{Arvostelutähdet|8.5|10}}")
        );
        assert!(fragment.reference.contains("| Kieli = {{en}} }}</ref>"));
        // The date field stays present even when blank.
        assert!(fragment.reference.contains("| Ajankohta =  |"));
    }

    #[test]
    fn test_unrated_review_is_suppressed() {
        let fragment = compose(
            &KaaoszineSource,
            &review("https://kaaoszine.fi/a", ReviewDate::Unavailable),
            &Rating::Unrated,
            day(),
            false,
        );
        assert!(fragment.is_none());
    }

    #[test]
    fn test_unrated_review_cited_when_enabled() {
        let fragment = compose(
            &KaaoszineSource,
            &review("https://kaaoszine.fi/a", ReviewDate::Unavailable),
            &Rating::Unrated,
            day(),
            true,
        )
        .unwrap();
        assert!(fragment.rating_line.is_none());
        assert!(fragment.render().starts_with("<ref>"));
    }
}
