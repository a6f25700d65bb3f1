//! Shared field-extraction helpers for review source adapters.
//!
//! Adapters describe *where* a field lives (CSS selectors); the helpers here
//! do the reading and the normalization every source shares: byline name
//! order, the two date strategies, and rating-token collection.

use chrono::{DateTime, Datelike, NaiveDate};
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;
use crate::models::{RawRating, ReviewDate};
use crate::traits::AuthorStyle;

/// Finnish month names in nominative case, used for `month/year` dates.
pub const MONTHS_NOMINATIVE: [&str; 12] = [
    "Tammikuu",
    "Helmikuu",
    "Maaliskuu",
    "Huhtikuu",
    "Toukokuu",
    "Kesäkuu",
    "Heinäkuu",
    "Elokuu",
    "Syyskuu",
    "Lokakuu",
    "Marraskuu",
    "Joulukuu",
];

/// Finnish month names in genitive case, used for full dates.
pub const MONTHS_GENITIVE: [&str; 12] = [
    "tammikuuta",
    "helmikuuta",
    "maaliskuuta",
    "huhtikuuta",
    "toukokuuta",
    "kesäkuuta",
    "heinäkuuta",
    "elokuuta",
    "syyskuuta",
    "lokakuuta",
    "marraskuuta",
    "joulukuuta",
];

/// Parse `selector`, reporting failures against the adapter's domain.
pub fn selector(domain: &str, css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|_| ExtractionError::InvalidSelector {
        domain: domain.to_string(),
        selector: css.to_string(),
    })
}

/// Collapsed, trimmed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first non-empty match for any of `selectors`, tried in order.
pub fn first_text(
    doc: &Html,
    domain: &str,
    selectors: &[&str],
) -> Result<Option<String>, ExtractionError> {
    for css in selectors {
        let sel = selector(domain, css)?;
        if let Some(text) = doc
            .select(&sel)
            .map(element_text)
            .find(|text| !text.is_empty())
        {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Attribute value of the first element matching `css` that carries it.
pub fn first_attr(
    doc: &Html,
    domain: &str,
    css: &str,
    attr: &str,
) -> Result<Option<String>, ExtractionError> {
    let sel = selector(domain, css)?;
    Ok(doc
        .select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty()))
}

/// Mandatory title: a page without one is not a review page of this source.
pub fn require_title(
    doc: &Html,
    domain: &str,
    selectors: &[&str],
) -> Result<String, ExtractionError> {
    first_text(doc, domain, selectors)?.ok_or_else(|| ExtractionError::MissingField {
        domain: domain.to_string(),
        field: "title",
    })
}

/// Rewrite a plain `First Last` byline to `Last, First`.
///
/// Anything that is not exactly two name-like tokens passes through as is.
pub fn last_name_first(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [first, last] if is_name_token(first) && is_name_token(last) => {
            format!("{}, {}", last, first)
        }
        _ => tokens.join(" "),
    }
}

/// Byline in the form the reference block expects for `style`.
pub fn format_author(style: AuthorStyle, raw: Option<String>) -> String {
    let raw = raw.unwrap_or_default();
    match style {
        AuthorStyle::RealName => last_name_first(&raw),
        AuthorStyle::Handle => raw.trim().to_string(),
    }
}

fn is_name_token(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_uppercase())
        && token.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
}

/// Strategy (a): machine-readable timestamp → `D.M.YYYY` without leading zeros.
///
/// Accepts RFC 3339 (`2023-03-14T10:00:00+02:00`) and plain `YYYY-MM-DD`.
pub fn timestamp_date(raw: &str) -> ReviewDate {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()));

    match date {
        Some(date) => ReviewDate::Published(day_month_year(date)),
        None => ReviewDate::Unavailable,
    }
}

/// Strategy (a) over the first `(selector, attribute)` pair that yields a value.
pub fn first_timestamp(
    doc: &Html,
    domain: &str,
    candidates: &[(&str, &str)],
) -> Result<ReviewDate, ExtractionError> {
    for (css, attr) in candidates {
        if let Some(raw) = first_attr(doc, domain, css, attr)? {
            if let date @ ReviewDate::Published(_) = timestamp_date(&raw) {
                return Ok(date);
            }
        }
    }
    Ok(ReviewDate::Unavailable)
}

/// Visible date after the last `-` of a byline such as `Name - 04.03.2023`.
pub fn byline_date(raw: &str) -> ReviewDate {
    let tail = raw.rsplit('-').next().unwrap_or(raw).trim();
    match NaiveDate::parse_from_str(tail, "%d.%m.%Y") {
        Ok(date) => ReviewDate::Published(day_month_year(date)),
        Err(_) => ReviewDate::Unavailable,
    }
}

/// `D.M.YYYY` with no leading zeros on day or month.
pub fn day_month_year(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

/// Strategy (b): a `M/YYYY` short form → `<Month> YYYY` in Finnish.
///
/// The short form may be surrounded by other text (`Soundi 3/2023`).
pub fn month_year_date(raw: &str) -> ReviewDate {
    let found = raw.split_whitespace().find_map(|token| {
        let (month, year) = token.split_once('/')?;
        let month: usize = month.parse().ok()?;
        let year: u32 = year
            .trim_end_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .ok()?;
        let name = MONTHS_NOMINATIVE.get(month.checked_sub(1)?)?;
        (year >= 1000).then(|| format!("{} {}", name, year))
    });

    match found {
        Some(date) => ReviewDate::Published(date),
        None => ReviewDate::Unavailable,
    }
}

/// Count full and half rating icons.
pub fn icon_rating(
    doc: &Html,
    domain: &str,
    full_css: &str,
    half_css: &str,
) -> Result<Option<RawRating>, ExtractionError> {
    let full = doc.select(&selector(domain, full_css)?).count();
    let half = doc.select(&selector(domain, half_css)?).count();
    if full == 0 && half == 0 {
        return Ok(None);
    }
    Ok(Some(RawRating::Icons { full, half }))
}

/// Count markers carrying `filled_class` inside the first `container_css` match.
pub fn marker_rating(
    doc: &Html,
    domain: &str,
    container_css: &str,
    marker_css: &str,
    filled_class: &str,
) -> Result<Option<RawRating>, ExtractionError> {
    let container_sel = selector(domain, container_css)?;
    let marker_sel = selector(domain, marker_css)?;

    let Some(container) = doc.select(&container_sel).next() else {
        return Ok(None);
    };

    let markers: Vec<ElementRef<'_>> = container
        .select(&marker_sel)
        .filter(|m| m.id() != container.id())
        .collect();
    let filled = markers
        .iter()
        .filter(|m| m.value().classes().any(|c| c == filled_class))
        .count();

    Ok(Some(RawRating::Markers {
        filled,
        total: markers.len(),
    }))
}

/// Text of the first element holding a `/` fraction.
pub fn fraction_rating(
    doc: &Html,
    domain: &str,
    selectors: &[&str],
) -> Result<Option<RawRating>, ExtractionError> {
    for css in selectors {
        let sel = selector(domain, css)?;
        if let Some(text) = doc
            .select(&sel)
            .map(element_text)
            .find(|text| text.contains('/'))
        {
            return Ok(Some(RawRating::Fraction(text)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_name_first() {
        assert_eq!(last_name_first("Matti Meikäläinen"), "Meikäläinen, Matti");
        assert_eq!(last_name_first("  Anna-Liisa   Virtanen "), "Virtanen, Anna-Liisa");
    }

    #[test]
    fn test_last_name_first_passes_through_other_shapes() {
        assert_eq!(last_name_first("Jay H. Gorania"), "Jay H. Gorania");
        assert_eq!(last_name_first("Toimitus"), "Toimitus");
        assert_eq!(last_name_first("metalhead666 reviews"), "metalhead666 reviews");
        assert_eq!(last_name_first(""), "");
    }

    #[test]
    fn test_handle_bylines_untouched() {
        assert_eq!(
            format_author(AuthorStyle::Handle, Some("Axl Rosenberg".to_string())),
            "Axl Rosenberg"
        );
        assert_eq!(
            format_author(AuthorStyle::RealName, Some("Axl Rosenberg".to_string())),
            "Rosenberg, Axl"
        );
        assert_eq!(format_author(AuthorStyle::RealName, None), "");
    }

    #[test]
    fn test_first_timestamp_falls_through_candidates() {
        let doc = Html::parse_document(
            r#"<time datetime="not a date"></time><meta property="article:published_time" content="2024-01-09T08:00:00+00:00">"#,
        );
        let date = first_timestamp(
            &doc,
            "t",
            &[
                ("time[datetime]", "datetime"),
                ("meta[property='article:published_time']", "content"),
            ],
        )
        .unwrap();
        assert_eq!(date, ReviewDate::Published("9.1.2024".to_string()));
    }

    #[test]
    fn test_timestamp_date_strips_leading_zeros() {
        assert_eq!(
            timestamp_date("2023-03-04T10:00:00+02:00"),
            ReviewDate::Published("4.3.2023".to_string())
        );
        assert_eq!(
            timestamp_date("2021-11-20"),
            ReviewDate::Published("20.11.2021".to_string())
        );
    }

    #[test]
    fn test_timestamp_date_unparseable() {
        assert_eq!(timestamp_date("eilen"), ReviewDate::Unavailable);
    }

    #[test]
    fn test_byline_date() {
        assert_eq!(
            byline_date("Matti Meikäläinen - 04.03.2023"),
            ReviewDate::Published("4.3.2023".to_string())
        );
        assert_eq!(
            byline_date("Anna-Liisa Virtanen - 4.3.2023"),
            ReviewDate::Published("4.3.2023".to_string())
        );
        assert_eq!(byline_date("Anna-Liisa Virtanen"), ReviewDate::Unavailable);
    }

    #[test]
    fn test_month_year_date() {
        assert_eq!(
            month_year_date("Soundi 3/2023"),
            ReviewDate::Published("Maaliskuu 2023".to_string())
        );
        assert_eq!(
            month_year_date("12/2019."),
            ReviewDate::Published("Joulukuu 2019".to_string())
        );
        assert_eq!(month_year_date("13/2019"), ReviewDate::Unavailable);
        assert_eq!(month_year_date("no date"), ReviewDate::Unavailable);
    }

    #[test]
    fn test_marker_rating_counts_filled() {
        let doc = Html::parse_document(
            r#"<div class="rating"><div class="one"></div><div class="one"></div><div class="zero"></div></div>"#,
        );
        let raw = marker_rating(&doc, "t", "div.rating", "div", "one").unwrap();
        assert_eq!(
            raw,
            Some(RawRating::Markers {
                filled: 2,
                total: 3
            })
        );
    }

    #[test]
    fn test_first_text_skips_empty_matches() {
        let doc = Html::parse_document(r#"<h1 class="a"> </h1><h1 class="b">Arvio</h1>"#);
        let text = first_text(&doc, "t", &["h1.a", "h1.b"]).unwrap();
        assert_eq!(text.as_deref(), Some("Arvio"));
    }

    #[test]
    fn test_require_title_missing() {
        let doc = Html::parse_document("<p>nothing</p>");
        let err = require_title(&doc, "kaaoszine.fi", &["h1"]).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MissingField {
                domain: "kaaoszine.fi".to_string(),
                field: "title"
            }
        );
    }
}
