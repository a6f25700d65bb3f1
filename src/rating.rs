//! Rating normalization.
//!
//! Every source declares one [`RatingEncoding`] and one [`RatingScale`].
//! [`normalize`] turns the raw token an adapter read off the page into a
//! [`Rating`] on that scale. A missing, mismatched, or out-of-range token is
//! [`Rating::Unrated`], never zero.

use std::fmt;

use crate::models::RawRating;

/// Maximum of a source's rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScale {
    Five,
    Ten,
}

impl RatingScale {
    pub fn max(self) -> f64 {
        match self {
            RatingScale::Five => 5.0,
            RatingScale::Ten => 10.0,
        }
    }
}

impl fmt::Display for RatingScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.max())
    }
}

/// How a source encodes its rating in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingEncoding {
    /// Repeated icons, optionally with half-step icons.
    IconCount,
    /// Filled markers out of a fixed-length list.
    FilledMarkers,
    /// A fraction embedded in text, e.g. `8/10`.
    FractionText,
    /// A two-digit code in an image filename; a trailing 5 is a half point.
    CodedFilename,
}

impl RatingEncoding {
    pub fn label(self) -> &'static str {
        match self {
            RatingEncoding::IconCount => "icon-count",
            RatingEncoding::FilledMarkers => "filled-markers",
            RatingEncoding::FractionText => "fraction-text",
            RatingEncoding::CodedFilename => "coded-filename",
        }
    }
}

/// A score on a declared scale. Always `0 <= score <= scale.max()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRating {
    score: f64,
    scale: RatingScale,
}

impl NormalizedRating {
    pub fn new(score: f64, scale: RatingScale) -> Option<Self> {
        if score.is_finite() && (0.0..=scale.max()).contains(&score) {
            Some(Self { score, scale })
        } else {
            None
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Score as written in markup: `4`, `3.5`, `8.5`.
    pub fn score_label(&self) -> String {
        format!("{}", self.score)
    }
}

/// Outcome of normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Scored(NormalizedRating),
    Unrated,
}

impl Rating {
    pub fn scored(&self) -> Option<&NormalizedRating> {
        match self {
            Rating::Scored(rating) => Some(rating),
            Rating::Unrated => None,
        }
    }
}

/// Normalize a raw rating token according to the source's declared encoding.
pub fn normalize(encoding: RatingEncoding, scale: RatingScale, raw: Option<&RawRating>) -> Rating {
    let Some(raw) = raw else {
        return Rating::Unrated;
    };

    let score = match (encoding, raw) {
        (RatingEncoding::IconCount, RawRating::Icons { full, half }) => {
            if *full == 0 && *half == 0 {
                None
            } else {
                Some(*full as f64 + 0.5 * *half as f64)
            }
        }
        (RatingEncoding::FilledMarkers, RawRating::Markers { filled, total }) => {
            markers_to_score(*filled, *total, scale)
        }
        (RatingEncoding::FractionText, RawRating::Fraction(text)) => {
            parse_fraction(text).and_then(|(num, den)| rescale(num, den, scale))
        }
        (RatingEncoding::CodedFilename, RawRating::Filename(name)) => decode_filename(name),
        _ => None,
    };

    score
        .and_then(|s| NormalizedRating::new(s, scale))
        .map(Rating::Scored)
        .unwrap_or(Rating::Unrated)
}

/// An empty marker list means the element was there but held no rating.
fn markers_to_score(filled: usize, total: usize, scale: RatingScale) -> Option<f64> {
    if total == 0 {
        return None;
    }
    rescale(filled as f64, total as f64, scale)
}

/// Bring `num / den` onto `scale`. Identity when `den` already equals the max.
fn rescale(num: f64, den: f64, scale: RatingScale) -> Option<f64> {
    if den <= 0.0 || num < 0.0 || num > den {
        return None;
    }
    if den == scale.max() {
        return Some(num);
    }
    // Round to the nearest half step so rescaled scores stay printable.
    Some((num / den * scale.max() * 2.0).round() / 2.0)
}

/// Find the first `a/b` fraction in free text. Accepts `,` as decimal mark.
pub fn parse_fraction(text: &str) -> Option<(f64, f64)> {
    let (left, right) = text.split_once('/')?;

    let num: String = left
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let den: String = right
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let num: f64 = num.replace(',', ".").parse().ok()?;
    let den: f64 = den.replace(',', ".").parse().ok()?;
    Some((num, den))
}

/// Decode the last two-digit group in a filename: `45` → 4.5, `40` → 4.
///
/// A trailing 0 is a whole score and a trailing 5 a half point; any other
/// trailing digit is not a rating code.
pub fn decode_filename(name: &str) -> Option<f64> {
    let stem = name
        .rsplit('/')
        .next()
        .unwrap_or(name)
        .split(['?', '#'])
        .next()
        .unwrap_or(name);
    let stem = stem.rsplit_once('.').map(|(s, _)| s).unwrap_or(stem);

    let digits: Vec<u32> = stem
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| group.len() == 2)
        .last()?
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    match digits.as_slice() {
        [whole, 0] => Some(*whole as f64),
        [whole, 5] => Some(*whole as f64 + 0.5),
        _ => None,
    }
}
