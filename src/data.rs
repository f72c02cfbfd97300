//! Review records: loading, sentiment labeling and cleaning.

use crate::error::{Error, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Three-way sentiment derived from a star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a star rating to its sentiment.
///
/// `>= 4` is positive, `<= 2` is negative and `3` is neutral. Ratings outside
/// `1..=5` are rejected rather than silently bucketed.
pub fn label_rating(rating: i64) -> Result<Sentiment> {
    match rating {
        4 | 5 => Ok(Sentiment::Positive),
        1 | 2 => Ok(Sentiment::Negative),
        3 => Ok(Sentiment::Neutral),
        other => Err(Error::RatingOutOfRange(other)),
    }
}

/// A single product review as read from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Free-text comment
    pub text: String,
    /// Star rating in `1..=5`
    pub star_rating: u8,
}

/// A review together with its derived sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledReview {
    pub text: String,
    pub star_rating: u8,
    pub sentiment: Sentiment,
}

/// Row accounting from [`load_reviews`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data rows in the file, header excluded
    pub rows_read: usize,
    /// Rows dropped because the text or rating cell was empty
    pub null_rows: usize,
    /// Rows rejected because the rating was not an integer in `1..=5`
    pub malformed_ratings: usize,
}

/// Load reviews from a header-carrying CSV file.
///
/// Columns are located by header name. Rows with a missing text or rating
/// are dropped; rows whose rating is present but not an integer in `1..=5`
/// are rejected and counted.
pub fn load_reviews(
    path: impl AsRef<Path>,
    text_column: &str,
    rating_column: &str,
) -> Result<(Vec<Review>, LoadReport)> {
    let file = File::open(path.as_ref())?;
    load_reviews_from_reader(file, text_column, rating_column)
}

/// Same as [`load_reviews`] but reads from any byte source.
pub fn load_reviews_from_reader<R: Read>(
    reader: R,
    text_column: &str,
    rating_column: &str,
) -> Result<(Vec<Review>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let text_idx = position(text_column)?;
    let rating_idx = position(rating_column)?;

    let mut report = LoadReport::default();
    let mut reviews = Vec::new();

    for result in rdr.records() {
        let record = result?;
        report.rows_read += 1;

        // Text is kept as read; trimming only decides whether the cell is null.
        let text = record.get(text_idx).unwrap_or("");
        let rating = record.get(rating_idx).map(str::trim).unwrap_or("");
        if text.trim().is_empty() || rating.is_empty() {
            report.null_rows += 1;
            continue;
        }

        match rating.parse::<i64>() {
            Ok(r) if (1..=5).contains(&r) => reviews.push(Review {
                text: text.to_string(),
                star_rating: r as u8,
            }),
            _ => {
                report.malformed_ratings += 1;
                tracing::debug!(row = report.rows_read, rating, "rejecting malformed rating");
            }
        }
    }

    if report.null_rows > 0 {
        tracing::info!("Dropped {} rows with null text or rating", report.null_rows);
    }
    if report.malformed_ratings > 0 {
        tracing::warn!(
            "Rejected {} rows with a rating outside 1..=5",
            report.malformed_ratings
        );
    }

    Ok((reviews, report))
}

/// Attach a sentiment label to every review.
pub fn label_reviews(reviews: Vec<Review>) -> Result<Vec<LabeledReview>> {
    reviews
        .into_iter()
        .map(|r| {
            let sentiment = label_rating(r.star_rating as i64)?;
            Ok(LabeledReview {
                text: r.text,
                star_rating: r.star_rating,
                sentiment,
            })
        })
        .collect()
}

/// Row accounting from [`clean`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    /// Rows whose text was empty after trimming
    pub empty_text: usize,
    /// Rows whose trimmed text was shorter than the minimum length
    pub short_text: usize,
    pub kept: usize,
}

/// Remove rows with empty or degenerate text.
///
/// `min_text_chars` counts Unicode scalar values of the trimmed text; a value
/// of `1` only removes empty rows. Cleaning is idempotent.
pub fn clean(records: Vec<LabeledReview>, min_text_chars: usize) -> (Vec<LabeledReview>, CleaningReport) {
    let mut report = CleaningReport {
        input_rows: records.len(),
        ..Default::default()
    };

    let kept: Vec<LabeledReview> = records
        .into_iter()
        .filter(|r| {
            let chars = r.text.trim().chars().count();
            if chars == 0 {
                report.empty_text += 1;
                false
            } else if chars < min_text_chars {
                report.short_text += 1;
                false
            } else {
                true
            }
        })
        .collect();

    report.kept = kept.len();
    (kept, report)
}

/// Per-sentiment row count and mean comment length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub sentiment: Sentiment,
    pub count: usize,
    /// Mean text length in characters
    pub mean_length: f64,
}

/// Group records by sentiment, in `Sentiment::ALL` order, skipping absent classes.
pub fn sentiment_summary(records: &[LabeledReview]) -> Vec<SentimentSummary> {
    Sentiment::ALL
        .iter()
        .filter_map(|&sentiment| {
            let lengths: Vec<usize> = records
                .iter()
                .filter(|r| r.sentiment == sentiment)
                .map(|r| r.text.chars().count())
                .collect();
            if lengths.is_empty() {
                return None;
            }
            let mean_length = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
            Some(SentimentSummary {
                sentiment,
                count: lengths.len(),
                mean_length,
            })
        })
        .collect()
}
