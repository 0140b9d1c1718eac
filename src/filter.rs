use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{Channel, NormalizedReview, ReviewStatus};

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp shapes channels send. RFC 3339 values are converted
/// to UTC; a bare date means midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

pub fn parse_start_bound(value: &str) -> Option<NaiveDateTime> {
    parse_timestamp(value)
}

/// Like [`parse_timestamp`], except that a bare date covers the whole day.
pub fn parse_end_bound(value: &str) -> Option<NaiveDateTime> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => date.and_hms_milli_opt(23, 59, 59, 999),
        Err(_) => parse_timestamp(value),
    }
}

/// Dashboard filter criteria. Every unset criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub listing_id: Option<String>,
    pub channel: Option<Channel>,
    pub min_rating: f64,
    pub status: Option<ReviewStatus>,
    pub needs_attention: bool,
    pub search: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl ReviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(mut self, listing_id: impl Into<String>) -> Self {
        self.listing_id = Some(listing_id.into());
        self
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn status(mut self, status: ReviewStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn needs_attention(mut self) -> Self {
        self.needs_attention = true;
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn between(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Number of criteria in effect, not counting free-text search.
    pub fn active_count(&self) -> usize {
        [
            self.listing_id.is_some(),
            self.channel.is_some(),
            self.min_rating > 0.0,
            self.status.is_some(),
            self.needs_attention,
            self.start.is_some(),
            self.end.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn matches(&self, review: &NormalizedReview) -> bool {
        if let Some(listing_id) = &self.listing_id {
            if &review.listing_id != listing_id {
                return false;
            }
        }
        if self.channel.is_some_and(|channel| channel != review.channel) {
            return false;
        }
        if self.min_rating > 0.0 && review.overall_rating < self.min_rating {
            return false;
        }
        if self.status.is_some_and(|status| status != review.status) {
            return false;
        }
        if self.needs_attention && !review.needs_attention {
            return false;
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&review.public_review, &review.guest_name, &review.listing_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.start.is_some() || self.end.is_some() {
            let Some(submitted) = parse_timestamp(&review.submitted_at) else {
                return false;
            };
            if self.start.is_some_and(|start| submitted < start) {
                return false;
            }
            if self.end.is_some_and(|end| submitted > end) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, reviews: &[NormalizedReview]) -> Vec<NormalizedReview> {
        reviews
            .iter()
            .filter(|review| self.matches(review))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Date,
    /// Highest rated first.
    Rating,
}

/// Stable sort; reviews with unparseable timestamps sink to the end under
/// `Date`.
pub fn sort_reviews(reviews: &mut [NormalizedReview], order: SortOrder) {
    match order {
        SortOrder::Date => reviews.sort_by(|a, b| {
            let a = parse_timestamp(&a.submitted_at);
            let b = parse_timestamp(&b.submitted_at);
            // Option orders None first, so compare reversed for newest-first.
            b.cmp(&a)
        }),
        SortOrder::Rating => reviews.sort_by(|a, b| {
            b.overall_rating
                .partial_cmp(&a.overall_rating)
                .unwrap_or(Ordering::Equal)
        }),
    }
}
