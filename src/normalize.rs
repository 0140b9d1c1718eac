use tracing::{debug, warn};

use crate::models::{
    Channel, NormalizedReview, RawReview, ReviewCategory, ReviewStatus, ReviewType, Sentiment,
};

/// Body keywords that flag a review for follow-up regardless of its rating.
pub const NEGATIVE_KEYWORDS: [&str; 7] = [
    "issue",
    "problem",
    "broken",
    "dirty",
    "poor",
    "bad",
    "disappointed",
];

const LISTING_SEPARATOR: &str = " - ";

/// Maps a raw batch onto canonical reviews, one output per input, in order.
/// Never fails: unrecognized enum values are replaced by their defaults.
pub fn normalize_reviews(raw: &[RawReview]) -> Vec<NormalizedReview> {
    debug!(count = raw.len(), "normalizing review batch");
    raw.iter().map(normalize_review).collect()
}

pub fn normalize_review(raw: &RawReview) -> NormalizedReview {
    let overall = overall_rating(&raw.review_category, raw.rating);
    let review_type = coerce_logged(raw.id, "type", &raw.review_type, ReviewType::parse);
    let status = coerce_logged(raw.id, "status", &raw.status, ReviewStatus::parse);
    let channel = match raw.channel.as_deref() {
        Some(value) => coerce_logged(raw.id, "channel", value, Channel::parse),
        None => Channel::default(),
    };

    NormalizedReview {
        id: raw.id,
        review_type,
        status,
        overall_rating: overall,
        public_review: raw.public_review.clone(),
        categories: raw.review_category.clone(),
        submitted_at: raw.submitted_at.clone(),
        guest_name: raw.guest_name.clone(),
        listing_id: listing_id(&raw.listing_name).to_string(),
        listing_name: raw.listing_name.clone(),
        channel,
        is_approved: status == ReviewStatus::Published,
        needs_attention: needs_attention(overall, &raw.review_category, &raw.public_review),
        sentiment: classify_sentiment(overall),
    }
}

fn coerce_logged<T: Default>(id: i64, field: &str, value: &str, parse: fn(&str) -> Option<T>) -> T {
    parse(value).unwrap_or_else(|| {
        warn!(review_id = id, field, value, "unrecognized value, using default");
        T::default()
    })
}

/// Mean of the category ratings, falling back to the review's own rating
/// and then to zero. Always rounded to one decimal place.
pub fn overall_rating(categories: &[ReviewCategory], fallback: Option<f64>) -> f64 {
    let raw = if categories.is_empty() {
        fallback.unwrap_or(0.0)
    } else {
        let total: f64 = categories.iter().map(|c| c.rating).sum();
        total / categories.len() as f64
    };
    round_to_tenth(raw)
}

/// Rounds half away from zero at the first decimal (8.25 -> 8.3, -8.25 -> -8.3).
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Listing code: everything before the first `" - "`, or the whole label.
pub fn listing_id(listing_name: &str) -> &str {
    listing_name
        .split_once(LISTING_SEPARATOR)
        .map_or(listing_name, |(code, _)| code)
}

/// `>= 8` is positive, `<= 5` is negative. The two ranges cannot overlap, so
/// checking positive first is only a matter of reading order.
pub fn classify_sentiment(overall: f64) -> Sentiment {
    if overall >= 8.0 {
        Sentiment::Positive
    } else if overall <= 5.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn needs_attention(overall: f64, categories: &[ReviewCategory], body: &str) -> bool {
    if overall < 7.0 || categories.iter().any(|c| c.rating < 5.0) {
        return true;
    }
    let body = body.to_lowercase();
    NEGATIVE_KEYWORDS.iter().any(|keyword| body.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, categories: &[(&str, f64)], rating: Option<f64>, body: &str) -> RawReview {
        RawReview {
            id,
            review_type: "guest-to-host".to_string(),
            status: "published".to_string(),
            rating,
            public_review: body.to_string(),
            review_category: categories
                .iter()
                .map(|(name, value)| ReviewCategory::new(*name, *value))
                .collect(),
            submitted_at: "2023-01-12 18:30:00".to_string(),
            guest_name: "David Miller".to_string(),
            listing_name: "2B N1 A - 29 Shoreditch Heights".to_string(),
            channel: Some("airbnb".to_string()),
        }
    }

    #[test]
    fn overall_rating_uses_category_mean() {
        let categories = [
            ReviewCategory::new("cleanliness", 6.0),
            ReviewCategory::new("location", 9.0),
            ReviewCategory::new("value", 8.0),
            ReviewCategory::new("checkin", 10.0),
        ];
        // Category mean wins over the record's own rating.
        assert_eq!(overall_rating(&categories, Some(4.5)), 8.3);
    }

    #[test]
    fn overall_rating_falls_back_to_rating_then_zero() {
        assert_eq!(overall_rating(&[], Some(7.46)), 7.5);
        assert_eq!(overall_rating(&[], None), 0.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to_tenth(8.25), 8.3);
        assert_eq!(round_to_tenth(-8.25), -8.3);
        assert_eq!(round_to_tenth(6.75), 6.8);
        assert_eq!(round_to_tenth(4.75), 4.8);
        assert_eq!(round_to_tenth(5.0), 5.0);
    }

    #[test]
    fn listing_id_splits_on_first_separator() {
        assert_eq!(listing_id("2B N1 A - 29 Shoreditch Heights"), "2B N1 A");
        assert_eq!(listing_id("NoSeparatorLabel"), "NoSeparatorLabel");
        assert_eq!(listing_id("A - B - C"), "A");
        assert_eq!(listing_id("Code-NoSpaces"), "Code-NoSpaces");
    }

    #[test]
    fn sentiment_thresholds_are_inclusive() {
        assert_eq!(classify_sentiment(8.0), Sentiment::Positive);
        assert_eq!(classify_sentiment(5.0), Sentiment::Negative);
        assert_eq!(classify_sentiment(6.5), Sentiment::Neutral);
        assert_eq!(classify_sentiment(7.9), Sentiment::Neutral);
        assert_eq!(classify_sentiment(5.1), Sentiment::Neutral);
    }

    #[test]
    fn attention_triggers_on_keyword_regardless_of_rating() {
        let categories = [ReviewCategory::new("cleanliness", 7.5)];
        assert!(needs_attention(7.5, &categories, "The shower was Broken on arrival"));
        assert!(!needs_attention(7.5, &categories, "Lovely stay"));
    }

    #[test]
    fn attention_triggers_on_low_rating_or_low_category() {
        assert!(needs_attention(6.9, &[], "Lovely stay"));
        let categories = [
            ReviewCategory::new("cleanliness", 10.0),
            ReviewCategory::new("amenities", 4.0),
        ];
        assert!(needs_attention(9.0, &categories, "Lovely stay"));
    }

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let mut record = raw(1, &[("cleanliness", 9.0)], None, "Great");
        record.review_type = "owner-note".to_string();
        record.status = "archived".to_string();
        record.channel = Some("expedia".to_string());

        let review = normalize_review(&record);
        assert_eq!(review.review_type, ReviewType::GuestToHost);
        assert_eq!(review.status, ReviewStatus::Pending);
        assert_eq!(review.channel, Channel::Direct);
        assert!(!review.is_approved);
    }

    #[test]
    fn missing_channel_defaults_to_direct() {
        let mut record = raw(2, &[], Some(9.0), "Great");
        record.channel = None;
        assert_eq!(normalize_review(&record).channel, Channel::Direct);
    }

    #[test]
    fn published_status_starts_approved() {
        let review = normalize_review(&raw(3, &[("cleanliness", 9.0)], None, "Great"));
        assert!(review.is_approved);
        assert_eq!(review.listing_id, "2B N1 A");
        assert_eq!(review.sentiment, Sentiment::Positive);
        assert!(!review.needs_attention);
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let batch = vec![
            raw(30, &[], None, ""),
            raw(10, &[("value", 2.0)], None, ""),
            raw(20, &[], Some(8.0), ""),
        ];
        let ids: Vec<i64> = normalize_reviews(&batch).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }
}
