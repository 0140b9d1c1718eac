use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, ServiceError};
use crate::filter::{parse_end_bound, parse_start_bound, parse_timestamp, sort_reviews, ReviewFilter, SortOrder};
use crate::models::{DateRange, NormalizedReview, RawReview, ReviewsMetadata, Sentiment};
use crate::normalize::{normalize_reviews, round_to_tenth};
use crate::store::ApprovalStore;

/// Validated body of an approval change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub review_id: i64,
    pub approved: bool,
}

impl ApprovalRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    /// `reviewId` must be a JSON integer and `approved` a JSON boolean.
    /// Nothing is coerced: `"7455"`, `7455.0` and `"true"` are all rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ServiceError::Validation("body must be a JSON object".to_string()))?;
        let review_id = object
            .get("reviewId")
            .and_then(Value::as_i64)
            .ok_or_else(|| ServiceError::Validation("reviewId must be an integer".to_string()))?;
        let approved = object
            .get("approved")
            .and_then(Value::as_bool)
            .ok_or_else(|| ServiceError::Validation("approved must be a boolean".to_string()))?;
        Ok(Self {
            review_id,
            approved,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub success: bool,
    pub review_id: i64,
    pub approved: bool,
}

/// Query accepted by the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQuery {
    pub listing_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub only_approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewsResponse {
    pub status: &'static str,
    pub count: usize,
    pub reviews: Vec<NormalizedReview>,
    pub metadata: ReviewsMetadata,
}

/// Approved reviews of one property, as shown on its public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReviews {
    pub listing_id: String,
    pub average_rating: f64,
    pub positive: usize,
    pub negative: usize,
    pub reviews: Vec<NormalizedReview>,
}

/// Serving-side facade: owns the normalized batch and the approval store
/// seeded from it.
#[derive(Debug)]
pub struct ReviewService {
    reviews: Vec<NormalizedReview>,
    store: ApprovalStore,
}

impl ReviewService {
    pub fn new(raw: &[RawReview]) -> Self {
        let reviews = normalize_reviews(raw);
        let store = ApprovalStore::new();
        store.initialize(&reviews);
        Self { reviews, store }
    }

    pub fn store(&self) -> &ApprovalStore {
        &self.store
    }

    /// Normalized reviews as they came from the channels, before any
    /// approval changes.
    pub fn reviews(&self) -> &[NormalizedReview] {
        &self.reviews
    }

    pub fn merged(&self) -> Vec<NormalizedReview> {
        self.store.with_approval_merged(&self.reviews)
    }

    pub fn approved(&self) -> Vec<NormalizedReview> {
        self.store.approved_only(&self.reviews)
    }

    pub fn apply_approval(&self, request: &ApprovalRequest) -> ApprovalResponse {
        let success = self.store.set_approval(request.review_id, request.approved);
        if !self.reviews.iter().any(|r| r.id == request.review_id) {
            warn!(review_id = request.review_id, "approval recorded for unknown review");
        }
        ApprovalResponse {
            success,
            review_id: request.review_id,
            approved: request.approved,
        }
    }

    /// Validates the body before touching the store; a rejected body leaves
    /// every approval unchanged.
    pub fn handle_approval_json(&self, body: &str) -> Result<ApprovalResponse> {
        let request = ApprovalRequest::from_json(body)?;
        Ok(self.apply_approval(&request))
    }

    pub fn query(&self, query: &ReviewQuery) -> Result<ReviewsResponse> {
        let mut reviews = if query.only_approved {
            self.approved()
        } else {
            self.merged()
        };

        if let Some(listing_id) = query.listing_id.as_deref().filter(|id| !id.is_empty()) {
            reviews.retain(|review| review.listing_id == listing_id);
        }

        // A range only applies when both ends are given.
        if let (Some(start), Some(end)) = (&query.start_date, &query.end_date) {
            let start = parse_start_bound(start)
                .ok_or_else(|| ServiceError::Validation(format!("invalid startDate: {start}")))?;
            let end = parse_end_bound(end)
                .ok_or_else(|| ServiceError::Validation(format!("invalid endDate: {end}")))?;
            reviews = ReviewFilter::new()
                .between(Some(start), Some(end))
                .apply(&reviews);
        }

        debug!(count = reviews.len(), ?query, "review query served");
        let metadata = metadata(&reviews);
        Ok(ReviewsResponse {
            status: "success",
            count: reviews.len(),
            reviews,
            metadata,
        })
    }

    pub fn dashboard(&self, filter: &ReviewFilter) -> Vec<NormalizedReview> {
        filter.apply(&self.merged())
    }

    pub fn property_reviews(&self, listing_id: &str, order: SortOrder, min_rating: f64) -> PropertyReviews {
        let approved: Vec<NormalizedReview> = self
            .approved()
            .into_iter()
            .filter(|review| review.listing_id == listing_id)
            .collect();

        let average_rating = if approved.is_empty() {
            0.0
        } else {
            round_to_tenth(approved.iter().map(|r| r.overall_rating).sum::<f64>() / approved.len() as f64)
        };
        let count = |sentiment: Sentiment| approved.iter().filter(|r| r.sentiment == sentiment).count();
        let positive = count(Sentiment::Positive);
        let negative = count(Sentiment::Negative);

        let mut reviews = ReviewFilter::new().min_rating(min_rating).apply(&approved);
        sort_reviews(&mut reviews, order);

        PropertyReviews {
            listing_id: listing_id.to_string(),
            average_rating,
            positive,
            negative,
            reviews,
        }
    }
}

/// Distinct listing labels and the submission span of a result set.
pub fn metadata(reviews: &[NormalizedReview]) -> ReviewsMetadata {
    let mut labels: Vec<&str> = reviews.iter().map(|r| r.listing_name.as_str()).collect();
    labels.sort_unstable();
    labels.dedup();

    let mut dated: Vec<(chrono::NaiveDateTime, &str)> = reviews
        .iter()
        .filter_map(|r| parse_timestamp(&r.submitted_at).map(|at| (at, r.submitted_at.as_str())))
        .collect();
    dated.sort_by_key(|(at, _)| *at);

    let date_range = match (dated.first(), dated.last()) {
        (Some((_, oldest)), Some((_, newest))) => Some(DateRange {
            oldest: oldest.to_string(),
            newest: newest.to_string(),
        }),
        _ => None,
    };

    ReviewsMetadata {
        total_listings: labels.len(),
        date_range,
    }
}
