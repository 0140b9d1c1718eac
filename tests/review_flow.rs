use review_curator::models::{Channel, RawReview, ReviewCategory, ReviewStatus, ReviewType};
use review_curator::seed::sample_reviews;
use review_curator::{normalize_reviews, ApprovalStore, ReviewService};

fn raw(id: i64, status: &str, cleanliness: f64) -> RawReview {
    RawReview {
        id,
        review_type: "guest-to-host".to_string(),
        status: status.to_string(),
        rating: None,
        public_review: "Stayed two nights".to_string(),
        review_category: vec![ReviewCategory::new("cleanliness", cleanliness)],
        submitted_at: "2024-03-01 12:00:00".to_string(),
        guest_name: "Guest".to_string(),
        listing_name: "L1 - Harbour Flat".to_string(),
        channel: None,
    }
}

fn ids(reviews: &[review_curator::NormalizedReview]) -> Vec<i64> {
    reviews.iter().map(|r| r.id).collect()
}

#[test]
fn pending_review_becomes_public_once_approved() {
    let reviews = normalize_reviews(&[raw(1, "pending", 4.0), raw(2, "published", 9.0)]);
    let store = ApprovalStore::new();
    store.initialize(&reviews);

    assert_eq!(ids(&store.approved_only(&reviews)), vec![2]);

    store.set_approval(1, true);
    assert_eq!(ids(&store.approved_only(&reviews)), vec![1, 2]);

    let merged = store.with_approval_merged(&reviews);
    assert_eq!(merged[0].status, ReviewStatus::Published);
    assert!(merged[0].is_approved);
}

#[test]
fn reinitializing_does_not_revert_manual_changes() {
    let reviews = normalize_reviews(&sample_reviews());
    let store = ApprovalStore::new();
    store.initialize(&reviews);
    store.set_approval(7453, false);
    store.initialize(&reviews);
    assert!(!store.is_approved(7453));
}

#[test]
fn approving_unpublished_review_publishes_it() {
    let service = ReviewService::new(&sample_reviews());
    let original = service.reviews().iter().find(|r| r.id == 7455).unwrap();
    assert_eq!(original.status, ReviewStatus::Unpublished);

    service.store().set_approval(7455, true);
    assert!(service.approved().iter().any(|r| r.id == 7455));
    let merged = service.merged();
    assert_eq!(
        merged.iter().find(|r| r.id == 7455).map(|r| r.status),
        Some(ReviewStatus::Published)
    );
}

#[test]
fn independent_stores_do_not_share_state() {
    let first = ReviewService::new(&sample_reviews());
    let second = ReviewService::new(&sample_reviews());
    first.store().set_approval(7460, true);
    assert!(first.store().is_approved(7460));
    assert!(!second.store().is_approved(7460));
    assert!(!second.store().is_approved(123_456));
}

#[test]
fn normalization_output_is_total_and_closed() {
    let mut batch = sample_reviews();
    batch.push(RawReview {
        id: 9000,
        review_type: "Guest To Host".to_string(),
        status: "".to_string(),
        listing_name: "NoSeparatorLabel".to_string(),
        channel: Some("Airbnb".to_string()),
        ..RawReview::default()
    });

    let reviews = normalize_reviews(&batch);
    assert_eq!(reviews.len(), batch.len());
    assert_eq!(ids(&reviews), batch.iter().map(|r| r.id).collect::<Vec<_>>());

    let odd = reviews.last().unwrap();
    assert_eq!(odd.review_type, ReviewType::GuestToHost);
    assert_eq!(odd.status, ReviewStatus::Pending);
    assert_eq!(odd.channel, Channel::Direct);
    assert_eq!(odd.listing_id, "NoSeparatorLabel");
    assert_eq!(odd.overall_rating, 0.0);
    assert!(odd.needs_attention);
}

#[test]
fn normalized_reviews_serialize_with_wire_names() {
    let reviews = normalize_reviews(&sample_reviews());
    let value = serde_json::to_value(&reviews[2]).unwrap();
    assert_eq!(value["id"], 7455);
    assert_eq!(value["type"], "guest-to-host");
    assert_eq!(value["status"], "unpublished");
    assert_eq!(value["overallRating"], 4.8);
    assert_eq!(value["listingId"], "Studio 3C");
    assert_eq!(value["channel"], "booking.com");
    assert_eq!(value["isApproved"], false);
    assert_eq!(value["needsAttention"], true);
    assert_eq!(value["sentiment"], "negative");
}
