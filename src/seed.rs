use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::models::{RawReview, ReviewCategory};

#[allow(clippy::too_many_arguments)]
fn sample(
    id: i64,
    review_type: &str,
    status: &str,
    rating: Option<f64>,
    public_review: &str,
    categories: &[(&str, f64)],
    submitted_at: &str,
    guest_name: &str,
    listing_name: &str,
    channel: &str,
) -> RawReview {
    RawReview {
        id,
        review_type: review_type.to_string(),
        status: status.to_string(),
        rating,
        public_review: public_review.to_string(),
        review_category: categories
            .iter()
            .map(|(category, rating)| ReviewCategory::new(*category, *rating))
            .collect(),
        submitted_at: submitted_at.to_string(),
        guest_name: guest_name.to_string(),
        listing_name: listing_name.to_string(),
        channel: Some(channel.to_string()),
    }
}

/// The fixed batch served in place of a live channel fetch.
pub fn sample_reviews() -> Vec<RawReview> {
    vec![
        sample(
            7453,
            "host-to-guest",
            "published",
            None,
            "Shane and family are wonderful! Would definitely host again :)",
            &[("cleanliness", 10.0), ("communication", 10.0), ("respect_house_rules", 10.0)],
            "2020-08-21 22:45:14",
            "Shane Finkelstein",
            "2B N1 A - 29 Shoreditch Heights",
            "airbnb",
        ),
        sample(
            7454,
            "guest-to-host",
            "published",
            Some(4.5),
            "Great location but the bathroom could have been cleaner.",
            &[("cleanliness", 6.0), ("location", 9.0), ("value", 8.0), ("checkin", 10.0)],
            "2021-03-15 14:30:00",
            "Maria Rodriguez",
            "2B N1 A - 29 Shoreditch Heights",
            "vrbo",
        ),
        sample(
            7455,
            "guest-to-host",
            "unpublished",
            Some(2.0),
            "Had issues with heating not working properly during our stay. The host was slow to respond.",
            &[("amenities", 3.0), ("communication", 4.0), ("cleanliness", 7.0), ("accuracy", 5.0)],
            "2021-12-05 09:15:00",
            "James Wilson",
            "Studio 3C - Downtown Loft",
            "booking.com",
        ),
        sample(
            7456,
            "guest-to-host",
            "pending",
            Some(9.0),
            "Absolutely perfect stay! Will definitely return. The view was breathtaking.",
            &[("cleanliness", 10.0), ("communication", 9.0), ("location", 10.0), ("value", 8.0)],
            "2022-05-20 16:45:00",
            "Sarah Chen",
            "3B N2 B - Lakeside Villa",
            "airbnb",
        ),
        sample(
            7457,
            "host-to-guest",
            "published",
            None,
            "Excellent guests, left the place spotless! Highly recommend.",
            &[("cleanliness", 10.0), ("respect_house_rules", 10.0), ("communication", 9.0)],
            "2022-08-10 11:20:00",
            "Robert Kim",
            "Studio 3C - Downtown Loft",
            "direct",
        ),
        sample(
            7458,
            "guest-to-host",
            "published",
            Some(8.5),
            "Comfortable stay with great amenities. Minor issue with WiFi speed.",
            &[("cleanliness", 9.0), ("amenities", 7.0), ("location", 9.0), ("value", 9.0)],
            "2023-01-12 18:30:00",
            "David Miller",
            "2B N1 A - 29 Shoreditch Heights",
            "airbnb",
        ),
        sample(
            7459,
            "guest-to-host",
            "published",
            Some(10.0),
            "Best Airbnb experience ever! The host went above and beyond.",
            &[("cleanliness", 10.0), ("communication", 10.0), ("location", 10.0), ("value", 10.0)],
            "2023-04-22 10:15:00",
            "Lisa Thompson",
            "3B N2 B - Lakeside Villa",
            "airbnb",
        ),
        sample(
            7460,
            "guest-to-host",
            "unpublished",
            Some(3.0),
            "The apartment didn't match the photos. Furniture was worn out.",
            &[("accuracy", 2.0), ("cleanliness", 5.0), ("amenities", 4.0)],
            "2023-07-30 13:45:00",
            "Michael Brown",
            "Penthouse A - Skyline View",
            "vrbo",
        ),
        sample(
            7461,
            "host-to-guest",
            "published",
            None,
            "Polite and respectful guests. Welcome back anytime!",
            &[("cleanliness", 9.0), ("respect_house_rules", 10.0), ("communication", 8.0)],
            "2023-09-05 15:20:00",
            "Emily Davis",
            "Penthouse A - Skyline View",
            "booking.com",
        ),
        sample(
            7462,
            "guest-to-host",
            "pending",
            Some(7.5),
            "Good value for money. The kitchen was well-equipped.",
            &[("cleanliness", 8.0), ("amenities", 9.0), ("value", 10.0), ("location", 6.0)],
            "2023-11-18 12:00:00",
            "Thomas Wilson",
            "Studio 3C - Downtown Loft",
            "direct",
        ),
    ]
}

/// Reads a JSON array of raw reviews, e.g. a saved channel export.
pub fn load_raw_reviews(path: &Path) -> anyhow::Result<Vec<RawReview>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read reviews from {}", path.display()))?;
    let reviews: Vec<RawReview> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of reviews", path.display()))?;
    info!(count = reviews.len(), path = %path.display(), "loaded raw reviews");
    Ok(reviews)
}
