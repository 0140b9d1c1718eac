use std::collections::BTreeMap;
use std::fmt::Write;

use crate::filter::{sort_reviews, SortOrder};
use crate::models::{ListingSummary, NormalizedReview, ReviewStats, ReviewStatus};
use crate::normalize::round_to_tenth;

fn average_rating(reviews: &[&NormalizedReview]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: f64 = reviews.iter().map(|r| r.overall_rating).sum();
    round_to_tenth(total / reviews.len() as f64)
}

pub fn review_stats(reviews: &[NormalizedReview]) -> ReviewStats {
    let mut by_channel = BTreeMap::new();
    let mut by_sentiment = BTreeMap::new();
    for review in reviews {
        *by_channel.entry(review.channel).or_insert(0) += 1;
        *by_sentiment.entry(review.sentiment).or_insert(0) += 1;
    }
    let count_status = |status: ReviewStatus| reviews.iter().filter(|r| r.status == status).count();

    ReviewStats {
        total: reviews.len(),
        published: count_status(ReviewStatus::Published),
        pending: count_status(ReviewStatus::Pending),
        unpublished: count_status(ReviewStatus::Unpublished),
        needs_attention: reviews.iter().filter(|r| r.needs_attention).count(),
        avg_rating: average_rating(&reviews.iter().collect::<Vec<_>>()),
        by_channel,
        by_sentiment,
    }
}

/// One entry per distinct listing label, in first-seen order.
pub fn listing_summaries(reviews: &[NormalizedReview]) -> Vec<ListingSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<&NormalizedReview>> = BTreeMap::new();
    for review in reviews {
        let name = review.listing_name.as_str();
        if !grouped.contains_key(name) {
            order.push(name);
        }
        grouped.entry(name).or_default().push(review);
    }

    order
        .into_iter()
        .map(|name| {
            let members = &grouped[name];
            ListingSummary {
                id: members[0].listing_id.clone(),
                name: name.to_string(),
                review_count: members.len(),
                avg_rating: average_rating(members),
                needs_attention_count: members.iter().filter(|r| r.needs_attention).count(),
            }
        })
        .collect()
}

pub fn build_report(scope: Option<&str>, reviews: &[NormalizedReview]) -> String {
    let stats = review_stats(reviews);
    let listings = listing_summaries(reviews);

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all properties");

    let _ = writeln!(output, "# Guest Review Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} reviews, average rating {:.1})",
        scope_label, stats.total, stats.avg_rating
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(
        output,
        "- Published: {}\n- Pending: {}\n- Unpublished: {}\n- Needs attention: {}",
        stats.published, stats.pending, stats.unpublished, stats.needs_attention
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Channel Mix");
    if stats.by_channel.is_empty() {
        let _ = writeln!(output, "No reviews recorded.");
    } else {
        for (channel, count) in &stats.by_channel {
            let _ = writeln!(output, "- {}: {} reviews", channel, count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Listings");
    if listings.is_empty() {
        let _ = writeln!(output, "No listings with reviews.");
    } else {
        for listing in &listings {
            let _ = writeln!(
                output,
                "- {} ({}): {} reviews, avg {:.1}, {} need attention",
                listing.name,
                listing.id,
                listing.review_count,
                listing.avg_rating,
                listing.needs_attention_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Needs Attention");
    let flagged: Vec<&NormalizedReview> = reviews.iter().filter(|r| r.needs_attention).collect();
    if flagged.is_empty() {
        let _ = writeln!(output, "Nothing flagged.");
    } else {
        for review in flagged {
            let _ = writeln!(
                output,
                "- #{} {} on {} ({:.1}, {}): {}",
                review.id,
                review.guest_name,
                review.listing_id,
                review.overall_rating,
                review.channel,
                review.public_review
            );
        }
    }

    let mut recent = reviews.to_vec();
    sort_reviews(&mut recent, SortOrder::Date);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Recent Reviews");
    if recent.is_empty() {
        let _ = writeln!(output, "No reviews recorded.");
    } else {
        for review in recent.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} ({}) on {}: {}",
                review.guest_name, review.status, review.submitted_at, review.public_review
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, Sentiment};
    use crate::normalize::normalize_reviews;
    use crate::seed::sample_reviews;

    #[test]
    fn stats_count_statuses_channels_and_sentiment() {
        let stats = review_stats(&normalize_reviews(&sample_reviews()));
        assert_eq!(stats.total, 10);
        assert_eq!(stats.published, 6);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.unpublished, 2);
        assert_eq!(stats.needs_attention, 3);
        assert_eq!(stats.by_channel[&Channel::Airbnb], 4);
        assert_eq!(stats.by_channel[&Channel::BookingCom], 2);
        assert_eq!(stats.by_sentiment[&Sentiment::Negative], 2);
        assert_eq!(stats.by_sentiment[&Sentiment::Positive], 8);
        assert!(!stats.by_sentiment.contains_key(&Sentiment::Neutral));
        assert_eq!(stats.avg_rating, 8.2);
    }

    #[test]
    fn stats_on_empty_input_are_zero() {
        let stats = review_stats(&[]);
        assert_eq!(stats, ReviewStats::default());
    }

    #[test]
    fn listings_follow_first_seen_order() {
        let listings = listing_summaries(&normalize_reviews(&sample_reviews()));
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2B N1 A", "Studio 3C", "3B N2 B", "Penthouse A"]);

        let shoreditch = &listings[0];
        assert_eq!(shoreditch.review_count, 3);
        assert_eq!(shoreditch.avg_rating, 8.9);
        assert_eq!(shoreditch.needs_attention_count, 1);
    }

    #[test]
    fn report_lists_flagged_reviews() {
        let report = build_report(Some("Studio 3C"), &normalize_reviews(&sample_reviews()));
        assert!(report.starts_with("# Guest Review Report"));
        assert!(report.contains("Generated for Studio 3C"));
        assert!(report.contains("- #7455 James Wilson on Studio 3C (4.8, booking.com)"));
        assert!(report.contains("- booking.com: 2 reviews"));
    }

    #[test]
    fn report_handles_empty_input() {
        let report = build_report(None, &[]);
        assert!(report.contains("Generated for all properties (0 reviews"));
        assert!(report.contains("Nothing flagged."));
    }
}
