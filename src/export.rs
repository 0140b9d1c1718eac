use std::io;
use std::path::Path;

use anyhow::Context;

use crate::models::NormalizedReview;

const HEADER: [&str; 8] = ["ID", "Listing", "Guest", "Rating", "Channel", "Status", "Date", "Review"];

pub fn write_csv<W: io::Write>(writer: W, reviews: &[NormalizedReview]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for review in reviews {
        csv.write_record([
            review.id.to_string(),
            review.listing_name.clone(),
            review.guest_name.clone(),
            format!("{:.1}", review.overall_rating),
            review.channel.to_string(),
            review.status.to_string(),
            review.submitted_at.clone(),
            review.public_review.clone(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, reviews: &[NormalizedReview]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, reviews)?;
    Ok(reviews.len())
}
