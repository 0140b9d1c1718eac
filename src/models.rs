use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCategory {
    pub category: String,
    pub rating: f64,
}

impl ReviewCategory {
    pub fn new(category: impl Into<String>, rating: f64) -> Self {
        Self {
            category: category.into(),
            rating,
        }
    }
}

/// A review as delivered by a booking channel, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub review_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub public_review: String,
    #[serde(default)]
    pub review_category: Vec<ReviewCategory>,
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub listing_name: String,
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewType {
    #[default]
    GuestToHost,
    HostToGuest,
}

impl ReviewType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "guest-to-host" => Some(Self::GuestToHost),
            "host-to-guest" => Some(Self::HostToGuest),
            _ => None,
        }
    }

    pub fn coerce(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuestToHost => "guest-to-host",
            Self::HostToGuest => "host-to-guest",
        }
    }
}

/// Lifecycle status. Unknown upstream values fall back to `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Published,
    Unpublished,
    #[default]
    Pending,
}

impl ReviewStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "published" => Some(Self::Published),
            "unpublished" => Some(Self::Unpublished),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    pub fn coerce(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Unpublished => "unpublished",
            Self::Pending => "pending",
        }
    }
}

/// Booking channel a review came through. Missing or unknown channels are
/// treated as direct bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "airbnb")]
    Airbnb,
    #[serde(rename = "vrbo")]
    Vrbo,
    #[serde(rename = "booking.com")]
    BookingCom,
    #[default]
    #[serde(rename = "direct")]
    Direct,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Airbnb,
        Channel::Vrbo,
        Channel::BookingCom,
        Channel::Direct,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == value)
    }

    pub fn coerce(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Airbnb => "airbnb",
            Self::Vrbo => "vrbo",
            Self::BookingCom => "booking.com",
            Self::Direct => "direct",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(ReviewType, ReviewStatus, Channel, Sentiment);

/// Canonical review entity. Everything downstream of the normalizer works on
/// this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    pub id: i64,
    #[serde(rename = "type")]
    pub review_type: ReviewType,
    pub status: ReviewStatus,
    pub overall_rating: f64,
    pub public_review: String,
    pub categories: Vec<ReviewCategory>,
    pub submitted_at: String,
    pub guest_name: String,
    pub listing_id: String,
    pub listing_name: String,
    pub channel: Channel,
    pub is_approved: bool,
    pub needs_attention: bool,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total: usize,
    pub published: usize,
    pub pending: usize,
    pub unpublished: usize,
    pub needs_attention: usize,
    pub avg_rating: f64,
    pub by_channel: BTreeMap<Channel, usize>,
    pub by_sentiment: BTreeMap<Sentiment, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: String,
    pub name: String,
    pub review_count: usize,
    pub avg_rating: f64,
    pub needs_attention_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub oldest: String,
    pub newest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsMetadata {
    pub total_listings: usize,
    pub date_range: Option<DateRange>,
}
