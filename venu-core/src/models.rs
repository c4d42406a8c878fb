use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable happening. Owned by the booking subsystem; this core only
/// reads `organizer_id` and `end_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub traveler_id: Uuid,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Waitlisted,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Waitlisted => "WAITLISTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            "WAITLISTED" => Some(BookingStatus::Waitlisted),
            _ => None,
        }
    }
}

/// A traveler's review of an event. Create-once, read-many: there is no
/// update or delete path, and `(event_id, reviewer_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub event_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub event_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i16,
    pub comment: String,
}

/// Derived mean rating and review count for an organizer. Pure function
/// of the committed Review set; `{0.0, 0}` when there are no reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub avg_rating: f64,
    pub total_reviews: i64,
}

impl RatingAggregate {
    pub fn empty() -> Self {
        Self {
            avg_rating: 0.0,
            total_reviews: 0,
        }
    }

    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i16>,
    {
        let mut sum: i64 = 0;
        let mut count: i64 = 0;
        for rating in ratings {
            sum += i64::from(rating);
            count += 1;
        }
        if count == 0 {
            return Self::empty();
        }
        // Mean rounded half-up to one decimal, in integer arithmetic:
        // floor((10 * sum / count) + 0.5) == (20 * sum + count) / (2 * count).
        let tenths = (20 * sum + count) / (2 * count);
        Self {
            avg_rating: tenths as f64 / 10.0,
            total_reviews: count,
        }
    }
}
