pub mod eligibility;
pub mod models;
pub mod reviews;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use eligibility::{Eligibility, EligibilityEvaluator, IneligibleReason, ReviewPolicy, Verdict};
pub use reviews::ReviewWriter;
pub use store::{AggregateCache, CacheError, ReviewStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("event not found")]
    EventNotFound,
    #[error("event has not ended yet")]
    EventNotEnded,
    #[error("no confirmed booking for this event")]
    NotConfirmedAttendee,
    #[error("a review for this event by this user already exists")]
    AlreadyReviewed,
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i16),
    #[error("comment must be between 10 and 500 characters after trimming, got {0}")]
    InvalidComment(usize),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl ReviewError {
    /// Stable machine-readable code, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::EventNotFound => "EVENT_NOT_FOUND",
            ReviewError::EventNotEnded => "EVENT_NOT_ENDED",
            ReviewError::NotConfirmedAttendee => "NOT_CONFIRMED_ATTENDEE",
            ReviewError::AlreadyReviewed => "ALREADY_REVIEWED",
            ReviewError::InvalidRating(_) => "INVALID_RATING",
            ReviewError::InvalidComment(_) => "INVALID_COMMENT",
            ReviewError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl From<StoreError> for ReviewError {
    fn from(err: StoreError) -> Self {
        match err {
            // The unique index on (event_id, reviewer_id) is the only
            // constraint this core defines, so a violation always means
            // a review already exists.
            StoreError::ConstraintViolation => ReviewError::AlreadyReviewed,
            StoreError::Unavailable(msg) => ReviewError::Unavailable(msg),
        }
    }
}

pub type ReviewResult<T> = Result<T, ReviewError>;
