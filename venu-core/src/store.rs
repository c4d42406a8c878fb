use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Booking, Event, NewReview, RatingAggregate, Review};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    ConstraintViolation,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CacheError(pub String);

/// Data access consumed by the review engine. Implementations must back
/// `insert_review_if_absent` with a storage-level uniqueness constraint on
/// `(event_id, reviewer_id)`; application-side checks alone are not enough
/// to survive concurrent submissions across replicas.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, StoreError>;

    /// The confirmed booking for `(event_id, traveler_id)`, if any. More
    /// than one confirmed row for the pair is a data-integrity anomaly:
    /// implementations log it and return one of them.
    async fn find_confirmed_booking(
        &self,
        event_id: Uuid,
        traveler_id: Uuid,
    ) -> Result<Option<Booking>, StoreError>;

    async fn find_review(
        &self,
        event_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>, StoreError>;

    /// Atomic insert-if-absent. Returns `StoreError::ConstraintViolation`
    /// when a review for the same `(event_id, reviewer_id)` already exists,
    /// never a partially applied row.
    async fn insert_review_if_absent(&self, review: NewReview) -> Result<Review, StoreError>;

    async fn list_reviews_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<Review>, StoreError>;

    async fn list_reviews_for_event(&self, event_id: Uuid) -> Result<Vec<Review>, StoreError>;
}

/// Cache for organizer rating aggregates. Advisory: callers degrade to a
/// full recomputation when the cache misses or errors.
#[async_trait]
pub trait AggregateCache: Send + Sync {
    async fn get(&self, organizer_id: Uuid) -> Result<Option<RatingAggregate>, CacheError>;

    async fn put(
        &self,
        organizer_id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<(), CacheError>;

    async fn invalidate(&self, organizer_id: Uuid) -> Result<(), CacheError>;
}
