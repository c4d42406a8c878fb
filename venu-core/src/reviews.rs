use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::eligibility::{Eligibility, EligibilityEvaluator, ReviewPolicy, Verdict};
use crate::models::{NewReview, RatingAggregate, Review};
use crate::store::{AggregateCache, ReviewStore};
use crate::ReviewError;

pub const MIN_COMMENT_CHARS: usize = 10;
pub const MAX_COMMENT_CHARS: usize = 500;

/// Front door of the review engine: validates input, re-checks eligibility,
/// performs the atomic insert and keeps the organizer aggregate cache fresh.
pub struct ReviewWriter {
    store: Arc<dyn ReviewStore>,
    cache: Option<Arc<dyn AggregateCache>>,
    evaluator: EligibilityEvaluator,
}

impl ReviewWriter {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        cache: Option<Arc<dyn AggregateCache>>,
        policy: ReviewPolicy,
    ) -> Self {
        let evaluator = EligibilityEvaluator::new(store.clone(), policy);
        Self {
            store,
            cache,
            evaluator,
        }
    }

    pub async fn can_review(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Eligibility, ReviewError> {
        self.evaluator.can_review(event_id, user_id).await
    }

    /// Creates a review for `(event_id, reviewer_id)`.
    ///
    /// The eligibility pre-check is a UX optimization; the uniqueness
    /// constraint enforced by the store's insert-if-absent is the actual
    /// guard against concurrent duplicate submissions, and its violation is
    /// always reported as `AlreadyReviewed`. Retrying after a lost response
    /// is safe for the same reason.
    pub async fn submit(
        &self,
        event_id: Uuid,
        reviewer_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, ReviewError> {
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::InvalidRating(rating));
        }
        let comment = comment.trim();
        let comment_chars = comment.chars().count();
        if !(MIN_COMMENT_CHARS..=MAX_COMMENT_CHARS).contains(&comment_chars) {
            return Err(ReviewError::InvalidComment(comment_chars));
        }

        let event = match self.evaluator.evaluate(event_id, reviewer_id).await? {
            Verdict::Eligible(event) => event,
            Verdict::Ineligible(reason) => return Err(reason.into()),
        };

        let review = self
            .store
            .insert_review_if_absent(NewReview {
                event_id,
                reviewer_id,
                rating,
                comment: comment.to_string(),
            })
            .await?;

        // Invalidate only after the insert is confirmed committed.
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate(event.organizer_id).await {
                warn!(
                    "failed to invalidate rating cache for organizer {}: {}",
                    event.organizer_id, e
                );
            }
        }

        info!(
            "review {} created for event {} by reviewer {}",
            review.id, event_id, reviewer_id
        );
        Ok(review)
    }

    /// Mean rating and review count for an organizer, cache-aside. Cache
    /// faults degrade to a full recomputation from the committed review set.
    pub async fn organizer_rating(
        &self,
        organizer_id: Uuid,
    ) -> Result<RatingAggregate, ReviewError> {
        if let Some(cache) = &self.cache {
            match cache.get(organizer_id).await {
                Ok(Some(aggregate)) => return Ok(aggregate),
                Ok(None) => {}
                Err(e) => warn!("rating cache read failed for organizer {}: {}", organizer_id, e),
            }
        }

        let reviews = self.store.list_reviews_for_organizer(organizer_id).await?;
        let aggregate = RatingAggregate::from_ratings(reviews.iter().map(|r| r.rating));

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(organizer_id, aggregate).await {
                warn!("rating cache write failed for organizer {}: {}", organizer_id, e);
            }
        }
        Ok(aggregate)
    }

    pub async fn list_event_reviews(&self, event_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        Ok(self.store.list_reviews_for_event(event_id).await?)
    }
}
