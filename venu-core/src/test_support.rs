//! In-memory `ReviewStore`/`AggregateCache` used by the unit tests. The
//! insert path holds the reviews lock across the check and the write, so it
//! honors the same atomicity contract as the Postgres unique index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Event, NewReview, RatingAggregate, Review};
use crate::store::{AggregateCache, CacheError, ReviewStore, StoreError};

#[derive(Default)]
pub struct MemStore {
    events: Mutex<HashMap<Uuid, Event>>,
    bookings: Mutex<Vec<Booking>>,
    reviews: Mutex<HashMap<(Uuid, Uuid), Review>>,
}

impl MemStore {
    pub fn add_event(&self, organizer_id: Uuid, end_time: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.events.lock().unwrap().insert(
            id,
            Event {
                id,
                organizer_id,
                end_time,
            },
        );
        id
    }

    pub fn add_booking(&self, event_id: Uuid, traveler_id: Uuid, status: BookingStatus) {
        self.bookings.lock().unwrap().push(Booking {
            id: Uuid::new_v4(),
            event_id,
            traveler_id,
            status,
        });
    }

    pub fn add_review(&self, event_id: Uuid, reviewer_id: Uuid, rating: i16, comment: &str) {
        let review = Review {
            id: Uuid::new_v4(),
            event_id,
            reviewer_id,
            rating,
            comment: comment.to_string(),
            created_at: Utc::now(),
        };
        self.reviews
            .lock()
            .unwrap()
            .insert((event_id, reviewer_id), review);
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewStore for MemStore {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.events.lock().unwrap().get(&event_id).cloned())
    }

    async fn find_confirmed_booking(
        &self,
        event_id: Uuid,
        traveler_id: Uuid,
    ) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| {
                b.event_id == event_id
                    && b.traveler_id == traveler_id
                    && b.status == BookingStatus::Confirmed
            })
            .cloned())
    }

    async fn find_review(
        &self,
        event_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .get(&(event_id, reviewer_id))
            .cloned())
    }

    async fn insert_review_if_absent(&self, new: NewReview) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.lock().unwrap();
        if reviews.contains_key(&(new.event_id, new.reviewer_id)) {
            return Err(StoreError::ConstraintViolation);
        }
        let review = Review {
            id: Uuid::new_v4(),
            event_id: new.event_id,
            reviewer_id: new.reviewer_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        reviews.insert((new.event_id, new.reviewer_id), review.clone());
        Ok(review)
    }

    async fn list_reviews_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<Review>, StoreError> {
        let event_ids: Vec<Uuid> = self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .map(|e| e.id)
            .collect();
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .values()
            .filter(|r| event_ids.contains(&r.event_id))
            .cloned()
            .collect())
    }

    async fn list_reviews_for_event(&self, event_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

/// Wraps `MemStore` and simulates a store outage: reads and/or the insert
/// can be switched to fail with `StoreError::Unavailable`.
pub struct OutageStore {
    pub inner: MemStore,
    fail_reads: AtomicBool,
    fail_inserts: AtomicBool,
}

impl OutageStore {
    pub fn new(inner: MemStore) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    fn outage() -> StoreError {
        StoreError::Unavailable("connection refused".to_string())
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(Self::outage())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReviewStore for OutageStore {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, StoreError> {
        self.check_reads()?;
        self.inner.get_event(event_id).await
    }

    async fn find_confirmed_booking(
        &self,
        event_id: Uuid,
        traveler_id: Uuid,
    ) -> Result<Option<Booking>, StoreError> {
        self.check_reads()?;
        self.inner.find_confirmed_booking(event_id, traveler_id).await
    }

    async fn find_review(
        &self,
        event_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        self.check_reads()?;
        self.inner.find_review(event_id, reviewer_id).await
    }

    async fn insert_review_if_absent(&self, new: NewReview) -> Result<Review, StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.insert_review_if_absent(new).await
    }

    async fn list_reviews_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<Review>, StoreError> {
        self.check_reads()?;
        self.inner.list_reviews_for_organizer(organizer_id).await
    }

    async fn list_reviews_for_event(&self, event_id: Uuid) -> Result<Vec<Review>, StoreError> {
        self.check_reads()?;
        self.inner.list_reviews_for_event(event_id).await
    }
}

#[derive(Default)]
pub struct MemCache {
    entries: Mutex<HashMap<Uuid, RatingAggregate>>,
    invalidated: Mutex<Vec<Uuid>>,
}

impl MemCache {
    pub fn seed(&self, organizer_id: Uuid, aggregate: RatingAggregate) {
        self.entries.lock().unwrap().insert(organizer_id, aggregate);
    }

    pub fn get_entry(&self, organizer_id: Uuid) -> Option<RatingAggregate> {
        self.entries.lock().unwrap().get(&organizer_id).copied()
    }

    pub fn invalidations(&self) -> Vec<Uuid> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl AggregateCache for MemCache {
    async fn get(&self, organizer_id: Uuid) -> Result<Option<RatingAggregate>, CacheError> {
        Ok(self.entries.lock().unwrap().get(&organizer_id).copied())
    }

    async fn put(
        &self,
        organizer_id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<(), CacheError> {
        self.entries.lock().unwrap().insert(organizer_id, aggregate);
        Ok(())
    }

    async fn invalidate(&self, organizer_id: Uuid) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(&organizer_id);
        self.invalidated.lock().unwrap().push(organizer_id);
        Ok(())
    }
}
