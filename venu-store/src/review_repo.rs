use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use venu_core::models::{Booking, BookingStatus, Event, NewReview, Review};
use venu_core::store::{ReviewStore, StoreError};

/// Postgres-backed `ReviewStore`. The `(event_id, reviewer_id)` uniqueness
/// invariant lives in the `reviews_event_reviewer_key` constraint; the
/// insert uses `ON CONFLICT DO NOTHING RETURNING` so a lost conflict comes
/// back as an absent row, never a partial write.
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    organizer_id: Uuid,
    end_time: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    event_id: Uuid,
    traveler_id: Uuid,
    status: String,
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    event_id: Uuid,
    reviewer_id: Uuid,
    rating: i16,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            event_id: row.event_id,
            reviewer_id: row.reviewer_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::ConstraintViolation;
        }
    }
    StoreError::Unavailable(err.to_string())
}

fn booking_from(row: BookingRow) -> Result<Booking, StoreError> {
    let status = BookingStatus::parse(&row.status)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown booking status: {}", row.status)))?;
    Ok(Booking {
        id: row.id,
        event_id: row.event_id,
        traveler_id: row.traveler_id,
        status,
    })
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, organizer_id, end_time FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|r| Event {
            id: r.id,
            organizer_id: r.organizer_id,
            end_time: r.end_time,
        }))
    }

    async fn find_confirmed_booking(
        &self,
        event_id: Uuid,
        traveler_id: Uuid,
    ) -> Result<Option<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, event_id, traveler_id, status
            FROM bookings
            WHERE event_id = $1 AND traveler_id = $2 AND status = $3
            "#,
        )
        .bind(event_id)
        .bind(traveler_id)
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        if rows.len() > 1 {
            // Exactly one confirmed booking per pair is expected; presence
            // still satisfies the eligibility check.
            warn!(
                "data integrity: {} confirmed bookings for event {} traveler {}",
                rows.len(),
                event_id,
                traveler_id
            );
        }

        rows.into_iter().next().map(booking_from).transpose()
    }

    async fn find_review(
        &self,
        event_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, event_id, reviewer_id, rating, comment, created_at
            FROM reviews
            WHERE event_id = $1 AND reviewer_id = $2
            "#,
        )
        .bind(event_id)
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Review::from))
    }

    async fn insert_review_if_absent(&self, review: NewReview) -> Result<Review, StoreError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (id, event_id, reviewer_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (event_id, reviewer_id) DO NOTHING
            RETURNING id, event_id, reviewer_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(review.event_id)
        .bind(review.reviewer_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        // No returned row means the conflict target already had a row.
        row.map(Review::from).ok_or(StoreError::ConstraintViolation)
    }

    async fn list_reviews_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<Review>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT r.id, r.event_id, r.reviewer_id, r.rating, r.comment, r.created_at
            FROM reviews r
            JOIN events e ON e.id = r.event_id
            WHERE e.organizer_id = $1
            "#,
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn list_reviews_for_event(&self, event_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, event_id, reviewer_id, rating, comment, created_at
            FROM reviews
            WHERE event_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }
}
