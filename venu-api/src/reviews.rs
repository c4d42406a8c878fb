use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use venu_core::eligibility::Eligibility;
use venu_core::models::{RatingAggregate, Review};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reviews", post(submit_review))
        .route("/v1/events/{event_id}/reviews", get(list_event_reviews))
        .route(
            "/v1/events/{event_id}/reviews/eligibility",
            get(review_eligibility),
        )
        .route("/v1/organizers/{organizer_id}/rating", get(organizer_rating))
}

#[derive(Debug, Deserialize)]
struct SubmitReviewRequest {
    event_id: Uuid,
    reviewer_id: Uuid,
    rating: i16,
    comment: String,
}

#[derive(Debug, Deserialize)]
struct EligibilityParams {
    user_id: Uuid,
}

async fn submit_review(
    State(state): State<AppState>,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = state
        .reviews
        .submit(req.event_id, req.reviewer_id, req.rating, &req.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn review_eligibility(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(params): Query<EligibilityParams>,
) -> Result<Json<Eligibility>, AppError> {
    let eligibility = state.reviews.can_review(event_id, params.user_id).await?;
    Ok(Json(eligibility))
}

async fn list_event_reviews(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = state.reviews.list_event_reviews(event_id).await?;
    Ok(Json(reviews))
}

async fn organizer_rating(
    State(state): State<AppState>,
    Path(organizer_id): Path<Uuid>,
) -> Result<Json<RatingAggregate>, AppError> {
    let aggregate = state.reviews.organizer_rating(organizer_id).await?;
    Ok(Json(aggregate))
}
