use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Event;
use crate::store::ReviewStore;
use crate::ReviewError;

/// Deployment policy for review eligibility.
///
/// `require_event_ended` is the production rule: a traveler may only review
/// an event whose `end_time` has passed. Staging and test environments turn
/// it off to exercise the review flow against future events.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPolicy {
    pub require_event_ended: bool,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            require_event_ended: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IneligibleReason {
    EventNotFound,
    EventNotEnded,
    NotConfirmedAttendee,
    AlreadyReviewed,
}

impl From<IneligibleReason> for ReviewError {
    fn from(reason: IneligibleReason) -> Self {
        match reason {
            IneligibleReason::EventNotFound => ReviewError::EventNotFound,
            IneligibleReason::EventNotEnded => ReviewError::EventNotEnded,
            IneligibleReason::NotConfirmedAttendee => ReviewError::NotConfirmedAttendee,
            IneligibleReason::AlreadyReviewed => ReviewError::AlreadyReviewed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Eligibility {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IneligibleReason>,
}

impl Eligibility {
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn ineligible(reason: IneligibleReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug)]
pub enum Verdict {
    Eligible(Event),
    Ineligible(IneligibleReason),
}

/// Decides whether a user may review an event. Read-only and safe to call
/// repeatedly; the verdict is advisory, since a competing submission can
/// land between the check and the insert. The writer closes that window
/// with the storage-level uniqueness constraint.
pub struct EligibilityEvaluator {
    store: Arc<dyn ReviewStore>,
    policy: ReviewPolicy,
}

impl EligibilityEvaluator {
    pub fn new(store: Arc<dyn ReviewStore>, policy: ReviewPolicy) -> Self {
        Self { store, policy }
    }

    /// Runs the three checks in order: event exists (and has ended, when the
    /// policy requires it), attendance confirmed, no prior review. The first
    /// failing check determines the reported reason.
    pub async fn evaluate(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Verdict, ReviewError> {
        let event = match self.store.get_event(event_id).await? {
            Some(event) => event,
            None => return Ok(Verdict::Ineligible(IneligibleReason::EventNotFound)),
        };

        if self.policy.require_event_ended && event.end_time > Utc::now() {
            return Ok(Verdict::Ineligible(IneligibleReason::EventNotEnded));
        }

        if self
            .store
            .find_confirmed_booking(event_id, user_id)
            .await?
            .is_none()
        {
            return Ok(Verdict::Ineligible(IneligibleReason::NotConfirmedAttendee));
        }

        if self.store.find_review(event_id, user_id).await?.is_some() {
            return Ok(Verdict::Ineligible(IneligibleReason::AlreadyReviewed));
        }

        Ok(Verdict::Eligible(event))
    }

    pub async fn can_review(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Eligibility, ReviewError> {
        match self.evaluate(event_id, user_id).await? {
            Verdict::Eligible(_) => Ok(Eligibility::eligible()),
            Verdict::Ineligible(reason) => Ok(Eligibility::ineligible(reason)),
        }
    }
}
