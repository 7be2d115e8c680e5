use crate::document::review::Review;
use crate::document::{check_len, check_rating};
use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 5000;
pub const FINAL_DECISION_MAX: usize = 500;

/// A single recorded choice, owning its reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub final_decision: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub importance: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// User-supplied fields for creating or editing a decision.
///
/// `importance` is widened to i64 so out-of-range input is rejected by
/// validation instead of silently truncated at parse time.
#[derive(Debug, Clone, Default)]
pub struct DecisionDraft {
    pub title: String,
    pub description: String,
    pub final_decision: String,
    pub date: NaiveDate,
    pub importance: i64,
    pub tags: Vec<String>,
}

impl Decision {
    /// Validate a draft and mint a decision with a fresh id.
    pub fn create(draft: DecisionDraft) -> Result<Self, ValidationError> {
        validate(&draft)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            final_decision: draft.final_decision,
            description: draft.description,
            date: draft.date,
            importance: draft.importance as u8,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
            reviews: Vec::new(),
        })
    }

    /// Apply an edit. Keeps `id`, `createdAt` and `reviews`; bumps `updatedAt`.
    pub fn apply(&mut self, draft: DecisionDraft) -> Result<(), ValidationError> {
        validate(&draft)?;
        self.title = draft.title;
        self.final_decision = draft.final_decision;
        self.description = draft.description;
        self.date = draft.date;
        self.importance = draft.importance as u8;
        self.tags = draft.tags;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.updated_at = Utc::now();
    }

    /// Remove a review by id. Returns true if one was removed.
    pub fn remove_review(&mut self, review_id: &str) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| r.id != review_id);
        let removed = self.reviews.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn review_mut(&mut self, review_id: &str) -> Option<&mut Review> {
        self.reviews.iter_mut().find(|r| r.id == review_id)
    }
}

fn validate(draft: &DecisionDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    check_len("title", &draft.title, TITLE_MAX)?;
    check_len("description", &draft.description, DESCRIPTION_MAX)?;
    check_len("finalDecision", &draft.final_decision, FINAL_DECISION_MAX)?;
    check_rating("importance", draft.importance)?;
    Ok(())
}
