use crate::document::{check_len, check_rating};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NOTES_MAX: usize = 2000;

/// A point-in-time retrospective evaluation of a decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub outcome_rating: u8,
    pub thesis_accuracy: u8,
    pub luck_rating: u8,
    #[serde(default)]
    pub notes: String,
}

/// User-supplied fields for creating or editing a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub outcome_rating: i64,
    pub thesis_accuracy: i64,
    pub luck_rating: i64,
    pub notes: String,
}

impl Review {
    /// Validate a draft and mint a review with a fresh id.
    pub fn create(draft: ReviewDraft) -> Result<Self, ValidationError> {
        validate(&draft)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            outcome_rating: draft.outcome_rating as u8,
            thesis_accuracy: draft.thesis_accuracy as u8,
            luck_rating: draft.luck_rating as u8,
            notes: draft.notes,
        })
    }

    /// Apply an edit. Touches ratings and notes only; `createdAt` is never altered.
    pub fn apply(&mut self, draft: ReviewDraft) -> Result<(), ValidationError> {
        validate(&draft)?;
        self.outcome_rating = draft.outcome_rating as u8;
        self.thesis_accuracy = draft.thesis_accuracy as u8;
        self.luck_rating = draft.luck_rating as u8;
        self.notes = draft.notes;
        Ok(())
    }
}

fn validate(draft: &ReviewDraft) -> Result<(), ValidationError> {
    check_rating("outcomeRating", draft.outcome_rating)?;
    check_rating("thesisAccuracy", draft.thesis_accuracy)?;
    check_rating("luckRating", draft.luck_rating)?;
    check_len("notes", &draft.notes, NOTES_MAX)?;
    Ok(())
}
