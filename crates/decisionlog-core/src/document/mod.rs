pub mod decision;
pub mod review;

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use decision::{Decision, DecisionDraft};
pub use review::{Review, ReviewDraft};

/// Application identifier written into `meta.app`.
pub const APP_NAME: &str = "decisionlog";
/// Schema version written into `meta.version`.
pub const SCHEMA_VERSION: &str = "1";

/// Ratings and importance live on a 0-5 scale.
pub const RATING_MAX: i64 = 5;

/// Bookkeeping block at the top of every persisted document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub app: String,
    pub version: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The root persisted object: one file per user, all decisions inside.
///
/// Mutation happens in memory; durability only on an explicit save that
/// serializes the whole document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub meta: DocumentMeta,
    pub decisions: Vec<Decision>,
}

impl Document {
    /// Create an empty document owned by `username`.
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            meta: DocumentMeta {
                app: APP_NAME.into(),
                version: SCHEMA_VERSION.into(),
                username: username.into(),
                created_at: now,
                updated_at: now,
            },
            decisions: Vec::new(),
        }
    }

    /// Insert a decision at the front (newest-first convention).
    pub fn add_decision(&mut self, decision: Decision) {
        self.decisions.insert(0, decision);
        self.touch();
    }

    /// Remove a decision and its reviews. Returns true if one was removed.
    pub fn remove_decision(&mut self, id: &str) -> bool {
        let before = self.decisions.len();
        self.decisions.retain(|d| d.id != id);
        let removed = self.decisions.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn decision(&self, id: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.id == id)
    }

    pub fn decision_mut(&mut self, id: &str) -> Option<&mut Decision> {
        self.decisions.iter_mut().find(|d| d.id == id)
    }

    /// Bump `meta.updatedAt` to now.
    pub fn touch(&mut self) {
        self.meta.updated_at = Utc::now();
    }

    /// Serialize to the persisted wire format (pretty-printed JSON).
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

pub(crate) fn check_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(())
}

pub(crate) fn check_rating(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if !(0..=RATING_MAX).contains(&value) {
        return Err(ValidationError::RatingOutOfRange { field, value });
    }
    Ok(())
}
