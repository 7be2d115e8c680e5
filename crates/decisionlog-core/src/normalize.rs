use crate::document::{Decision, Document, DocumentMeta, Review, APP_NAME, SCHEMA_VERSION};
use crate::error::SchemaError;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::fmt;

/// Title substituted for decisions loaded without one.
pub const PLACEHOLDER_TITLE: &str = "Untitled decision";

/// A repair performed while normalizing a loaded document.
///
/// Repairs are diagnostics, never errors; callers log or count them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    SynthesizedMeta,
    ReplacedDecisions,
    PlaceholderTitle { index: usize },
    RepairedDate { index: usize },
    DefaultedRating { index: usize, field: &'static str },
    ClampedRating { index: usize, field: &'static str },
    ReplacedTags { index: usize },
    ReplacedReviews { index: usize },
    DroppedReview { index: usize },
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SynthesizedMeta => write!(f, "synthesized missing meta"),
            Self::ReplacedDecisions => write!(f, "replaced missing decisions with empty list"),
            Self::PlaceholderTitle { index } => {
                write!(f, "decision {index}: substituted placeholder title")
            }
            Self::RepairedDate { index } => write!(f, "decision {index}: repaired date"),
            Self::DefaultedRating { index, field } => {
                write!(f, "decision {index}: defaulted {field} to 0")
            }
            Self::ClampedRating { index, field } => {
                write!(f, "decision {index}: clamped {field} into 0-5")
            }
            Self::ReplacedTags { index } => {
                write!(f, "decision {index}: replaced malformed tags")
            }
            Self::ReplacedReviews { index } => {
                write!(f, "decision {index}: replaced missing reviews with empty list")
            }
            Self::DroppedReview { index } => {
                write!(f, "decision {index}: dropped unaddressable review")
            }
        }
    }
}

/// Result of normalizing: the repaired document plus what was repaired.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub document: Document,
    pub repairs: Vec<Repair>,
}

/// Parse raw bytes as JSON and normalize into a canonical [`Document`].
///
/// Unparseable bytes are a [`SchemaError`]; only structurally valid but
/// incomplete JSON gets repaired.
pub fn normalize_bytes(bytes: &[u8]) -> Result<Normalized, SchemaError> {
    let value: Value = serde_json::from_slice(bytes)?;
    normalize(value)
}

/// Repair a loosely-structured parsed object into a canonical [`Document`].
///
/// Missing or malformed containers are repaired silently. A decision
/// without an id is fatal: identity cannot be synthesized without risking
/// collision with data the user already references.
pub fn normalize(value: Value) -> Result<Normalized, SchemaError> {
    let mut root = match value {
        Value::Object(map) => map,
        _ => return Err(SchemaError::RootNotObject),
    };
    let mut repairs = Vec::new();

    let meta = match root.remove("meta") {
        Some(Value::Object(map)) => meta_from(map),
        _ => {
            repairs.push(Repair::SynthesizedMeta);
            default_meta()
        }
    };

    let raw_decisions = match root.remove("decisions") {
        Some(Value::Array(items)) => items,
        _ => {
            repairs.push(Repair::ReplacedDecisions);
            Vec::new()
        }
    };

    let mut decisions = Vec::with_capacity(raw_decisions.len());
    for (index, item) in raw_decisions.into_iter().enumerate() {
        decisions.push(decision_from(index, item, &mut repairs)?);
    }

    Ok(Normalized {
        document: Document { meta, decisions },
        repairs,
    })
}

fn default_meta() -> DocumentMeta {
    let now = Utc::now();
    DocumentMeta {
        app: APP_NAME.into(),
        version: SCHEMA_VERSION.into(),
        username: String::new(),
        created_at: now,
        updated_at: now,
    }
}

fn meta_from(mut map: serde_json::Map<String, Value>) -> DocumentMeta {
    DocumentMeta {
        app: string_or(map.remove("app"), APP_NAME),
        version: string_or(map.remove("version"), SCHEMA_VERSION),
        username: string_or(map.remove("username"), ""),
        created_at: datetime_or_now(map.remove("createdAt")),
        updated_at: datetime_or_now(map.remove("updatedAt")),
    }
}

fn decision_from(
    index: usize,
    value: Value,
    repairs: &mut Vec<Repair>,
) -> Result<Decision, SchemaError> {
    let mut map = match value {
        Value::Object(map) => map,
        _ => return Err(SchemaError::DecisionMissingId { index }),
    };

    let id = match map.remove("id") {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return Err(SchemaError::DecisionMissingId { index }),
    };

    let title = match map.remove("title") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => {
            repairs.push(Repair::PlaceholderTitle { index });
            PLACEHOLDER_TITLE.to_string()
        }
    };

    let created_at = datetime_or_now(map.remove("createdAt"));
    let updated_at = datetime_or_now(map.remove("updatedAt"));

    let date = match map.remove("date").as_ref().and_then(date_from) {
        Some(date) => date,
        None => {
            repairs.push(Repair::RepairedDate { index });
            created_at.date_naive()
        }
    };

    let importance = rating_from(map.remove("importance"), index, "importance", repairs);

    let tags = match map.remove("tags") {
        Some(Value::Array(items)) => {
            let total = items.len();
            let tags: Vec<String> = items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            if tags.len() != total {
                repairs.push(Repair::ReplacedTags { index });
            }
            tags
        }
        _ => {
            repairs.push(Repair::ReplacedTags { index });
            Vec::new()
        }
    };

    let reviews = match map.remove("reviews") {
        Some(Value::Array(items)) => {
            let mut reviews = Vec::with_capacity(items.len());
            for item in items {
                match review_from(item, index, repairs) {
                    Some(review) => reviews.push(review),
                    None => repairs.push(Repair::DroppedReview { index }),
                }
            }
            reviews
        }
        _ => {
            repairs.push(Repair::ReplacedReviews { index });
            Vec::new()
        }
    };

    Ok(Decision {
        id,
        title,
        final_decision: string_or(map.remove("finalDecision"), ""),
        description: string_or(map.remove("description"), ""),
        date,
        importance,
        tags,
        created_at,
        updated_at,
        reviews,
    })
}

fn review_from(value: Value, index: usize, repairs: &mut Vec<Repair>) -> Option<Review> {
    let mut map = match value {
        Value::Object(map) => map,
        _ => return None,
    };
    let id = match map.remove("id") {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return None,
    };
    Some(Review {
        id,
        created_at: datetime_or_now(map.remove("createdAt")),
        outcome_rating: rating_from(map.remove("outcomeRating"), index, "outcomeRating", repairs),
        thesis_accuracy: rating_from(map.remove("thesisAccuracy"), index, "thesisAccuracy", repairs),
        luck_rating: rating_from(map.remove("luckRating"), index, "luckRating", repairs),
        notes: string_or(map.remove("notes"), ""),
    })
}

/// Integer in [0,5] passes through; other integers are clamped; anything
/// else defaults to 0. Both fallbacks count as repairs.
fn rating_from(
    value: Option<Value>,
    index: usize,
    field: &'static str,
    repairs: &mut Vec<Repair>,
) -> u8 {
    match value.as_ref().and_then(Value::as_i64) {
        Some(raw) if (0..=5).contains(&raw) => raw as u8,
        Some(raw) => {
            repairs.push(Repair::ClampedRating { index, field });
            raw.clamp(0, 5) as u8
        }
        None => {
            repairs.push(Repair::DefaultedRating { index, field });
            0
        }
    }
}

fn string_or(value: Option<Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s,
        _ => default.to_string(),
    }
}

fn datetime_or_now(value: Option<Value>) -> DateTime<Utc> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

fn date_from(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DecisionDraft, ReviewDraft};
    use serde_json::json;

    fn canonical_document() -> Document {
        let mut doc = Document::new("jdoe");
        let mut decision = Decision::create(DecisionDraft {
            title: "Accept offer".into(),
            description: "Relocation involved".into(),
            final_decision: "Accepted".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            importance: 4,
            tags: vec!["career".into(), "money".into()],
        })
        .unwrap();
        decision.add_review(
            Review::create(ReviewDraft {
                outcome_rating: 3,
                thesis_accuracy: 2,
                luck_rating: 1,
                notes: "Went fine".into(),
            })
            .unwrap(),
        );
        doc.add_decision(decision);
        doc
    }

    #[test]
    fn canonical_round_trip_is_stable() {
        let doc = canonical_document();
        let bytes = doc.to_json_bytes().unwrap();
        let normalized = normalize_bytes(&bytes).unwrap();
        assert_eq!(normalized.document, doc);
        assert!(normalized.repairs.is_empty(), "{:?}", normalized.repairs);
    }

    #[test]
    fn missing_meta_is_synthesized() {
        let normalized = normalize(json!({ "decisions": [] })).unwrap();
        assert_eq!(normalized.document.meta.app, APP_NAME);
        assert_eq!(normalized.document.meta.version, SCHEMA_VERSION);
        assert_eq!(normalized.document.meta.username, "");
        assert_eq!(normalized.repairs, vec![Repair::SynthesizedMeta]);
    }

    #[test]
    fn missing_decisions_become_empty_list() {
        let normalized = normalize(json!({ "meta": {} })).unwrap();
        assert!(normalized.document.decisions.is_empty());
        assert!(normalized.repairs.contains(&Repair::ReplacedDecisions));
    }

    #[test]
    fn decisions_as_object_replaced() {
        let normalized = normalize(json!({ "decisions": { "oops": true } })).unwrap();
        assert!(normalized.document.decisions.is_empty());
        assert!(normalized.repairs.contains(&Repair::ReplacedDecisions));
    }

    #[test]
    fn non_object_root_is_fatal() {
        assert!(matches!(
            normalize(json!([1, 2, 3])).unwrap_err(),
            SchemaError::RootNotObject
        ));
        assert!(matches!(
            normalize(json!("nope")).unwrap_err(),
            SchemaError::RootNotObject
        ));
    }

    #[test]
    fn unparseable_bytes_are_fatal() {
        assert!(matches!(
            normalize_bytes(b"{not json").unwrap_err(),
            SchemaError::Parse(_)
        ));
    }

    #[test]
    fn decision_missing_id_fails_fast_with_index() {
        let value = json!({
            "decisions": [
                { "id": "a", "title": "Fine" },
                { "title": "No id" },
                { "id": "c", "title": "Never reached" },
            ]
        });
        match normalize(value).unwrap_err() {
            SchemaError::DecisionMissingId { index } => assert_eq!(index, 1),
            other => panic!("expected DecisionMissingId, got {other}"),
        }
    }

    #[test]
    fn non_object_decision_entry_is_fatal() {
        let err = normalize(json!({ "decisions": ["just a string"] })).unwrap_err();
        assert!(matches!(err, SchemaError::DecisionMissingId { index: 0 }));
    }

    #[test]
    fn missing_title_gets_placeholder() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{ "id": "d1" }]
        }))
        .unwrap();
        assert_eq!(normalized.document.decisions[0].title, PLACEHOLDER_TITLE);
        assert!(normalized
            .repairs
            .contains(&Repair::PlaceholderTitle { index: 0 }));
    }

    #[test]
    fn missing_reviews_become_empty_list() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{ "id": "d1", "title": "T" }]
        }))
        .unwrap();
        let decision = &normalized.document.decisions[0];
        assert!(decision.reviews.is_empty());
        assert!(normalized
            .repairs
            .contains(&Repair::ReplacedReviews { index: 0 }));
    }

    #[test]
    fn non_integer_importance_defaults_to_zero() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{ "id": "d1", "title": "T", "importance": "high" }]
        }))
        .unwrap();
        assert_eq!(normalized.document.decisions[0].importance, 0);
        assert!(normalized.repairs.contains(&Repair::DefaultedRating {
            index: 0,
            field: "importance"
        }));
    }

    #[test]
    fn fractional_importance_defaults_to_zero() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{ "id": "d1", "title": "T", "importance": 3.5 }]
        }))
        .unwrap();
        assert_eq!(normalized.document.decisions[0].importance, 0);
    }

    #[test]
    fn out_of_range_importance_is_clamped() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [
                { "id": "d1", "title": "T", "importance": 9 },
                { "id": "d2", "title": "U", "importance": -3 },
            ]
        }))
        .unwrap();
        assert_eq!(normalized.document.decisions[0].importance, 5);
        assert_eq!(normalized.document.decisions[1].importance, 0);
        assert!(normalized.repairs.contains(&Repair::ClampedRating {
            index: 0,
            field: "importance"
        }));
    }

    #[test]
    fn malformed_tags_are_repaired() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [
                { "id": "d1", "title": "T", "tags": "career" },
                { "id": "d2", "title": "U", "tags": ["a", 7, "b"] },
            ]
        }))
        .unwrap();
        assert!(normalized.document.decisions[0].tags.is_empty());
        assert_eq!(normalized.document.decisions[1].tags, vec!["a", "b"]);
        assert!(normalized.repairs.contains(&Repair::ReplacedTags { index: 0 }));
        assert!(normalized.repairs.contains(&Repair::ReplacedTags { index: 1 }));
    }

    #[test]
    fn duplicate_tags_are_tolerated() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{ "id": "d1", "title": "T", "tags": ["a", "a"] }]
        }))
        .unwrap();
        assert_eq!(normalized.document.decisions[0].tags, vec!["a", "a"]);
    }

    #[test]
    fn review_without_id_is_dropped() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{
                "id": "d1",
                "title": "T",
                "reviews": [
                    { "outcomeRating": 3 },
                    { "id": "r1", "outcomeRating": 3, "thesisAccuracy": 2, "luckRating": 1 },
                ]
            }]
        }))
        .unwrap();
        let decision = &normalized.document.decisions[0];
        assert_eq!(decision.reviews.len(), 1);
        assert_eq!(decision.reviews[0].id, "r1");
        assert!(normalized
            .repairs
            .contains(&Repair::DroppedReview { index: 0 }));
    }

    #[test]
    fn review_ratings_repaired_like_importance() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{
                "id": "d1",
                "title": "T",
                "reviews": [{
                    "id": "r1",
                    "outcomeRating": 12,
                    "thesisAccuracy": "bad",
                    "luckRating": 2,
                }]
            }]
        }))
        .unwrap();
        let review = &normalized.document.decisions[0].reviews[0];
        assert_eq!(review.outcome_rating, 5);
        assert_eq!(review.thesis_accuracy, 0);
        assert_eq!(review.luck_rating, 2);
    }

    #[test]
    fn missing_date_falls_back_to_created_at() {
        let normalized = normalize(json!({
            "meta": {},
            "decisions": [{
                "id": "d1",
                "title": "T",
                "createdAt": "2023-06-15T10:00:00Z",
            }]
        }))
        .unwrap();
        let decision = &normalized.document.decisions[0];
        assert_eq!(
            decision.date,
            NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()
        );
        assert!(normalized.repairs.contains(&Repair::RepairedDate { index: 0 }));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let normalized = normalize(json!({
            "meta": { "app": "decisionlog", "futureFlag": true },
            "decisions": [{ "id": "d1", "title": "T", "legacy": [1, 2] }],
            "trailer": "ignored",
        }))
        .unwrap();
        assert_eq!(normalized.document.decisions[0].id, "d1");
    }
}
