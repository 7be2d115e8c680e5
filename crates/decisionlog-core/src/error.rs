use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("root must be an object")]
    RootNotObject,

    #[error("decision missing id (index {index})")]
    DecisionMissingId { index: usize },

    #[error("invalid json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("{field} exceeds {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("{field} must be an integer between 0 and 5 (got {value})")]
    RatingOutOfRange { field: &'static str, value: i64 },
}
