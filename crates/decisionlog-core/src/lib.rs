pub mod document;
pub mod error;
pub mod normalize;

pub use document::{Decision, Document, DocumentMeta, Review};
pub use error::{SchemaError, ValidationError};
pub use normalize::{normalize, normalize_bytes, Normalized, Repair};
