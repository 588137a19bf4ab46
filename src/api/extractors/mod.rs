//! Custom request extractors.

mod headers;
mod validated_json;

pub use headers::{CartSession, IdempotencyKey};
pub use validated_json::ValidatedJson;
