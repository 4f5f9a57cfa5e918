//! Wire types exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Response of `POST /search`. A body without a `results` array is invalid;
/// the rows themselves are decoded one by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,
}
