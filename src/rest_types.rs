use serde::Deserialize;
use serde_json::{Map, Value};

/// Body returned by the training endpoint on 200/201. The server promises
/// a `document_id`; everything beyond the known fields is kept verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainDocumentResponse {
    pub document_id: Option<String>,
    pub task_id: Option<String>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured error body. Non-2xx responses are not guaranteed to be JSON,
/// so parsing this is best-effort.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
