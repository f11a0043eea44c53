use scout_api::response::ErrorResponse;
use scout_api::status::StatusCode;

use crate::proto::http_like::Response;

pub fn json_response(code: StatusCode, body: Vec<u8>) -> Response {
    Response {
        code,
        headers: vec![("content-type".into(), "application/json".into())],
        body,
    }
}

/// `{"detail": ...}` body used by every failing answer.
pub fn error_response(code: StatusCode, detail: impl Into<String>) -> Response {
    let body = serde_json::to_vec(&ErrorResponse::new(detail))
        .unwrap_or_else(|_| b"{\"detail\":\"error\"}".to_vec());
    json_response(code, body)
}
