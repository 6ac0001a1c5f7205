use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Payload type for responses that carry no data beyond the success flag.
#[derive(Serialize, Default)]
pub struct Empty {}

/// Standardized JSON envelope for all outgoing responses.
///
/// Success payloads flatten their fields next to the flag:
/// ```json
/// { "success": true, "messages": [...], "current_user_id": 7 }
/// ```
///
/// Failures carry only a human-readable error string:
/// ```json
/// { "success": false, "error": "Access denied" }
/// ```
///
/// Every response is sent with HTTP 200; this API signals failure through the
/// payload, not through transport status codes.
#[derive(Serialize)]
pub struct ApiResponse<T = Empty>
where
    T: Serialize,
{
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response whose fields are flattened into the
    /// envelope.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Constructs an error response with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<Empty> {
    /// A bare `{"success": true}` acknowledgment.
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
