//! The chapter messages endpoint.
//!
//! A single JSON endpoint dispatching on an `action` value accepted from the
//! query string or the request body:
//!
//! - `get_messages` → list the chat thread for a submission
//! - `send_message` → append a text/image/file message and notify the
//!   counterparty
//!
//! All responses are HTTP 200; failures are signaled through the
//! `{success:false, error}` payload.

pub mod common;
pub mod get;
pub mod post;

use axum::{
    Extension, Form,
    extract::{FromRequest, Multipart, Query, Request, State, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use common::{ChatError, parse_submission_id};
use post::{SendForm, UploadedFile};

#[derive(Debug, Deserialize)]
pub struct ActionParams {
    pub action: Option<String>,
    pub submission_id: Option<String>,
}

fn respond<T: serde::Serialize>(result: Result<ApiResponse<T>, ChatError>) -> Response {
    match result {
        Ok(resp) => resp.into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET entry point: `action` and `submission_id` come from the query string.
pub async fn messages_get(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<ActionParams>,
) -> Response {
    let db = app_state.db();

    match params.action.as_deref() {
        Some("get_messages") => respond(
            async {
                let id = parse_submission_id(params.submission_id.as_deref())?;
                get::get_messages(db, &claims, id).await
            }
            .await,
        ),
        _ => ChatError::InvalidAction.into_response(),
    }
}

/// POST entry point: fields come from the request body, with the query
/// string as fallback for `action` and `submission_id`.
pub async fn messages_post(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(params): Query<ActionParams>,
    req: Request,
) -> Response {
    let mut form = match parse_body(req).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    if form.action.is_none() {
        form.action = params.action.clone();
    }
    if form.submission_id.is_none() {
        form.submission_id = params.submission_id.clone();
    }

    let db = app_state.db();

    match form.action.as_deref() {
        Some("send_message") => respond(post::send_message(db, &claims, form).await),
        Some("get_messages") => respond(
            async {
                let id = parse_submission_id(form.submission_id.as_deref())?;
                get::get_messages(db, &claims, id).await
            }
            .await,
        ),
        _ => ChatError::InvalidAction.into_response(),
    }
}

/// Text fields of an urlencoded send request.
#[derive(Debug, Deserialize)]
struct FormFields {
    action: Option<String>,
    submission_id: Option<String>,
    message: Option<String>,
}

/// Reads the send fields out of the request body. Browsers submit this form
/// as multipart when a file is attached and as urlencoded otherwise, so both
/// are accepted; any other body is treated as empty and the query string
/// supplies the fields.
async fn parse_body(req: Request) -> Result<SendForm, ChatError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|_| ChatError::InvalidRequest)?;
        return parse_send_form(multipart).await;
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<FormFields>::from_request(req, &())
            .await
            .map_err(|_| ChatError::InvalidRequest)?;
        return Ok(SendForm {
            action: fields.action,
            submission_id: fields.submission_id,
            message: fields.message,
            file: None,
        });
    }

    Ok(SendForm::default())
}

/// The transport body cap sits above both upload size caps, so a length limit
/// hit while reading the stream can only mean an oversized attachment.
fn read_error(e: MultipartError) -> ChatError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ChatError::PayloadTooLarge("Document size too large. Maximum size is 10MB.")
    } else {
        ChatError::InvalidRequest
    }
}

/// Collects the known multipart fields. An empty file part (no filename or no
/// bytes) counts as no file, matching what browsers send for an unselected
/// file input.
async fn parse_send_form(mut multipart: Multipart) -> Result<SendForm, ChatError> {
    let mut form = SendForm::default();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        match field.name().unwrap_or("") {
            "action" => form.action = field.text().await.ok(),
            "submission_id" => form.submission_id = field.text().await.ok(),
            "message" => form.message = field.text().await.ok(),
            "file" => {
                let name = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(read_error)?.to_vec();

                if !name.is_empty() && !bytes.is_empty() {
                    form.file = Some(UploadedFile {
                        name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => continue,
        }
    }

    Ok(form)
}
