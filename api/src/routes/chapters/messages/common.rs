//! Shared helpers for the chapter messages endpoint: the error type, the
//! submission lookup + authorization pair, and the upload classification
//! table.

use crate::auth::Claims;
use crate::response::{ApiResponse, Empty};
use axum::response::{IntoResponse, Response};
use db::models::{
    message::MessageType, research_group::Model as ResearchGroupModel,
    submission::Model as SubmissionModel, user::Role,
};
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;

/// Everything that can go wrong inside the endpoint. Each variant's display
/// string is the exact error text the client receives.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid action")]
    InvalidAction,

    #[error("Invalid request")]
    InvalidRequest,

    #[error("Please provide a message or file")]
    EmptyMessage,

    #[error("Submission not found")]
    SubmissionNotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error("{0}")]
    PayloadTooLarge(&'static str),

    #[error(
        "Invalid file type. Only images (JPEG, PNG, GIF, WebP) and documents (PDF, DOC, DOCX) are allowed."
    )]
    UnsupportedMediaType,

    #[error("Failed to upload file")]
    Storage(#[from] std::io::Error),

    #[error("Database error")]
    Db(#[from] DbErr),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match &self {
            ChatError::Db(e) => tracing::error!(error = %e, "chapter messages query failed"),
            ChatError::Storage(e) => tracing::error!(error = %e, "attachment write failed"),
            _ => {}
        }
        ApiResponse::<Empty>::error(self.to_string()).into_response()
    }
}

/// Parse a `submission_id` taken from the query string or a form field.
/// Missing, non-numeric, and non-positive values are all invalid requests.
pub fn parse_submission_id(raw: Option<&str>) -> Result<i64, ChatError> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or(ChatError::InvalidRequest)
}

/// Look up a submission joined with its research group.
pub async fn load_submission(
    db: &DatabaseConnection,
    submission_id: i64,
) -> Result<(SubmissionModel, ResearchGroupModel), ChatError> {
    SubmissionModel::find_with_group(db, submission_id)
        .await?
        .ok_or(ChatError::SubmissionNotFound)
}

/// Access is granted iff the session user is the group's lead student (for
/// student sessions) or its assigned adviser (for adviser sessions).
pub fn authorize(claims: &Claims, group: &ResearchGroupModel) -> Result<(), ChatError> {
    let allowed = match claims.role {
        Role::Student => claims.sub == group.lead_student_id,
        Role::Adviser => claims.sub == group.adviser_id,
    };

    if allowed {
        Ok(())
    } else {
        Err(ChatError::AccessDenied)
    }
}

// ─── Upload classification ──────────────────────────────────────────

const MIB: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Document,
}

/// One row of the classification table: what a kind accepts, how large it may
/// be, and where/how it is stored.
pub struct UploadRule {
    pub kind: UploadKind,
    pub mimes: &'static [&'static str],
    pub exts: &'static [&'static str],
    pub max_bytes: usize,
    pub subdir: &'static str,
    pub prefix: &'static str,
    pub default_caption: &'static str,
    pub message_type: MessageType,
    pub too_large: &'static str,
}

pub const UPLOAD_RULES: &[UploadRule] = &[
    UploadRule {
        kind: UploadKind::Image,
        mimes: &["image/jpeg", "image/png", "image/gif", "image/webp"],
        exts: &["jpg", "jpeg", "png", "gif", "webp"],
        max_bytes: 5 * MIB,
        subdir: "chat_images",
        prefix: "chat",
        default_caption: "Sent an image",
        message_type: MessageType::Image,
        too_large: "Image size too large. Maximum size is 5MB.",
    },
    UploadRule {
        kind: UploadKind::Document,
        mimes: &[
            "application/pdf",
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ],
        exts: &["pdf", "doc", "docx"],
        max_bytes: 10 * MIB,
        subdir: "chat_files",
        prefix: "chat_doc",
        default_caption: "Sent a document",
        message_type: MessageType::File,
        too_large: "Document size too large. Maximum size is 10MB.",
    },
];

fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Classify an upload against the rule table. A declared MIME match or an
/// extension match suffices; the first matching rule wins.
pub fn classify(content_type: Option<&str>, filename: &str) -> Option<&'static UploadRule> {
    let ext = file_extension(filename);

    UPLOAD_RULES.iter().find(|rule| {
        let mime_match = content_type
            .map(|ct| rule.mimes.iter().any(|m| ct.eq_ignore_ascii_case(m)))
            .unwrap_or(false);
        let ext_match = ext
            .as_deref()
            .map(|e| rule.exts.contains(&e))
            .unwrap_or(false);
        mime_match || ext_match
    })
}

/// Extension used for the stored filename: the original extension when the
/// rule allows it, otherwise one derived from the declared MIME type.
pub fn storage_extension(
    rule: &UploadRule,
    content_type: Option<&str>,
    filename: &str,
) -> String {
    if let Some(ext) = file_extension(filename) {
        if rule.exts.contains(&ext.as_str()) {
            return ext;
        }
    }

    match content_type {
        Some("image/jpeg") => "jpg",
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        Some("application/pdf") => "pdf",
        Some("application/msword") => "doc",
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => "docx",
        _ => rule.exts[0],
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_mime_alone() {
        let rule = classify(Some("image/png"), "photo.bin").unwrap();
        assert_eq!(rule.kind, UploadKind::Image);
    }

    #[test]
    fn classifies_by_extension_alone() {
        let rule = classify(Some("application/octet-stream"), "report.docx").unwrap();
        assert_eq!(rule.kind, UploadKind::Document);
        assert_eq!(rule.message_type, MessageType::File);
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(classify(Some("application/zip"), "archive.zip").is_none());
        assert!(classify(None, "noextension").is_none());
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let rule = classify(None, "SCAN.PDF").unwrap();
        assert_eq!(rule.kind, UploadKind::Document);
    }

    #[test]
    fn storage_extension_prefers_the_filename() {
        let rule = classify(Some("image/png"), "pic.jpeg").unwrap();
        assert_eq!(storage_extension(rule, Some("image/png"), "pic.jpeg"), "jpeg");
    }

    #[test]
    fn storage_extension_falls_back_to_mime() {
        let rule = classify(Some("image/webp"), "upload").unwrap();
        assert_eq!(storage_extension(rule, Some("image/webp"), "upload"), "webp");
    }

    #[test]
    fn size_limits_match_the_rule_kinds() {
        let image = &UPLOAD_RULES[0];
        let document = &UPLOAD_RULES[1];
        assert_eq!(image.max_bytes, 5 * 1024 * 1024);
        assert_eq!(document.max_bytes, 10 * 1024 * 1024);
    }
}
