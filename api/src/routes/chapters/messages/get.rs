//! Chat history retrieval for a chapter submission.

use crate::auth::Claims;
use crate::response::ApiResponse;
use crate::routes::chapters::messages::common::{ChatError, authorize, load_submission};
use db::models::{
    message::{MessageType, Model as MessageModel},
    user::Role,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

#[derive(Serialize)]
pub struct SenderResponse {
    pub id: i64,
    pub full_name: String,
    pub role: Role,
    pub profile_picture: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub message_type: MessageType,
    pub message_text: Option<String>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub created_at: String,
    pub sender: Option<SenderResponse>,
}

#[derive(Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub current_user_id: i64,
}

/// Returns the full chat thread for a submission, oldest first, with each
/// message joined to its sender. The caller's own user id rides along so the
/// client can distinguish its own bubbles.
pub async fn get_messages(
    db: &DatabaseConnection,
    claims: &Claims,
    submission_id: i64,
) -> Result<ApiResponse<MessageListResponse>, ChatError> {
    let (submission, group) = load_submission(db, submission_id).await?;
    authorize(claims, &group)?;

    let rows = MessageModel::find_for_submission(db, submission.id).await?;

    let messages = rows
        .into_iter()
        .map(|(message, sender)| MessageResponse {
            id: message.id,
            message_type: message.message_type,
            message_text: message.message_text,
            file_path: message.file_path,
            file_name: message.file_name,
            created_at: message.created_at.to_rfc3339(),
            sender: sender.map(|u| SenderResponse {
                id: u.id,
                full_name: u.full_name,
                role: u.role,
                profile_picture: u.profile_picture_path,
            }),
        })
        .collect();

    Ok(ApiResponse::success(MessageListResponse {
        messages,
        current_user_id: claims.sub,
    }))
}
