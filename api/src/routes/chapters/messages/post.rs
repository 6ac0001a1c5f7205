//! Message sending: upload handling, the message/notification insert pair,
//! and counterparty notification texts.

use crate::auth::Claims;
use crate::response::{ApiResponse, Empty};
use crate::routes::chapters::messages::common::{
    ChatError, authorize, classify, load_submission, parse_submission_id, storage_extension,
};
use db::models::{
    message::{MessageType, Model as MessageModel},
    notification::Model as NotificationModel,
    research_group::Model as ResearchGroupModel,
    submission::Model as SubmissionModel,
    user::{Entity as UserEntity, Model as UserModel, Role},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait};
use std::fs;
use util::paths;

/// A file part lifted out of the multipart body.
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields collected from the multipart body of a send request.
#[derive(Default)]
pub struct SendForm {
    pub action: Option<String>,
    pub submission_id: Option<String>,
    pub message: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Appends a message to a submission's chat and notifies the counterparty.
///
/// The upload (if any) is validated and persisted first; the message and
/// notification rows are then inserted inside a single transaction that is
/// committed only if both succeed.
pub async fn send_message(
    db: &DatabaseConnection,
    claims: &Claims,
    form: SendForm,
) -> Result<ApiResponse<Empty>, ChatError> {
    let submission_id = parse_submission_id(form.submission_id.as_deref())?;
    let (submission, group) = load_submission(db, submission_id).await?;
    authorize(claims, &group)?;

    let sender = UserEntity::find_by_id(claims.sub)
        .one(db)
        .await?
        .ok_or(ChatError::AccessDenied)?;

    let mut message_text = form
        .message
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let mut message_type = MessageType::Text;
    let mut stored_path: Option<String> = None;
    let mut file_name: Option<String> = None;

    if let Some(file) = &form.file {
        let rule =
            classify(file.content_type.as_deref(), &file.name).ok_or(ChatError::UnsupportedMediaType)?;

        if file.bytes.len() > rule.max_bytes {
            return Err(ChatError::PayloadTooLarge(rule.too_large));
        }

        let ext = storage_extension(rule, file.content_type.as_deref(), &file.name);
        let stored_name = paths::chat_attachment_name(rule.prefix, submission_id, &ext);
        let dir = paths::ensure_dir(paths::storage_root().join(rule.subdir))?;
        fs::write(dir.join(&stored_name), &file.bytes)?;

        stored_path = Some(format!("{}/{}", rule.subdir, stored_name));
        file_name = Some(file.name.clone());
        message_type = rule.message_type;

        if message_text.is_none() {
            message_text = Some(rule.default_caption.to_string());
        }
    }

    // Checked before any row is inserted.
    if message_text.is_none() && stored_path.is_none() {
        return Err(ChatError::EmptyMessage);
    }

    let txn = db.begin().await?;
    match record_message(
        &txn,
        &submission,
        &group,
        &sender,
        claims.role,
        message_type,
        message_text,
        stored_path,
        file_name,
    )
    .await
    {
        Ok(()) => {
            txn.commit().await?;
            Ok(ApiResponse::ok())
        }
        Err(e) => {
            let _ = txn.rollback().await;
            Err(e)
        }
    }
}

/// The unit of work: message insert plus counterparty notification insert.
/// Runs on the transaction; the caller commits or rolls back on the result.
#[allow(clippy::too_many_arguments)]
async fn record_message<C: ConnectionTrait>(
    conn: &C,
    submission: &SubmissionModel,
    group: &ResearchGroupModel,
    sender: &UserModel,
    sender_role: Role,
    message_type: MessageType,
    message_text: Option<String>,
    stored_path: Option<String>,
    file_name: Option<String>,
) -> Result<(), ChatError> {
    MessageModel::create(
        conn,
        submission.id,
        sender.id,
        message_type,
        message_text,
        stored_path,
        file_name,
    )
    .await?;

    let (recipient_id, title, body) = match sender_role {
        Role::Student => (
            group.adviser_id,
            "New chapter message",
            format!(
                "{} sent a message on Chapter {}.",
                sender.full_name, submission.chapter_number
            ),
        ),
        Role::Adviser => (
            group.lead_student_id,
            "Adviser feedback",
            format!(
                "Your adviser sent a message on Chapter {}.",
                submission.chapter_number
            ),
        ),
    };

    NotificationModel::create(conn, recipient_id, title, &body, submission.id).await?;

    Ok(())
}
