use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, ConnectionTrait, DeriveActiveEnum, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A chat message attached to a submission.
///
/// Invariant: a message has non-null `message_text` or non-null `file_path`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub context_type: ContextType,
    pub context_id: i64,
    pub sender_id: i64,

    pub message_type: MessageType,
    pub message_text: Option<String>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Generic context tagging letting messages attach to different kinds of
/// parent entities. Submission chats are the only context today.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "message_context_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContextType {
    #[sea_orm(string_value = "submission")]
    Submission,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "message_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MessageType {
    #[sea_orm(string_value = "text")]
    Text,

    #[sea_orm(string_value = "image")]
    Image,

    #[sea_orm(string_value = "file")]
    File,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id"
    )]
    Sender,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Insert a message row. Generic over the connection so the same call
    /// works inside a transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        submission_id: i64,
        sender_id: i64,
        message_type: MessageType,
        message_text: Option<String>,
        file_path: Option<String>,
        file_name: Option<String>,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            context_type: Set(ContextType::Submission),
            context_id: Set(submission_id),
            sender_id: Set(sender_id),
            message_type: Set(message_type),
            message_text: Set(message_text),
            file_path: Set(file_path),
            file_name: Set(file_name),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(conn).await
    }

    /// All messages for a submission's chat, oldest first, each joined with
    /// its sender. Filters to the chat message types and drops rows that
    /// carry neither text nor a file path.
    pub async fn find_for_submission(
        db: &DbConn,
        submission_id: i64,
    ) -> Result<Vec<(Model, Option<super::user::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::ContextType.eq(ContextType::Submission))
            .filter(Column::ContextId.eq(submission_id))
            .filter(Column::MessageType.is_in([
                MessageType::Text,
                MessageType::Image,
                MessageType::File,
            ]))
            .filter(
                Condition::any()
                    .add(Column::MessageText.is_not_null())
                    .add(Column::FilePath.is_not_null()),
            )
            .find_also_related(super::user::Entity)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
