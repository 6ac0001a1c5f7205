use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DeriveActiveEnum, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::message::ContextType;

/// A notification row addressed to the counterparty of a chat message.
/// Delivery and display happen outside this service; only the insert lives
/// here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_id: i64,

    pub title: String,
    pub message: String,

    pub notification_type: NotificationType,
    pub context_type: ContextType,
    pub context_id: i64,

    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NotificationType {
    #[sea_orm(string_value = "chapter_message")]
    ChapterMessage,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Insert a notification row. Generic over the connection so the insert
    /// can share a transaction with the message it announces.
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        title: &str,
        message: &str,
        context_id: i64,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_owned()),
            message: Set(message.to_owned()),
            notification_type: Set(NotificationType::ChapterMessage),
            context_type: Set(ContextType::Submission),
            context_id: Set(context_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(conn).await
    }

    pub async fn find_for_user(db: &DbConn, user_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .all(db)
            .await
    }
}
