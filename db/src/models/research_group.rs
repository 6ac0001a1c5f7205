use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A research group pairs exactly one lead student with one assigned adviser.
/// These two identities are the only ones authorized to access the group's
/// submission chats.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "research_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub lead_student_id: i64,
    pub adviser_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LeadStudentId",
        to = "super::user::Column::Id"
    )]
    LeadStudent,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdviserId",
        to = "super::user::Column::Id"
    )]
    Adviser,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        name: &str,
        lead_student_id: i64,
        adviser_id: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active = ActiveModel {
            name: Set(name.to_owned()),
            lead_student_id: Set(lead_student_id),
            adviser_id: Set(adviser_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }
}
