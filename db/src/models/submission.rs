use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A versioned chapter document tied to a research group. The chat thread
/// attaches to a submission as its context.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub group_id: i64,
    pub chapter_number: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::research_group::Entity",
        from = "Column::GroupId",
        to = "super::research_group::Column::Id"
    )]
    ResearchGroup,
}

impl Related<super::research_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, group_id: i64, chapter_number: i32) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active = ActiveModel {
            group_id: Set(group_id),
            chapter_number: Set(chapter_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Look up a submission together with its research group.
    ///
    /// Returns `None` if the submission does not exist or its group row is
    /// missing (a dangling group reference is treated as absent).
    pub async fn find_with_group(
        db: &DbConn,
        submission_id: i64,
    ) -> Result<Option<(Model, super::research_group::Model)>, DbErr> {
        let result = Entity::find_by_id(submission_id)
            .find_also_related(super::research_group::Entity)
            .one(db)
            .await?;

        Ok(result.and_then(|(submission, group)| group.map(|g| (submission, g))))
    }
}
