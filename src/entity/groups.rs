//! TGI 小组实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tgi_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: Option<String>,
    pub advisor_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AdvisorId",
        to = "super::users::Column::Id"
    )]
    Advisor,
    #[sea_orm(has_many = "super::group_students::Entity")]
    GroupStudents,
    #[sea_orm(has_many = "super::group_professors::Entity")]
    GroupProfessors,
    #[sea_orm(has_many = "super::group_assessments::Entity")]
    GroupAssessments,
    #[sea_orm(has_many = "super::banner_evaluations::Entity")]
    BannerEvaluations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Advisor.def()
    }
}

impl Related<super::group_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupStudents.def()
    }
}

impl Related<super::group_professors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupProfessors.def()
    }
}

impl Related<super::group_assessments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupAssessments.def()
    }
}

impl Related<super::banner_evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BannerEvaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_group(self, advisor_name: Option<String>) -> crate::models::groups::entities::Group {
        use crate::models::groups::entities::{Group, default_group_title};
        use chrono::{DateTime, Utc};

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| default_group_title(self.id));

        Group {
            id: self.id,
            title,
            advisor_id: self.advisor_id,
            advisor_name,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
