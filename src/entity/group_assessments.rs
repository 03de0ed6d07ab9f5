//! 小组评分实体，(group_id, instrument) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_assessments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub instrument: String,
    pub score: f64,
    pub entered_by: Option<i64>,
    pub entered_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 无法识别的评分项返回 None（历史值已由迁移规范化）
    pub fn into_assessment(self) -> Option<crate::models::grades::entities::Assessment> {
        use crate::models::grades::entities::{Assessment, Instrument};
        use chrono::{DateTime, Utc};

        let instrument = self.instrument.parse::<Instrument>().ok()?;
        Some(Assessment {
            group_id: self.group_id,
            instrument,
            score: self.score,
            entered_by: self.entered_by,
            entered_at: DateTime::<Utc>::from_timestamp(self.entered_at, 0).unwrap_or_default(),
        })
    }
}
