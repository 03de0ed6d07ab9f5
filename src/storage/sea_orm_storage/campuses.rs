use super::{SeaOrmStorage, now_ts};
use crate::entity::campuses::{ActiveModel, Column, Entity as Campuses};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::campuses::entities::Campus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn list_campuses_impl(&self) -> Result<Vec<Campus>> {
        let campuses = Campuses::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询校区列表失败: {e}")))?;
        Ok(campuses.into_iter().map(|m| m.into_campus()).collect())
    }

    pub async fn get_campus_by_id_impl(&self, id: i64) -> Result<Option<Campus>> {
        let campus = Campuses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询校区失败: {e}")))?;
        Ok(campus.map(|m| m.into_campus()))
    }

    pub async fn create_campus_impl(&self, name: &str) -> Result<Campus> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| classify_db_error(e, "创建校区失败"))?;
        Ok(model.into_campus())
    }

    pub async fn update_campus_impl(&self, id: i64, name: &str) -> Result<Option<Campus>> {
        if self.get_campus_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }
        let model = ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| classify_db_error(e, "更新校区失败"))?;
        Ok(Some(model.into_campus()))
    }

    /// 仍有学生引用时拒绝删除
    pub async fn delete_campus_impl(&self, id: i64) -> Result<bool> {
        let referenced = Students::find()
            .filter(StudentColumn::CampusId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询校区学生失败: {e}")))?;
        if referenced > 0 {
            return Err(TgiSystemError::conflict(format!(
                "校区仍被 {referenced} 名学生引用"
            )));
        }

        let result = Campuses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "删除校区失败"))?;
        Ok(result.rows_affected > 0)
    }
}
