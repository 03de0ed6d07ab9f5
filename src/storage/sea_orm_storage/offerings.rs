use super::{SeaOrmStorage, now_ts, users::user_names};
use crate::entity::offerings::{ActiveModel, Column, Entity as Offerings, Model};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::{
    GuardOutcome, PaginationInfo,
    common::pagination::page_window,
    offerings::{
        entities::Offering,
        ownership::{OfferingConflict, OwnershipPlan, OwnershipResult},
        requests::{OfferingListQuery, OfferingRequest},
        responses::OfferingListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// 附带负责教师姓名
async fn with_professor_names<C: ConnectionTrait>(
    conn: &C,
    models: Vec<Model>,
) -> Result<Vec<Offering>> {
    let ids: Vec<i64> = models.iter().filter_map(|m| m.professor_id).collect();
    let names = user_names(conn, &ids).await?;
    Ok(models
        .into_iter()
        .map(|m| {
            let name = m.professor_id.and_then(|id| names.get(&id).cloned());
            m.into_offering(name)
        })
        .collect())
}

/// 按代码查找开课，不存在时创建，返回开课 id
pub(super) async fn find_or_create_offering<C: ConnectionTrait>(conn: &C, code: &str) -> Result<i64> {
    let existing = Offerings::find()
        .filter(Column::Code.eq(code))
        .one(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?;
    if let Some(model) = existing {
        return Ok(model.id);
    }

    let now = now_ts();
    let created = ActiveModel {
        code: Set(code.to_string()),
        description: Set(None),
        professor_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| classify_db_error(e, "创建开课失败"))?;

    info!("按代码自动创建开课 {} (id={})", code, created.id);
    Ok(created.id)
}

/// 释放用户负责的全部开课，返回释放的开课 id
pub(super) async fn release_all_offerings<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<i64>> {
    let owned: Vec<i64> = Offerings::find()
        .filter(Column::ProfessorId.eq(user_id))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?
        .into_iter()
        .map(|m| m.id)
        .collect();
    set_owner(conn, &owned, None).await?;
    Ok(owned)
}

async fn set_owner<C: ConnectionTrait>(
    conn: &C,
    offering_ids: &[i64],
    owner: Option<i64>,
) -> Result<()> {
    if offering_ids.is_empty() {
        return Ok(());
    }
    Offerings::update_many()
        .col_expr(Column::ProfessorId, Expr::value(owner))
        .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
        .filter(Column::Id.is_in(offering_ids.to_vec()))
        .exec(conn)
        .await
        .map_err(|e| classify_db_error(e, "更新开课负责人失败"))?;
    Ok(())
}

/// 在给定连接（通常是事务）上同步教师负责的开课
///
/// 冲突且不允许改派时不写入任何数据。
pub(super) async fn sync_offerings_in<C: ConnectionTrait>(
    conn: &C,
    professor_id: i64,
    offering_ids: &[i64],
    allow_reassignment: bool,
) -> Result<GuardOutcome<OwnershipResult, OfferingConflict>> {
    let selected: Vec<i64> = offering_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let selected_models = if selected.is_empty() {
        Vec::new()
    } else {
        Offerings::find()
            .filter(Column::Id.is_in(selected.clone()))
            .all(conn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?
    };
    let owners: HashMap<i64, Option<i64>> = selected_models
        .iter()
        .map(|m| (m.id, m.professor_id))
        .collect();

    let currently_owned: Vec<i64> = Offerings::find()
        .filter(Column::ProfessorId.eq(professor_id))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let plan = OwnershipPlan::compute(professor_id, &selected, &currently_owned, &owners);

    if !plan.unknown.is_empty() {
        return Err(TgiSystemError::not_found(format!(
            "开课不存在: {:?}",
            plan.unknown
        )));
    }

    if plan.has_conflicts() && !allow_reassignment {
        let owner_ids: Vec<i64> = plan.conflicts.iter().map(|(_, owner)| *owner).collect();
        let names = user_names(conn, &owner_ids).await?;
        let codes: HashMap<i64, String> = selected_models
            .into_iter()
            .map(|m| (m.id, m.code))
            .collect();
        let conflicts = plan
            .conflicts
            .iter()
            .map(|(offering_id, owner)| OfferingConflict {
                offering_id: *offering_id,
                offering_code: codes.get(offering_id).cloned().unwrap_or_default(),
                current_owner_id: *owner,
                current_owner_name: names.get(owner).cloned(),
            })
            .collect();
        return Ok(GuardOutcome::Conflicted(conflicts));
    }

    set_owner(conn, &plan.to_release, None).await?;
    set_owner(conn, &plan.to_assign, Some(professor_id)).await?;

    Ok(GuardOutcome::Applied(OwnershipResult {
        assigned: plan.to_assign,
        released: plan.to_release,
        reassigned: plan.conflicts.into_iter().map(|(id, _)| id).collect(),
    }))
}

impl SeaOrmStorage {
    /// 同步教师负责的开课（独立事务）
    pub async fn sync_professor_offerings_impl(
        &self,
        professor_id: i64,
        offering_ids: &[i64],
        allow_reassignment: bool,
    ) -> Result<GuardOutcome<OwnershipResult, OfferingConflict>> {
        let txn = self.begin().await?;
        let outcome = sync_offerings_in(&txn, professor_id, offering_ids, allow_reassignment).await?;
        if let GuardOutcome::Applied(ref result) = outcome {
            Self::commit(txn).await?;
            info!(
                "教师 {} 开课同步完成: 分配 {:?}, 释放 {:?}, 改派 {:?}",
                professor_id, result.assigned, result.released, result.reassigned
            );
        }
        Ok(outcome)
    }

    /// 分页列出开课
    pub async fn list_offerings_with_pagination_impl(
        &self,
        query: OfferingListQuery,
    ) -> Result<OfferingListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Offerings::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(like_contains(pattern)))
                    .add(Column::Description.like(like_contains(pattern))),
            );
        }

        if let Some(professor_id) = query.professor_id {
            select = select.filter(Column::ProfessorId.eq(professor_id));
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课列表失败: {e}")))?;

        Ok(OfferingListResponse {
            items: with_professor_names(&self.db, models).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 教师负责的开课
    pub async fn list_offerings_by_professor_impl(
        &self,
        professor_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Offering>> {
        let mut select = Offerings::find().filter(Column::ProfessorId.eq(professor_id));
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(like_contains(search)))
                    .add(Column::Description.like(like_contains(search))),
            );
        }
        let models = select
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课列表失败: {e}")))?;
        with_professor_names(&self.db, models).await
    }

    pub async fn get_offering_by_id_impl(&self, id: i64) -> Result<Option<Offering>> {
        let model = Offerings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?;
        match model {
            Some(m) => Ok(with_professor_names(&self.db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn create_offering_impl(&self, req: OfferingRequest) -> Result<Offering> {
        let now = now_ts();
        let model = ActiveModel {
            code: Set(req.code),
            description: Set(req.description.filter(|d| !d.trim().is_empty())),
            professor_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| classify_db_error(e, "创建开课失败"))?;

        Ok(model.into_offering(None))
    }

    pub async fn update_offering_impl(
        &self,
        id: i64,
        req: OfferingRequest,
    ) -> Result<Option<Offering>> {
        if Offerings::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        ActiveModel {
            id: Set(id),
            code: Set(req.code),
            description: Set(req.description.filter(|d| !d.trim().is_empty())),
            updated_at: Set(now_ts()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| classify_db_error(e, "更新开课失败"))?;

        self.get_offering_by_id_impl(id).await
    }

    /// 仍有学生引用时拒绝删除
    pub async fn delete_offering_impl(&self, id: i64) -> Result<bool> {
        let referenced = Students::find()
            .filter(StudentColumn::OfferingId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询开课学生失败: {e}")))?;
        if referenced > 0 {
            return Err(TgiSystemError::conflict(format!(
                "开课仍被 {referenced} 名学生引用"
            )));
        }

        let result = Offerings::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "删除开课失败"))?;
        Ok(result.rows_affected > 0)
    }
}
