use super::offerings::{release_all_offerings, sync_offerings_in};
use super::{SeaOrmStorage, now_ts};
use crate::entity::groups::{Column as GroupColumn, Entity as Groups};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::{
    GuardOutcome, PaginationInfo,
    common::pagination::page_window,
    groups::entities::Group,
    offerings::ownership::OfferingConflict,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::{UserListItem, UserListResponse},
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::info;

/// 按 id 批量查询用户姓名
pub(super) async fn user_names<C: ConnectionTrait>(
    conn: &C,
    ids: &[i64],
) -> Result<HashMap<i64, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let users = Users::find()
        .filter(Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询用户失败: {e}")))?;
    Ok(users.into_iter().map(|u| (u.id, u.full_name)).collect())
}

impl SeaOrmStorage {
    /// 创建用户；教师的开课在同一事务中同步，被拒绝时用户也不会创建
    pub async fn create_user_impl(
        &self,
        req: CreateUserRequest,
    ) -> Result<GuardOutcome<User, OfferingConflict>> {
        let now = now_ts();
        let txn = self.begin().await?;

        let created = ActiveModel {
            email: Set(req.email),
            password_hash: Set(req.password),
            full_name: Set(req.full_name),
            role: Set(req.role.to_string()),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| classify_db_error(e, "创建用户失败"))?;

        if req.role == UserRole::Professor && !req.offering_ids.is_empty() {
            let outcome =
                sync_offerings_in(&txn, created.id, &req.offering_ids, req.reassign_offerings)
                    .await?;
            if let GuardOutcome::Conflicted(conflicts) = outcome {
                return Ok(GuardOutcome::Conflicted(conflicts));
            }
        }

        Self::commit(txn).await?;
        Ok(GuardOutcome::Applied(created.into_user()))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户，附带指导的小组数
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.like(like_contains(pattern)))
                    .add(Column::Email.like(like_contains(pattern))),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::FullName)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询用户总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询用户页数失败: {e}")))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询用户列表失败: {e}")))?;

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let mut advised: HashMap<i64, i64> = HashMap::new();
        if !ids.is_empty() {
            let groups = Groups::find()
                .filter(GroupColumn::AdvisorId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    TgiSystemError::database_operation(format!("查询指导小组失败: {e}"))
                })?;
            for group in groups {
                if let Some(advisor) = group.advisor_id {
                    *advised.entry(advisor).or_default() += 1;
                }
            }
        }

        Ok(UserListResponse {
            items: users
                .into_iter()
                .map(|m| {
                    let advised_groups = advised.get(&m.id).copied().unwrap_or(0);
                    UserListItem {
                        user: m.into_user(),
                        advised_groups,
                    }
                })
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新用户信息
    ///
    /// 最终角色不是教师时释放其全部开课；是教师且给出了 `offering_ids` 时同步开课。
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<GuardOutcome<User, OfferingConflict>> {
        let txn = self.begin().await?;

        let existing = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询用户失败: {e}")))?
            .ok_or_else(|| TgiSystemError::not_found(format!("用户不存在: {id}")))?
            .into_user();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| classify_db_error(e, "更新用户失败"))?;

        let role = update.role.unwrap_or(existing.role);
        if role != UserRole::Professor {
            let released = release_all_offerings(&txn, id).await?;
            if !released.is_empty() {
                info!("用户 {} 不再是教师，释放开课 {:?}", id, released);
            }
        } else if let Some(ref offering_ids) = update.offering_ids {
            let outcome =
                sync_offerings_in(&txn, id, offering_ids, update.reassign_offerings).await?;
            if let GuardOutcome::Conflicted(conflicts) = outcome {
                return Ok(GuardOutcome::Conflicted(conflicts));
            }
        }

        Self::commit(txn).await?;
        Ok(GuardOutcome::Applied(updated.into_user()))
    }

    /// 删除用户，仍指导小组时拒绝
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let advised = Groups::find()
            .filter(GroupColumn::AdvisorId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询指导小组失败: {e}")))?;
        if advised > 0 {
            return Err(TgiSystemError::conflict(format!(
                "用户仍在指导 {advised} 个小组"
            )));
        }

        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error(e, "删除用户失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 用户指导的小组
    pub async fn list_groups_advised_by_impl(&self, user_id: i64) -> Result<Vec<Group>> {
        let advisor_name = user_names(&self.db, &[user_id]).await?.remove(&user_id);
        let groups = Groups::find()
            .filter(GroupColumn::AdvisorId.eq(user_id))
            .order_by_asc(GroupColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询指导小组失败: {e}")))?;

        Ok(groups
            .into_iter()
            .map(|g| g.into_group(advisor_name.clone()))
            .collect())
    }
}
