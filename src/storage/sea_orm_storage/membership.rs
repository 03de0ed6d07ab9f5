//! 小组成员对账的持久化部分

use super::SeaOrmStorage;
use super::students::{memberships_of, students_by_rgm};
use crate::entity::group_students::{ActiveModel, Column, Entity as GroupStudents};
use crate::entity::groups::{Column as GroupColumn, Entity as Groups};
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::{
    GuardOutcome,
    groups::{
        entities::default_group_title,
        membership::{MembershipConflict, MembershipPlan, ReconcileResult, normalize_external_ids},
    },
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use std::collections::HashMap;
use tracing::info;

/// 小组标题（缺省时为默认标题）
pub(super) async fn group_titles<C: ConnectionTrait>(
    conn: &C,
    group_ids: &[i64],
) -> Result<HashMap<i64, String>> {
    if group_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let groups = Groups::find()
        .filter(GroupColumn::Id.is_in(group_ids.to_vec()))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?;
    Ok(groups
        .into_iter()
        .map(|g| {
            let title = g
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| default_group_title(g.id));
            (g.id, title)
        })
        .collect())
}

/// 小组当前成员的学生 id
pub(super) async fn current_member_ids<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<i64>> {
    Ok(GroupStudents::find()
        .filter(Column::GroupId.eq(group_id))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询小组成员失败: {e}")))?
        .into_iter()
        .map(|m| m.student_id)
        .collect())
}

/// 将学生从任意小组中移出
pub(super) async fn detach_students<C: ConnectionTrait>(conn: &C, student_ids: &[i64]) -> Result<()> {
    if student_ids.is_empty() {
        return Ok(());
    }
    GroupStudents::delete_many()
        .filter(Column::StudentId.is_in(student_ids.to_vec()))
        .exec(conn)
        .await
        .map_err(|e| classify_db_error(e, "移除小组成员失败"))?;
    Ok(())
}

pub(super) async fn attach_students<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    student_ids: &[i64],
) -> Result<()> {
    if student_ids.is_empty() {
        return Ok(());
    }
    let now = super::now_ts();
    GroupStudents::insert_many(student_ids.iter().map(|student_id| ActiveModel {
        group_id: Set(group_id),
        student_id: Set(*student_id),
        created_at: Set(now),
    }))
    .exec(conn)
    .await
    .map_err(|e| classify_db_error(e, "添加小组成员失败"))?;
    Ok(())
}

/// 在给定连接上执行成员对账
///
/// 冲突且不允许改派时不做任何写入；否则先处理改派和移除，再加入新成员。
pub(super) async fn reconcile_in<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    desired_rgms: &[String],
    allow_reassignment: bool,
) -> Result<GuardOutcome<ReconcileResult, MembershipConflict>> {
    let rgms = normalize_external_ids(desired_rgms);
    let resolved = students_by_rgm(conn, &rgms).await?;

    let mut wanted = Vec::with_capacity(rgms.len());
    let mut unresolved = Vec::new();
    for rgm in &rgms {
        match resolved.get(rgm) {
            Some(student) => wanted.push(student.id),
            None => unresolved.push(rgm.clone()),
        }
    }

    let current = current_member_ids(conn, group_id).await?;
    let memberships = memberships_of(conn, &wanted).await?;
    let plan = MembershipPlan::compute(group_id, &current, &wanted, &memberships);

    if plan.has_conflicts() && !allow_reassignment {
        let group_ids: Vec<i64> = plan.conflicts.iter().map(|(_, g)| *g).collect();
        let titles = group_titles(conn, &group_ids).await?;
        let by_id: HashMap<i64, _> = resolved.values().map(|s| (s.id, s)).collect();
        let conflicts = plan
            .conflicts
            .iter()
            .filter_map(|(student_id, current_group)| {
                by_id.get(student_id).map(|s| MembershipConflict {
                    student_id: *student_id,
                    rgm: s.rgm.clone(),
                    student_name: s.name.clone(),
                    current_group_id: *current_group,
                    current_group_title: titles
                        .get(current_group)
                        .cloned()
                        .unwrap_or_else(|| default_group_title(*current_group)),
                    target_group_id: group_id,
                })
            })
            .collect();
        return Ok(GuardOutcome::Conflicted(conflicts));
    }

    let moved: Vec<i64> = plan.conflicts.iter().map(|(s, _)| *s).collect();
    detach_students(conn, &moved).await?;
    if !plan.to_remove.is_empty() {
        GroupStudents::delete_many()
            .filter(Column::GroupId.eq(group_id))
            .filter(Column::StudentId.is_in(plan.to_remove.clone()))
            .exec(conn)
            .await
            .map_err(|e| classify_db_error(e, "移除小组成员失败"))?;
    }
    attach_students(conn, group_id, &plan.to_add).await?;

    Ok(GuardOutcome::Applied(ReconcileResult {
        added: plan.to_add,
        removed: plan.to_remove,
        unresolved,
        conflicts_resolved: moved,
    }))
}

impl SeaOrmStorage {
    pub async fn reconcile_group_members_impl(
        &self,
        group_id: i64,
        desired_rgms: &[String],
        allow_reassignment: bool,
    ) -> Result<GuardOutcome<ReconcileResult, MembershipConflict>> {
        let txn = self.begin().await?;

        if Groups::find_by_id(group_id)
            .one(&txn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?
            .is_none()
        {
            return Err(TgiSystemError::not_found(format!("小组不存在: {group_id}")));
        }

        let outcome = reconcile_in(&txn, group_id, desired_rgms, allow_reassignment).await?;
        match outcome {
            GuardOutcome::Applied(ref result) => {
                Self::commit(txn).await?;
                info!(
                    "小组 {} 成员对账完成: 加入 {:?}, 移出 {:?}, 改派 {:?}, 未识别 {:?}",
                    group_id,
                    result.added,
                    result.removed,
                    result.conflicts_resolved,
                    result.unresolved
                );
            }
            GuardOutcome::Conflicted(ref conflicts) => {
                info!("小组 {} 成员对账被拒绝: {} 个冲突", group_id, conflicts.len());
            }
        }
        Ok(outcome)
    }
}
