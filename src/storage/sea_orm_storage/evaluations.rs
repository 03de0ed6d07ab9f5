use super::groups::{groups_with_advisors, members_of};
use super::membership::group_titles;
use super::{SeaOrmStorage, now_ts};
use crate::entity::banner_evaluations::{ActiveModel, Column, Entity as BannerEvaluations};
use crate::entity::groups::{Column as GroupColumn, Entity as Groups};
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::evaluations::{
    entities::{PosterEvaluation, RUBRIC_MAX_SCORE},
    responses::{MyEvaluationItem, PendingEvaluationItem},
};
use crate::models::grades::entities::average_of;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

/// 海报评价平均分与评价次数
pub(super) async fn poster_stats<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
) -> Result<(Option<f64>, i64)> {
    let rows = BannerEvaluations::find()
        .filter(Column::GroupId.eq(group_id))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询海报评价失败: {e}")))?;
    let count = rows.len() as i64;
    Ok((average_of(rows.into_iter().map(|r| r.score)), count))
}

impl SeaOrmStorage {
    /// 评审人尚未评价的小组；exclude_advised 时跳过自己指导的小组
    pub async fn list_pending_evaluations_impl(
        &self,
        evaluator_id: i64,
        exclude_advised: bool,
    ) -> Result<Vec<PendingEvaluationItem>> {
        let evaluated: Vec<i64> = BannerEvaluations::find()
            .filter(Column::EvaluatorId.eq(evaluator_id))
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询海报评价失败: {e}")))?
            .into_iter()
            .map(|r| r.group_id)
            .collect();

        let mut select = Groups::find();
        if !evaluated.is_empty() {
            select = select.filter(GroupColumn::Id.is_not_in(evaluated));
        }
        let models: Vec<_> = select
            .order_by_asc(GroupColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?
            .into_iter()
            .filter(|g| !(exclude_advised && g.advisor_id == Some(evaluator_id)))
            .collect();

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut members = members_of(&self.db, &ids).await?;
        let groups = groups_with_advisors(&self.db, models).await?;

        Ok(groups
            .into_iter()
            .map(|group| PendingEvaluationItem {
                members: members.remove(&group.id).unwrap_or_default(),
                group,
            })
            .collect())
    }

    pub async fn list_my_evaluations_impl(&self, evaluator_id: i64) -> Result<Vec<MyEvaluationItem>> {
        let rows = BannerEvaluations::find()
            .filter(Column::EvaluatorId.eq(evaluator_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询海报评价失败: {e}")))?;

        let ids: Vec<i64> = rows.iter().map(|r| r.group_id).collect();
        let titles = group_titles(&self.db, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| MyEvaluationItem {
                group_id: row.group_id,
                group_title: titles.get(&row.group_id).cloned().unwrap_or_default(),
                evaluation: row.into_evaluation(),
            })
            .collect())
    }

    /// 记录海报评价；同一评审人对同一小组只能评价一次
    pub async fn create_evaluation_impl(
        &self,
        group_id: i64,
        evaluator_id: i64,
        score: f64,
        comments: Option<String>,
    ) -> Result<PosterEvaluation> {
        if !score.is_finite() || !(0.0..=RUBRIC_MAX_SCORE).contains(&score) {
            return Err(TgiSystemError::validation(format!(
                "评价分数必须在 0 到 {RUBRIC_MAX_SCORE} 之间"
            )));
        }

        let txn = self.begin().await?;
        if Groups::find_by_id(group_id)
            .one(&txn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?
            .is_none()
        {
            return Err(TgiSystemError::not_found(format!("小组不存在: {group_id}")));
        }

        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let model = ActiveModel {
            group_id: Set(group_id),
            evaluator_id: Set(evaluator_id),
            score: Set(score),
            comments: Set(comments),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| classify_db_error(e, "保存海报评价失败"))?;
        Self::commit(txn).await?;

        info!("用户 {} 评价了小组 {}，得分 {}", evaluator_id, group_id, score);
        Ok(model.into_evaluation())
    }
}
