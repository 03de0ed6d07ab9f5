use super::{SeaOrmStorage, now_ts};
use crate::entity::group_assessments::{ActiveModel, Column, Entity as GroupAssessments};
use crate::entity::groups::Entity as Groups;
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::grades::{
    entities::{Assessment, GradeSheet, Instrument, STORED_SCORE_MAX, checkbox_score},
    requests::GradeFormRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::info;

/// 批量计算小组的评分表；没有评分的小组不出现在结果中
pub(super) async fn grade_sheets_of<C: ConnectionTrait>(
    conn: &C,
    group_ids: &[i64],
) -> Result<HashMap<i64, GradeSheet>> {
    if group_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = GroupAssessments::find()
        .filter(Column::GroupId.is_in(group_ids.to_vec()))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询小组评分失败: {e}")))?;

    let mut by_group: HashMap<i64, Vec<Assessment>> = HashMap::new();
    for row in rows {
        if let Some(assessment) = row.into_assessment() {
            by_group.entry(assessment.group_id).or_default().push(assessment);
        }
    }
    Ok(by_group
        .into_iter()
        .map(|(id, list)| (id, GradeSheet::from_assessments(&list)))
        .collect())
}

fn check_score(instrument: Instrument, score: f64) -> Result<()> {
    instrument
        .validate_score(score)
        .map_err(TgiSystemError::validation)?;
    if !(0.0..=STORED_SCORE_MAX).contains(&score) {
        return Err(TgiSystemError::validation(format!(
            "分数必须在 0 到 {STORED_SCORE_MAX} 之间"
        )));
    }
    Ok(())
}

/// 每个 (小组, 评分项) 至多一条记录：存在则覆盖，否则插入
async fn upsert_in<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    instrument: Instrument,
    score: f64,
    entered_by: Option<i64>,
) -> Result<Assessment> {
    check_score(instrument, score)?;

    if Groups::find_by_id(group_id)
        .one(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?
        .is_none()
    {
        return Err(TgiSystemError::not_found(format!("小组不存在: {group_id}")));
    }

    let existing = GroupAssessments::find()
        .filter(Column::GroupId.eq(group_id))
        .filter(Column::Instrument.eq(instrument.as_str()))
        .one(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询评分失败: {e}")))?;

    let now = now_ts();
    let model = match existing {
        Some(row) => ActiveModel {
            id: Set(row.id),
            score: Set(score),
            entered_by: Set(entered_by),
            entered_at: Set(now),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(|e| classify_db_error(e, "更新评分失败"))?,
        None => ActiveModel {
            group_id: Set(group_id),
            instrument: Set(instrument.as_str().to_string()),
            score: Set(score),
            entered_by: Set(entered_by),
            entered_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| classify_db_error(e, "保存评分失败"))?,
    };

    model
        .into_assessment()
        .ok_or_else(|| TgiSystemError::database_operation("评分项无法识别"))
}

impl SeaOrmStorage {
    pub async fn upsert_assessment_impl(
        &self,
        group_id: i64,
        instrument: Instrument,
        score: f64,
        entered_by: Option<i64>,
    ) -> Result<Assessment> {
        let txn = self.begin().await?;
        let assessment = upsert_in(&txn, group_id, instrument, score, entered_by).await?;
        Self::commit(txn).await?;
        Ok(assessment)
    }

    pub async fn get_assessment_score_impl(
        &self,
        group_id: i64,
        instrument: Instrument,
    ) -> Result<Option<f64>> {
        let row = GroupAssessments::find()
            .filter(Column::GroupId.eq(group_id))
            .filter(Column::Instrument.eq(instrument.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询评分失败: {e}")))?;
        Ok(row.map(|r| r.score))
    }

    pub async fn list_group_assessments_impl(&self, group_id: i64) -> Result<Vec<Assessment>> {
        let rows = GroupAssessments::find()
            .filter(Column::GroupId.eq(group_id))
            .order_by_asc(Column::Instrument)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组评分失败: {e}")))?;
        Ok(rows.into_iter().filter_map(|r| r.into_assessment()).collect())
    }

    pub async fn get_grade_sheet_impl(&self, group_id: i64) -> Result<GradeSheet> {
        Ok(grade_sheets_of(&self.db, &[group_id])
            .await?
            .remove(&group_id)
            .unwrap_or_default())
    }

    /// 保存评分表单：三项一起写入，任何一项失败则全部回滚
    pub async fn save_grade_form_impl(
        &self,
        group_id: i64,
        form: GradeFormRequest,
        entered_by: i64,
    ) -> Result<GradeSheet> {
        let entries = [
            (Instrument::ReportI, checkbox_score(form.report_i)),
            (Instrument::ReportII, checkbox_score(form.report_ii)),
            (Instrument::Paper, form.paper.unwrap_or(0.0)),
        ];

        let txn = self.begin().await?;
        let mut saved = Vec::with_capacity(entries.len());
        for (instrument, score) in entries {
            saved.push(upsert_in(&txn, group_id, instrument, score, Some(entered_by)).await?);
        }
        Self::commit(txn).await?;

        info!("小组 {} 评分已由用户 {} 更新", group_id, entered_by);
        Ok(GradeSheet::from_assessments(&saved))
    }
}
