use super::SeaOrmStorage;
use super::grades::grade_sheets_of;
use super::groups::members_of;
use super::membership::group_titles;
use super::students::{campus_and_offering_labels, memberships_of};
use super::users::user_names;
use crate::entity::groups::{Column as GroupColumn, Entity as Groups};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, TgiSystemError};
use crate::models::groups::entities::default_group_title;
use crate::models::reports::entities::{GradeReportRow, GroupRosterRow, RosterMember};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 成绩报表行：offering_ids 为 None 时导出全部开课
    pub async fn grade_report_rows_impl(
        &self,
        offering_ids: Option<&[i64]>,
    ) -> Result<Vec<GradeReportRow>> {
        let mut select = Students::find();
        if let Some(ids) = offering_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(StudentColumn::OfferingId.is_in(ids.to_vec()));
        }
        let students = select
            .order_by_asc(StudentColumn::Name)
            .order_by_asc(StudentColumn::Rgm)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询学生失败: {e}")))?;

        let (campuses, offerings) = campus_and_offering_labels(&self.db, &students).await?;
        let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        let memberships = memberships_of(&self.db, &student_ids).await?;

        let mut group_ids: Vec<i64> = memberships.values().copied().collect();
        group_ids.sort_unstable();
        group_ids.dedup();
        let groups = Groups::find()
            .filter(GroupColumn::Id.is_in(group_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?;
        let advisor_ids: Vec<i64> = groups.iter().filter_map(|g| g.advisor_id).collect();
        let advisors = user_names(&self.db, &advisor_ids).await?;
        let advisor_of: std::collections::HashMap<i64, Option<String>> = groups
            .iter()
            .map(|g| (g.id, g.advisor_id.and_then(|a| advisors.get(&a).cloned())))
            .collect();
        let titles = group_titles(&self.db, &group_ids).await?;
        let sheets = grade_sheets_of(&self.db, &group_ids).await?;

        let mut rows: Vec<GradeReportRow> = students
            .into_iter()
            .map(|student| {
                let group_id = memberships.get(&student.id).copied();
                let sheet = group_id.and_then(|g| sheets.get(&g)).cloned().unwrap_or_default();
                GradeReportRow {
                    group_id,
                    group_title: group_id.and_then(|g| titles.get(&g).cloned()),
                    campus: campuses.get(&student.campus_id).cloned().unwrap_or_default(),
                    offering_code: offerings
                        .get(&student.offering_id)
                        .cloned()
                        .unwrap_or_default(),
                    advisor_name: group_id.and_then(|g| advisor_of.get(&g).cloned().flatten()),
                    rgm: student.rgm,
                    student_name: student.name,
                    report_i: sheet.report_i,
                    report_ii: sheet.report_ii,
                    paper: sheet.paper,
                    banner_average: sheet.banner_average,
                }
            })
            .collect();

        // 有小组的学生按小组排在前面
        rows.sort_by_key(|r| (r.group_id.is_none(), r.group_id));
        Ok(rows)
    }

    /// 小组名单行：advisor_id 为 None 时导出全部小组
    pub async fn group_roster_rows_impl(&self, advisor_id: Option<i64>) -> Result<Vec<GroupRosterRow>> {
        let mut select = Groups::find();
        if let Some(advisor_id) = advisor_id {
            select = select.filter(GroupColumn::AdvisorId.eq(advisor_id));
        }
        let groups = select
            .order_by_asc(GroupColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?;

        let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        let mut members = members_of(&self.db, &ids).await?;
        let advisor_ids: Vec<i64> = groups.iter().filter_map(|g| g.advisor_id).collect();
        let advisors = user_names(&self.db, &advisor_ids).await?;

        Ok(groups
            .into_iter()
            .map(|g| GroupRosterRow {
                group_id: g.id,
                title: g
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| default_group_title(g.id)),
                advisor_name: g.advisor_id.and_then(|a| advisors.get(&a).cloned()),
                members: members
                    .remove(&g.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|m| RosterMember {
                        name: m.name,
                        rgm: m.rgm,
                    })
                    .collect(),
            })
            .collect())
    }
}
