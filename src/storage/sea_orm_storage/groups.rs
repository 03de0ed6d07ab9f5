use super::evaluations::poster_stats;
use super::grades::grade_sheets_of;
use super::membership::reconcile_in;
use super::students::{campus_and_offering_labels, students_by_rgm};
use super::users::user_names;
use super::{SeaOrmStorage, now_ts};
use crate::entity::banner_evaluations::{Column as EvaluationColumn, Entity as BannerEvaluations};
use crate::entity::group_assessments::{Column as AssessmentColumn, Entity as GroupAssessments};
use crate::entity::group_professors::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as GroupProfessors,
};
use crate::entity::group_students::{Column as MembershipColumn, Entity as GroupStudents};
use crate::entity::groups::{ActiveModel, Column, Entity as Groups, Model};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::{
    GuardOutcome, PaginationInfo,
    common::pagination::page_window,
    groups::{
        entities::{Group, GroupMember, GroupProfessorRole, default_group_title},
        membership::{MembershipConflict, normalize_external_ids},
        requests::{GroupListQuery, GroupRequest},
        responses::{
            AdvisedGroupItem, GroupDetailResponse, GroupListItem, GroupListResponse,
            GroupWriteResponse,
        },
    },
    users::entities::UserRole,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::info;

/// 附带指导教师姓名
pub(super) async fn groups_with_advisors<C: ConnectionTrait>(
    conn: &C,
    models: Vec<Model>,
) -> Result<Vec<Group>> {
    let ids: Vec<i64> = models.iter().filter_map(|m| m.advisor_id).collect();
    let names = user_names(conn, &ids).await?;
    Ok(models
        .into_iter()
        .map(|m| {
            let name = m.advisor_id.and_then(|id| names.get(&id).cloned());
            m.into_group(name)
        })
        .collect())
}

/// 各小组成员，按姓名排序
pub(super) async fn members_of<C: ConnectionTrait>(
    conn: &C,
    group_ids: &[i64],
) -> Result<HashMap<i64, Vec<GroupMember>>> {
    if group_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let links = GroupStudents::find()
        .filter(MembershipColumn::GroupId.is_in(group_ids.to_vec()))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询小组成员失败: {e}")))?;
    if links.is_empty() {
        return Ok(HashMap::new());
    }

    let student_ids: Vec<i64> = links.iter().map(|l| l.student_id).collect();
    let students = Students::find()
        .filter(StudentColumn::Id.is_in(student_ids))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询学生失败: {e}")))?;
    let (campuses, offerings) = campus_and_offering_labels(conn, &students).await?;
    let students: HashMap<i64, _> = students.into_iter().map(|s| (s.id, s)).collect();

    let mut members: HashMap<i64, Vec<GroupMember>> = HashMap::new();
    for link in links {
        if let Some(student) = students.get(&link.student_id) {
            members.entry(link.group_id).or_default().push(GroupMember {
                student_id: student.id,
                rgm: student.rgm.clone(),
                name: student.name.clone(),
                campus_name: campuses.get(&student.campus_id).cloned(),
                offering_code: offerings.get(&student.offering_id).cloned(),
            });
        }
    }
    for list in members.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.rgm.cmp(&b.rgm)));
    }
    Ok(members)
}

/// 指导教师必须是启用状态的教师账号
async fn ensure_advisor<C: ConnectionTrait>(conn: &C, advisor_id: Option<i64>) -> Result<()> {
    let Some(advisor_id) = advisor_id else {
        return Ok(());
    };
    let user = Users::find_by_id(advisor_id)
        .one(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询指导教师失败: {e}")))?
        .ok_or_else(|| TgiSystemError::validation(format!("指导教师不存在: {advisor_id}")))?;
    if user.role != UserRole::PROFESSOR {
        return Err(TgiSystemError::validation(format!(
            "用户 {advisor_id} 不是教师，不能指导小组"
        )));
    }
    if !user.is_active {
        return Err(TgiSystemError::validation(format!(
            "用户 {advisor_id} 已停用，不能指导小组"
        )));
    }
    Ok(())
}

/// 保持 ADVISOR 关联与小组的指导教师一致
pub(super) async fn sync_advisor_link<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    advisor_id: Option<i64>,
) -> Result<()> {
    let role = GroupProfessorRole::Advisor.as_str();

    let mut stale = GroupProfessors::delete_many()
        .filter(LinkColumn::GroupId.eq(group_id))
        .filter(LinkColumn::RoleInGroup.eq(role));
    if let Some(advisor_id) = advisor_id {
        stale = stale.filter(LinkColumn::UserId.ne(advisor_id));
    }
    stale
        .exec(conn)
        .await
        .map_err(|e| classify_db_error(e, "更新指导关联失败"))?;

    let Some(advisor_id) = advisor_id else {
        return Ok(());
    };
    let exists = GroupProfessors::find()
        .filter(LinkColumn::GroupId.eq(group_id))
        .filter(LinkColumn::UserId.eq(advisor_id))
        .filter(LinkColumn::RoleInGroup.eq(role))
        .one(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询指导关联失败: {e}")))?
        .is_some();
    if !exists {
        LinkActiveModel {
            group_id: Set(group_id),
            user_id: Set(advisor_id),
            role_in_group: Set(role.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| classify_db_error(e, "创建指导关联失败"))?;
    }
    Ok(())
}

fn clean_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// 插入小组；未给标题时回填默认标题
pub(super) async fn insert_group<C: ConnectionTrait>(
    conn: &C,
    title: Option<String>,
    advisor_id: Option<i64>,
) -> Result<Model> {
    let now = now_ts();
    let title = clean_title(title);
    let needs_default = title.is_none();

    let mut model = ActiveModel {
        title: Set(title),
        advisor_id: Set(advisor_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| classify_db_error(e, "创建小组失败"))?;

    if needs_default {
        model = ActiveModel {
            id: Set(model.id),
            title: Set(Some(default_group_title(model.id))),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(|e| classify_db_error(e, "设置小组默认标题失败"))?;
    }
    Ok(model)
}

impl SeaOrmStorage {
    /// 分页列出小组；search 匹配标题、成员姓名或学号
    pub async fn list_groups_with_pagination_impl(
        &self,
        query: GroupListQuery,
    ) -> Result<GroupListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Groups::find();

        if let Some(advisor_id) = query.advisor_id {
            select = select.filter(Column::AdvisorId.eq(advisor_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            let student_ids: Vec<i64> = Students::find()
                .filter(
                    Condition::any()
                        .add(StudentColumn::Name.like(like_contains(pattern)))
                        .add(StudentColumn::Rgm.like(like_contains(pattern))),
                )
                .all(&self.db)
                .await
                .map_err(|e| TgiSystemError::database_operation(format!("查询学生失败: {e}")))?
                .into_iter()
                .map(|s| s.id)
                .collect();
            let group_ids: Vec<i64> = if student_ids.is_empty() {
                Vec::new()
            } else {
                GroupStudents::find()
                    .filter(MembershipColumn::StudentId.is_in(student_ids))
                    .all(&self.db)
                    .await
                    .map_err(|e| {
                        TgiSystemError::database_operation(format!("查询小组成员失败: {e}"))
                    })?
                    .into_iter()
                    .map(|l| l.group_id)
                    .collect()
            };

            let mut condition = Condition::any().add(Column::Title.like(like_contains(pattern)));
            if !group_ids.is_empty() {
                condition = condition.add(Column::Id.is_in(group_ids));
            }
            select = select.filter(condition);
        }

        let paginator = select.order_by_asc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组列表失败: {e}")))?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut members = members_of(&self.db, &ids).await?;
        let groups = groups_with_advisors(&self.db, models).await?;

        Ok(GroupListResponse {
            items: groups
                .into_iter()
                .map(|group| GroupListItem {
                    members: members.remove(&group.id).unwrap_or_default(),
                    group,
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

    pub async fn get_group_by_id_impl(&self, id: i64) -> Result<Option<Group>> {
        let model = Groups::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?;
        match model {
            Some(m) => Ok(groups_with_advisors(&self.db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 小组详情：成员、三项评分及平均分、海报评价平均分
    pub async fn get_group_detail_impl(&self, id: i64) -> Result<Option<GroupDetailResponse>> {
        let Some(group) = self.get_group_by_id_impl(id).await? else {
            return Ok(None);
        };
        let members = members_of(&self.db, &[id]).await?.remove(&id).unwrap_or_default();
        let grades = grade_sheets_of(&self.db, &[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        let (poster_average, poster_evaluation_count) = poster_stats(&self.db, id).await?;

        Ok(Some(GroupDetailResponse {
            group,
            members,
            grades,
            poster_average,
            poster_evaluation_count,
        }))
    }

    pub async fn list_group_members_impl(&self, group_id: i64) -> Result<Vec<GroupMember>> {
        Ok(members_of(&self.db, &[group_id])
            .await?
            .remove(&group_id)
            .unwrap_or_default())
    }

    pub async fn find_unknown_rgms_impl(&self, rgms: &[String]) -> Result<Vec<String>> {
        let rgms = normalize_external_ids(rgms);
        let known = students_by_rgm(&self.db, &rgms).await?;
        Ok(rgms.into_iter().filter(|r| !known.contains_key(r)).collect())
    }

    /// 创建小组：插入、默认标题、指导关联与成员对账在同一事务中完成
    pub async fn create_group_impl(
        &self,
        req: GroupRequest,
    ) -> Result<GuardOutcome<GroupWriteResponse, MembershipConflict>> {
        let txn = self.begin().await?;
        ensure_advisor(&txn, req.advisor_id).await?;

        let model = insert_group(&txn, req.title, req.advisor_id).await?;
        sync_advisor_link(&txn, model.id, req.advisor_id).await?;

        let membership =
            match reconcile_in(&txn, model.id, &req.rgms, req.allow_reassignment).await? {
                GuardOutcome::Applied(result) => result,
                GuardOutcome::Conflicted(conflicts) => {
                    return Ok(GuardOutcome::Conflicted(conflicts));
                }
            };

        let group = groups_with_advisors(&txn, vec![model])
            .await?
            .pop()
            .ok_or_else(|| TgiSystemError::database_operation("创建小组后读取失败"))?;
        Self::commit(txn).await?;

        info!("创建小组 {} ({})，成员 {:?}", group.id, group.title, membership.added);
        Ok(GuardOutcome::Applied(GroupWriteResponse { group, membership }))
    }

    /// 整体更新小组：标题、指导教师与成员名单
    pub async fn update_group_impl(
        &self,
        id: i64,
        req: GroupRequest,
    ) -> Result<GuardOutcome<GroupWriteResponse, MembershipConflict>> {
        let txn = self.begin().await?;

        if Groups::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?
            .is_none()
        {
            return Err(TgiSystemError::not_found(format!("小组不存在: {id}")));
        }
        ensure_advisor(&txn, req.advisor_id).await?;

        let title = clean_title(req.title).unwrap_or_else(|| default_group_title(id));
        let model = ActiveModel {
            id: Set(id),
            title: Set(Some(title)),
            advisor_id: Set(req.advisor_id),
            updated_at: Set(now_ts()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| classify_db_error(e, "更新小组失败"))?;
        sync_advisor_link(&txn, id, req.advisor_id).await?;

        let membership = match reconcile_in(&txn, id, &req.rgms, req.allow_reassignment).await? {
            GuardOutcome::Applied(result) => result,
            GuardOutcome::Conflicted(conflicts) => return Ok(GuardOutcome::Conflicted(conflicts)),
        };

        let group = groups_with_advisors(&txn, vec![model])
            .await?
            .pop()
            .ok_or_else(|| TgiSystemError::database_operation("更新小组后读取失败"))?;
        Self::commit(txn).await?;

        Ok(GuardOutcome::Applied(GroupWriteResponse { group, membership }))
    }

    /// 删除小组及其全部从属记录
    pub async fn delete_group_impl(&self, id: i64) -> Result<bool> {
        let txn = self.begin().await?;

        GroupStudents::delete_many()
            .filter(MembershipColumn::GroupId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除小组成员失败"))?;
        GroupProfessors::delete_many()
            .filter(LinkColumn::GroupId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除小组教师关联失败"))?;
        GroupAssessments::delete_many()
            .filter(AssessmentColumn::GroupId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除小组评分失败"))?;
        BannerEvaluations::delete_many()
            .filter(EvaluationColumn::GroupId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除海报评价失败"))?;

        let result = Groups::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除小组失败"))?;
        if result.rows_affected == 0 {
            return Ok(false);
        }

        Self::commit(txn).await?;
        info!("删除小组 {}", id);
        Ok(true)
    }

    /// 教师指导的小组，附成员与三项评分
    pub async fn list_advised_groups_impl(&self, professor_id: i64) -> Result<Vec<AdvisedGroupItem>> {
        let models = Groups::find()
            .filter(Column::AdvisorId.eq(professor_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询指导小组失败: {e}")))?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut members = members_of(&self.db, &ids).await?;
        let mut sheets = grade_sheets_of(&self.db, &ids).await?;
        let groups = groups_with_advisors(&self.db, models).await?;

        Ok(groups
            .into_iter()
            .map(|group| AdvisedGroupItem {
                members: members.remove(&group.id).unwrap_or_default(),
                grades: sheets.remove(&group.id).unwrap_or_default(),
                group,
            })
            .collect())
    }
}
