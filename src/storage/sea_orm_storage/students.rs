use super::offerings::find_or_create_offering;
use super::{SeaOrmStorage, now_ts};
use crate::entity::campuses::{Column as CampusColumn, Entity as Campuses};
use crate::entity::group_students::{Column as MembershipColumn, Entity as GroupStudents};
use crate::entity::offerings::{Column as OfferingColumn, Entity as Offerings};
use crate::entity::students::{ActiveModel, Column, Entity as Students, Model};
use crate::errors::{Result, TgiSystemError, classify_db_error};
use crate::models::{
    PaginationInfo,
    common::pagination::page_window,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::info;

/// 按学号批量查询学生
pub(super) async fn students_by_rgm<C: ConnectionTrait>(
    conn: &C,
    rgms: &[String],
) -> Result<HashMap<String, Model>> {
    if rgms.is_empty() {
        return Ok(HashMap::new());
    }
    let students = Students::find()
        .filter(Column::Rgm.is_in(rgms.to_vec()))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("按学号查询学生失败: {e}")))?;
    Ok(students.into_iter().map(|s| (s.rgm.clone(), s)).collect())
}

/// 学生当前所在小组（学生 -> 小组）
pub(super) async fn memberships_of<C: ConnectionTrait>(
    conn: &C,
    student_ids: &[i64],
) -> Result<HashMap<i64, i64>> {
    if student_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = GroupStudents::find()
        .filter(MembershipColumn::StudentId.is_in(student_ids.to_vec()))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询小组成员关系失败: {e}")))?;
    Ok(rows.into_iter().map(|r| (r.student_id, r.group_id)).collect())
}

/// 校区名与开课代码
pub(super) async fn campus_and_offering_labels<C: ConnectionTrait>(
    conn: &C,
    models: &[Model],
) -> Result<(HashMap<i64, String>, HashMap<i64, String>)> {
    if models.is_empty() {
        return Ok((HashMap::new(), HashMap::new()));
    }
    let campus_ids: Vec<i64> = models.iter().map(|m| m.campus_id).collect();
    let offering_ids: Vec<i64> = models.iter().map(|m| m.offering_id).collect();

    let campuses = Campuses::find()
        .filter(CampusColumn::Id.is_in(campus_ids))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询校区失败: {e}")))?;
    let offerings = Offerings::find()
        .filter(OfferingColumn::Id.is_in(offering_ids))
        .all(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询开课失败: {e}")))?;

    Ok((
        campuses.into_iter().map(|c| (c.id, c.name)).collect(),
        offerings.into_iter().map(|o| (o.id, o.code)).collect(),
    ))
}

async fn hydrate<C: ConnectionTrait>(conn: &C, models: Vec<Model>) -> Result<Vec<Student>> {
    let (campuses, offerings) = campus_and_offering_labels(conn, &models).await?;
    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
    let groups = memberships_of(conn, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let campus = campuses.get(&m.campus_id).cloned();
            let offering = offerings.get(&m.offering_id).cloned();
            let group = groups.get(&m.id).copied();
            m.into_student(campus, offering, group)
        })
        .collect())
}

async fn ensure_campus<C: ConnectionTrait>(conn: &C, campus_id: i64) -> Result<()> {
    let exists = Campuses::find_by_id(campus_id)
        .one(conn)
        .await
        .map_err(|e| TgiSystemError::database_operation(format!("查询校区失败: {e}")))?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(TgiSystemError::not_found(format!("校区不存在: {campus_id}")))
    }
}

impl SeaOrmStorage {
    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Students::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(like_contains(pattern)))
                    .add(Column::Rgm.like(like_contains(pattern))),
            );
        }
        if let Some(campus_id) = query.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(offering_id) = query.offering_id {
            select = select.filter(Column::OfferingId.eq(offering_id));
        }

        let paginator = select
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Rgm)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询学生页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: hydrate(&self.db, models).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let model = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询学生失败: {e}")))?;
        match model {
            Some(m) => Ok(hydrate(&self.db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_student_by_rgm_impl(&self, rgm: &str) -> Result<Option<Student>> {
        let model = Students::find()
            .filter(Column::Rgm.eq(rgm))
            .one(&self.db)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("按学号查询学生失败: {e}")))?;
        match model {
            Some(m) => Ok(hydrate(&self.db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 创建学生，开课不存在时按代码创建
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let txn = self.begin().await?;
        ensure_campus(&txn, req.campus_id).await?;
        let offering_id = find_or_create_offering(&txn, &req.offering_code).await?;

        let now = now_ts();
        let model = ActiveModel {
            rgm: Set(req.rgm),
            name: Set(req.name),
            campus_id: Set(req.campus_id),
            offering_id: Set(offering_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| classify_db_error(e, "创建学生失败"))?;

        let student = hydrate(&txn, vec![model]).await?.pop();
        Self::commit(txn).await?;
        student.ok_or_else(|| TgiSystemError::database_operation("创建学生后读取失败"))
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        req: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let txn = self.begin().await?;
        if Students::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询学生失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(rgm) = req.rgm {
            model.rgm = Set(rgm);
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(campus_id) = req.campus_id {
            ensure_campus(&txn, campus_id).await?;
            model.campus_id = Set(campus_id);
        }
        if let Some(ref code) = req.offering_code {
            model.offering_id = Set(find_or_create_offering(&txn, code).await?);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| classify_db_error(e, "更新学生失败"))?;
        let student = hydrate(&txn, vec![updated]).await?.pop();
        Self::commit(txn).await?;
        Ok(student)
    }

    /// 删除学生，同一事务中移除其小组成员关系
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let txn = self.begin().await?;

        let memberships = GroupStudents::delete_many()
            .filter(MembershipColumn::StudentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除学生成员关系失败"))?;

        let result = Students::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error(e, "删除学生失败"))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        Self::commit(txn).await?;
        info!(
            "删除学生 {}，移除成员关系 {} 条",
            id, memberships.rows_affected
        );
        Ok(true)
    }
}
