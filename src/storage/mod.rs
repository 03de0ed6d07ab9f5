use crate::errors::Result;
use crate::models::{
    GuardOutcome,
    campuses::entities::Campus,
    evaluations::{
        entities::PosterEvaluation,
        responses::{MyEvaluationItem, PendingEvaluationItem},
    },
    grades::{
        entities::{Assessment, GradeSheet, Instrument},
        requests::GradeFormRequest,
    },
    groups::{
        entities::{Group, GroupMember},
        membership::{MembershipConflict, ReconcileResult},
        requests::{GroupListQuery, GroupRequest},
        responses::{AdvisedGroupItem, GroupDetailResponse, GroupListResponse, GroupWriteResponse},
    },
    imports::{entities::ImportBatch, entities::ImportSummary, requests::ImportQuery},
    offerings::{
        entities::Offering,
        ownership::{OfferingConflict, OwnershipResult},
        requests::{OfferingListQuery, OfferingRequest},
        responses::OfferingListResponse,
    },
    reports::entities::{GradeReportRow, GroupRosterRow},
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

pub mod sea_orm_storage;

use std::sync::Arc;

/// 带守卫的写操作在冲突时不做任何修改，返回 `GuardOutcome::Conflicted`。
/// 写操作中目标不存在时返回 `TgiSystemError::NotFound`。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理
    // 创建用户（密码已哈希）；教师会在同一事务中同步负责的开课
    async fn create_user(
        &self,
        user: CreateUserRequest,
    ) -> Result<GuardOutcome<User, OfferingConflict>>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户（密码已哈希）
    async fn update_user(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<GuardOutcome<User, OfferingConflict>>;
    // 仍在指导小组的用户不可删除（Conflict）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn list_groups_advised_by(&self, user_id: i64) -> Result<Vec<Group>>;
    // 同步教师负责的开课
    async fn sync_professor_offerings(
        &self,
        professor_id: i64,
        offering_ids: &[i64],
        allow_reassignment: bool,
    ) -> Result<GuardOutcome<OwnershipResult, OfferingConflict>>;

    /// 校区
    async fn list_campuses(&self) -> Result<Vec<Campus>>;
    async fn get_campus_by_id(&self, id: i64) -> Result<Option<Campus>>;
    async fn create_campus(&self, name: &str) -> Result<Campus>;
    async fn update_campus(&self, id: i64, name: &str) -> Result<Option<Campus>>;
    async fn delete_campus(&self, id: i64) -> Result<bool>;

    /// 开课
    async fn list_offerings_with_pagination(
        &self,
        query: OfferingListQuery,
    ) -> Result<OfferingListResponse>;
    async fn list_offerings_by_professor(
        &self,
        professor_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Offering>>;
    async fn get_offering_by_id(&self, id: i64) -> Result<Option<Offering>>;
    async fn create_offering(&self, req: OfferingRequest) -> Result<Offering>;
    async fn update_offering(&self, id: i64, req: OfferingRequest) -> Result<Option<Offering>>;
    async fn delete_offering(&self, id: i64) -> Result<bool>;

    /// 学生
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_rgm(&self, rgm: &str) -> Result<Option<Student>>;
    // 开课按代码解析，不存在时自动创建
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn update_student(&self, id: i64, req: UpdateStudentRequest) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 小组
    async fn list_groups_with_pagination(&self, query: GroupListQuery) -> Result<GroupListResponse>;
    async fn get_group_by_id(&self, id: i64) -> Result<Option<Group>>;
    async fn get_group_detail(&self, id: i64) -> Result<Option<GroupDetailResponse>>;
    async fn list_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>>;
    // 返回系统中不存在的学号
    async fn find_unknown_rgms(&self, rgms: &[String]) -> Result<Vec<String>>;
    async fn create_group(
        &self,
        req: GroupRequest,
    ) -> Result<GuardOutcome<GroupWriteResponse, MembershipConflict>>;
    async fn update_group(
        &self,
        id: i64,
        req: GroupRequest,
    ) -> Result<GuardOutcome<GroupWriteResponse, MembershipConflict>>;
    // 连带删除成员关系、教师关联、评分与海报评价
    async fn delete_group(&self, id: i64) -> Result<bool>;
    // 将小组成员对齐到给定学号名单
    async fn reconcile_group_members(
        &self,
        group_id: i64,
        desired_rgms: &[String],
        allow_reassignment: bool,
    ) -> Result<GuardOutcome<ReconcileResult, MembershipConflict>>;
    async fn list_advised_groups(&self, professor_id: i64) -> Result<Vec<AdvisedGroupItem>>;

    /// 评分
    async fn upsert_assessment(
        &self,
        group_id: i64,
        instrument: Instrument,
        score: f64,
        entered_by: Option<i64>,
    ) -> Result<Assessment>;
    async fn get_assessment_score(
        &self,
        group_id: i64,
        instrument: Instrument,
    ) -> Result<Option<f64>>;
    async fn list_group_assessments(&self, group_id: i64) -> Result<Vec<Assessment>>;
    async fn get_grade_sheet(&self, group_id: i64) -> Result<GradeSheet>;
    // 三项评分在同一事务中写入
    async fn save_grade_form(
        &self,
        group_id: i64,
        form: GradeFormRequest,
        entered_by: i64,
    ) -> Result<GradeSheet>;

    /// 海报评价
    // exclude_advised：排除评价人自己指导的小组
    async fn list_pending_evaluations(
        &self,
        evaluator_id: i64,
        exclude_advised: bool,
    ) -> Result<Vec<PendingEvaluationItem>>;
    async fn list_my_evaluations(&self, evaluator_id: i64) -> Result<Vec<MyEvaluationItem>>;
    // 同一评价人对同一小组重复提交返回 Conflict
    async fn create_evaluation(
        &self,
        group_id: i64,
        evaluator_id: i64,
        score: f64,
        comments: Option<String>,
    ) -> Result<PosterEvaluation>;

    /// 批量导入
    async fn import_groups(&self, batch: &ImportBatch, options: ImportQuery)
    -> Result<ImportSummary>;

    /// 报表
    // offering_ids 为 None 时包含全部开课
    async fn grade_report_rows(&self, offering_ids: Option<&[i64]>) -> Result<Vec<GradeReportRow>>;
    // advisor_id 为 None 时包含全部小组
    async fn group_roster_rows(&self, advisor_id: Option<i64>) -> Result<Vec<GroupRosterRow>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
