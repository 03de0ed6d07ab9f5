//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 多行写操作在单个 `DatabaseTransaction` 中完成，出错或被守卫拒绝时事务随 drop 回滚。

mod campuses;
mod evaluations;
mod grades;
mod groups;
mod imports;
mod membership;
mod offerings;
mod reports;
mod students;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, TgiSystemError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 当前 Unix 时间戳（秒）
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::from_url(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 按给定 URL 创建存储实例并执行迁移
    pub async fn from_url(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（文件库使用 WAL；内存库保持单一常驻连接）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TgiSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        opt = if in_memory {
            opt.journal_mode(SqliteJournalMode::Memory)
        } else {
            opt.journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("wal_autocheckpoint", "1000")
        };

        let (max_connections, idle_timeout) = if in_memory {
            (1, None)
        } else {
            (pool_size.max(1), Some(Duration::from_secs(300)))
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(idle_timeout)
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(opt)
            .await
            .map_err(|e| TgiSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TgiSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TgiSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    pub(crate) async fn begin(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("开启事务失败: {e}")))
    }

    pub(crate) async fn commit(txn: DatabaseTransaction) -> Result<()> {
        txn.commit()
            .await
            .map_err(|e| crate::errors::classify_db_error(e, "提交事务失败"))
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(
        &self,
        user: CreateUserRequest,
    ) -> Result<GuardOutcome<User, OfferingConflict>> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<GuardOutcome<User, OfferingConflict>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn list_groups_advised_by(&self, user_id: i64) -> Result<Vec<Group>> {
        self.list_groups_advised_by_impl(user_id).await
    }

    async fn sync_professor_offerings(
        &self,
        professor_id: i64,
        offering_ids: &[i64],
        allow_reassignment: bool,
    ) -> Result<GuardOutcome<OwnershipResult, OfferingConflict>> {
        self.sync_professor_offerings_impl(professor_id, offering_ids, allow_reassignment)
            .await
    }

    // 校区模块
    async fn list_campuses(&self) -> Result<Vec<Campus>> {
        self.list_campuses_impl().await
    }

    async fn get_campus_by_id(&self, id: i64) -> Result<Option<Campus>> {
        self.get_campus_by_id_impl(id).await
    }

    async fn create_campus(&self, name: &str) -> Result<Campus> {
        self.create_campus_impl(name).await
    }

    async fn update_campus(&self, id: i64, name: &str) -> Result<Option<Campus>> {
        self.update_campus_impl(id, name).await
    }

    async fn delete_campus(&self, id: i64) -> Result<bool> {
        self.delete_campus_impl(id).await
    }

    // 开课模块
    async fn list_offerings_with_pagination(
        &self,
        query: OfferingListQuery,
    ) -> Result<OfferingListResponse> {
        self.list_offerings_with_pagination_impl(query).await
    }

    async fn list_offerings_by_professor(
        &self,
        professor_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Offering>> {
        self.list_offerings_by_professor_impl(professor_id, search)
            .await
    }

    async fn get_offering_by_id(&self, id: i64) -> Result<Option<Offering>> {
        self.get_offering_by_id_impl(id).await
    }

    async fn create_offering(&self, req: OfferingRequest) -> Result<Offering> {
        self.create_offering_impl(req).await
    }

    async fn update_offering(&self, id: i64, req: OfferingRequest) -> Result<Option<Offering>> {
        self.update_offering_impl(id, req).await
    }

    async fn delete_offering(&self, id: i64) -> Result<bool> {
        self.delete_offering_impl(id).await
    }

    // 学生模块
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_rgm(&self, rgm: &str) -> Result<Option<Student>> {
        self.get_student_by_rgm_impl(rgm).await
    }

    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn update_student(&self, id: i64, req: UpdateStudentRequest) -> Result<Option<Student>> {
        self.update_student_impl(id, req).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 小组模块
    async fn list_groups_with_pagination(&self, query: GroupListQuery) -> Result<GroupListResponse> {
        self.list_groups_with_pagination_impl(query).await
    }

    async fn get_group_by_id(&self, id: i64) -> Result<Option<Group>> {
        self.get_group_by_id_impl(id).await
    }

    async fn get_group_detail(&self, id: i64) -> Result<Option<GroupDetailResponse>> {
        self.get_group_detail_impl(id).await
    }

    async fn list_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>> {
        self.list_group_members_impl(group_id).await
    }

    async fn find_unknown_rgms(&self, rgms: &[String]) -> Result<Vec<String>> {
        self.find_unknown_rgms_impl(rgms).await
    }

    async fn create_group(
        &self,
        req: GroupRequest,
    ) -> Result<GuardOutcome<GroupWriteResponse, MembershipConflict>> {
        self.create_group_impl(req).await
    }

    async fn update_group(
        &self,
        id: i64,
        req: GroupRequest,
    ) -> Result<GuardOutcome<GroupWriteResponse, MembershipConflict>> {
        self.update_group_impl(id, req).await
    }

    async fn delete_group(&self, id: i64) -> Result<bool> {
        self.delete_group_impl(id).await
    }

    async fn reconcile_group_members(
        &self,
        group_id: i64,
        desired_rgms: &[String],
        allow_reassignment: bool,
    ) -> Result<GuardOutcome<ReconcileResult, MembershipConflict>> {
        self.reconcile_group_members_impl(group_id, desired_rgms, allow_reassignment)
            .await
    }

    async fn list_advised_groups(&self, professor_id: i64) -> Result<Vec<AdvisedGroupItem>> {
        self.list_advised_groups_impl(professor_id).await
    }

    // 评分模块
    async fn upsert_assessment(
        &self,
        group_id: i64,
        instrument: Instrument,
        score: f64,
        entered_by: Option<i64>,
    ) -> Result<Assessment> {
        self.upsert_assessment_impl(group_id, instrument, score, entered_by)
            .await
    }

    async fn get_assessment_score(
        &self,
        group_id: i64,
        instrument: Instrument,
    ) -> Result<Option<f64>> {
        self.get_assessment_score_impl(group_id, instrument).await
    }

    async fn list_group_assessments(&self, group_id: i64) -> Result<Vec<Assessment>> {
        self.list_group_assessments_impl(group_id).await
    }

    async fn get_grade_sheet(&self, group_id: i64) -> Result<GradeSheet> {
        self.get_grade_sheet_impl(group_id).await
    }

    async fn save_grade_form(
        &self,
        group_id: i64,
        form: GradeFormRequest,
        entered_by: i64,
    ) -> Result<GradeSheet> {
        self.save_grade_form_impl(group_id, form, entered_by).await
    }

    // 海报评价模块
    async fn list_pending_evaluations(
        &self,
        evaluator_id: i64,
        exclude_advised: bool,
    ) -> Result<Vec<PendingEvaluationItem>> {
        self.list_pending_evaluations_impl(evaluator_id, exclude_advised)
            .await
    }

    async fn list_my_evaluations(&self, evaluator_id: i64) -> Result<Vec<MyEvaluationItem>> {
        self.list_my_evaluations_impl(evaluator_id).await
    }

    async fn create_evaluation(
        &self,
        group_id: i64,
        evaluator_id: i64,
        score: f64,
        comments: Option<String>,
    ) -> Result<PosterEvaluation> {
        self.create_evaluation_impl(group_id, evaluator_id, score, comments)
            .await
    }

    // 导入模块
    async fn import_groups(
        &self,
        batch: &ImportBatch,
        options: ImportQuery,
    ) -> Result<ImportSummary> {
        self.import_groups_impl(batch, options).await
    }

    // 报表模块
    async fn grade_report_rows(&self, offering_ids: Option<&[i64]>) -> Result<Vec<GradeReportRow>> {
        self.grade_report_rows_impl(offering_ids).await
    }

    async fn group_roster_rows(&self, advisor_id: Option<i64>) -> Result<Vec<GroupRosterRow>> {
        self.group_roster_rows_impl(advisor_id).await
    }
}
