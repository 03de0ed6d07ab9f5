use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub campus_id: Option<i64>,
    pub offering_id: Option<i64>,
}

// 学生查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub campus_id: Option<i64>,
    pub offering_id: Option<i64>,
}

impl From<StudentListParams> for StudentListQuery {
    fn from(params: StudentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            campus_id: params.campus_id,
            offering_id: params.offering_id,
        }
    }
}

// 创建学生；开课按代码查找，不存在时自动创建
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub rgm: String,
    pub name: String,
    pub campus_id: i64,
    pub offering_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub rgm: Option<String>,
    pub name: Option<String>,
    pub campus_id: Option<i64>,
    pub offering_code: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentLookupQuery {
    pub rgm: String,
}
