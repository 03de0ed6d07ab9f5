use super::entities::Student;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentResponse {
    pub student: Student,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

// 按学号查询结果，供前端编辑小组时即时校验
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentLookupResponse {
    pub rgm: String,
    pub found: bool,
    pub in_group: bool,
    pub group_id: Option<i64>,
    pub student: Option<Student>,
}

impl StudentLookupResponse {
    pub fn from_lookup(rgm: String, student: Option<Student>) -> Self {
        let group_id = student.as_ref().and_then(|s| s.group_id);
        Self {
            rgm,
            found: student.is_some(),
            in_group: group_id.is_some(),
            group_id,
            student,
        }
    }
}
