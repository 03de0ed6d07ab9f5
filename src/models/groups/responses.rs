use super::entities::{Group, GroupMember};
use super::membership::{MembershipConflict, ReconcileResult};
use crate::models::common::PaginationInfo;
use crate::models::grades::entities::GradeSheet;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub group: Group,
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupListResponse {
    pub items: Vec<GroupListItem>,
    pub pagination: PaginationInfo,
}

// 小组详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupDetailResponse {
    pub group: Group,
    /// 按姓名排序
    pub members: Vec<GroupMember>,
    pub grades: GradeSheet,
    /// 海报评价平均分
    pub poster_average: Option<f64>,
    pub poster_evaluation_count: i64,
}

// 创建 / 更新小组结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupWriteResponse {
    pub group: Group,
    pub membership: ReconcileResult,
}

// 成员冲突（409 响应数据）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct MembershipConflictResponse {
    pub conflicts: Vec<MembershipConflict>,
}

// 创建小组时存在未知学号（400 响应数据）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct UnknownRgmsResponse {
    pub unknown_rgms: Vec<String>,
}

// 教师视角的小组概要（含三项评分）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct AdvisedGroupItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub group: Group,
    pub members: Vec<GroupMember>,
    pub grades: GradeSheet,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct AdvisedGroupListResponse {
    pub items: Vec<AdvisedGroupItem>,
}
