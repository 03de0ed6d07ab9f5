use super::entities::User;
use crate::models::common::PaginationInfo;
use crate::models::groups::entities::Group;
use crate::models::offerings::ownership::OfferingConflict;
use serde::Serialize;
use ts_rs::TS;

// 用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserResponse {
    pub user: User,
}

// 用户列表项，附带其指导的小组数量
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub user: User,
    pub advised_groups: i64,
}

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListResponse {
    pub items: Vec<UserListItem>,
    pub pagination: PaginationInfo,
}

// 教师指导的小组
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserGroupsResponse {
    pub user: User,
    pub groups: Vec<Group>,
}

// 开课归属冲突（409 响应数据）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct OfferingConflictResponse {
    pub conflicts: Vec<OfferingConflict>,
}
