use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub advisor_id: Option<i64>,
    /// 按小组标题、成员姓名或学号搜索
    pub search: Option<String>,
}

// 小组查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub advisor_id: Option<i64>,
    pub search: Option<String>,
}

impl From<GroupListParams> for GroupListQuery {
    fn from(params: GroupListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            advisor_id: params.advisor_id,
            search: params.search,
        }
    }
}

// 创建小组 / 整体替换小组（标题、指导教师、成员名单）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupRequest {
    /// 为空时使用 "Project #<id>"
    pub title: Option<String>,
    pub advisor_id: Option<i64>,
    #[serde(default)]
    pub rgms: Vec<String>,
    #[serde(default)]
    pub allow_reassignment: bool,
}

// 只调整成员名单
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct ReconcileMembersRequest {
    pub rgms: Vec<String>,
    #[serde(default)]
    pub allow_reassignment: bool,
}
