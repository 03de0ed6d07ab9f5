use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub professor_id: Option<i64>,
}

// 开课查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub professor_id: Option<i64>,
}

impl From<OfferingListParams> for OfferingListQuery {
    fn from(params: OfferingListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            professor_id: params.professor_id,
        }
    }
}

// 创建 / 更新开课。负责教师通过用户接口调整，这里不涉及。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingRequest {
    pub code: String,
    pub description: Option<String>,
}

// 教师查看自己负责的开课
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct MyOfferingsQuery {
    pub search: Option<String>,
}
