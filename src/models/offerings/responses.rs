use super::entities::Offering;
use crate::models::common::PaginationInfo;
use crate::models::reports::entities::GradeReportRow;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingResponse {
    pub offering: Offering,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingListResponse {
    pub items: Vec<Offering>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct MyOfferingsResponse {
    pub items: Vec<Offering>,
}

// 单个开课的成绩明细（每个学生一行）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingReportResponse {
    pub offering: Offering,
    pub rows: Vec<GradeReportRow>,
}
