use super::entities::Campus;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "campus.ts")]
pub struct CampusResponse {
    pub campus: Campus,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "campus.ts")]
pub struct CampusListResponse {
    pub items: Vec<Campus>,
}
