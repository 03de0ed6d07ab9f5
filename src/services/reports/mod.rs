//! 报表导出（CSV / XLSX）

pub mod grades;
pub mod groups;
pub mod writer;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::reports::requests::ReportQuery;
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn export_grades(
        &self,
        query: ReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grades::export_grades(self, query, request).await
    }

    pub async fn export_groups(
        &self,
        query: ReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        groups::export_groups(self, query, request).await
    }
}
