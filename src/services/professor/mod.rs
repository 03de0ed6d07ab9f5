//! 教师工作区：自己指导的小组
//!
//! 负责的开课由 `OfferingService` 提供，这里只处理小组。

pub mod groups;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct ProfessorService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfessorService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn my_groups(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        groups::my_groups(self, request).await
    }

    pub async fn my_group_detail(
        &self,
        group_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        groups::my_group_detail(self, group_id, request).await
    }
}
