pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::campuses::requests::CampusRequest;
use crate::storage::Storage;

pub struct CampusService {
    storage: Option<Arc<dyn Storage>>,
}

impl CampusService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_campuses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_campuses(self, request).await
    }

    pub async fn create_campus(
        &self,
        body: CampusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_campus(self, body, request).await
    }

    pub async fn update_campus(
        &self,
        campus_id: i64,
        body: CampusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_campus(self, campus_id, body, request).await
    }

    pub async fn delete_campus(
        &self,
        campus_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_campus(self, campus_id, request).await
    }
}

/// 校区名去除首尾空白后不能为空
pub(crate) fn clean_campus_name(raw: &str) -> Option<String> {
    let name = crate::models::imports::entities::normalize_cell(raw);
    (!name.is_empty() && name.chars().count() <= 100).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_campus_name() {
        assert_eq!(clean_campus_name("  Limeira   Centro "), Some("Limeira Centro".to_string()));
        assert_eq!(clean_campus_name("   "), None);
        assert_eq!(clean_campus_name(&"x".repeat(101)), None);
    }
}
