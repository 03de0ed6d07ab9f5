pub mod create;
pub mod delete;
pub mod list;
pub mod mine;
pub mod report;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::offerings::entities::Offering;
use crate::models::offerings::requests::{MyOfferingsQuery, OfferingListParams, OfferingRequest};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::validate::validate_offering_code;

pub struct OfferingService {
    storage: Option<Arc<dyn Storage>>,
}

impl OfferingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_offerings(
        &self,
        query: OfferingListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_offerings(self, query, request).await
    }

    pub async fn create_offering(
        &self,
        body: OfferingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_offering(self, body, request).await
    }

    pub async fn update_offering(
        &self,
        offering_id: i64,
        body: OfferingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_offering(self, offering_id, body, request).await
    }

    pub async fn delete_offering(
        &self,
        offering_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_offering(self, offering_id, request).await
    }

    // 当前教师负责的开课
    pub async fn my_offerings(
        &self,
        query: MyOfferingsQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mine::my_offerings(self, query, request).await
    }

    // 单个开课的成绩明细
    pub async fn offering_report(
        &self,
        offering_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::offering_report(self, offering_id, request).await
    }
}

/// 规范化开课请求：代码去空白并转大写，空描述视为无
pub(crate) fn normalize_offering(mut body: OfferingRequest) -> Result<OfferingRequest, &'static str> {
    body.code = body.code.trim().to_uppercase();
    validate_offering_code(&body.code)?;
    body.description = body
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    Ok(body)
}

/// 管理员可以查看任意开课，教师只能查看自己负责的
pub(crate) fn can_view_offering(user: &User, offering: &Offering) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Professor => offering.professor_id == Some(user.id),
        UserRole::Guest => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: "x@example.com".to_string(),
            password_hash: String::new(),
            full_name: "X".to_string(),
            role,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn offering(owner: Option<i64>) -> Offering {
        Offering {
            id: 1,
            code: "TGI-A".to_string(),
            description: None,
            professor_id: owner,
            professor_name: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_offering_visibility() {
        assert!(can_view_offering(&user(1, UserRole::Admin), &offering(None)));
        assert!(can_view_offering(&user(2, UserRole::Professor), &offering(Some(2))));
        assert!(!can_view_offering(&user(2, UserRole::Professor), &offering(Some(3))));
        assert!(!can_view_offering(&user(2, UserRole::Guest), &offering(Some(2))));
    }

    #[test]
    fn test_normalize_offering() {
        let body = normalize_offering(OfferingRequest {
            code: " tgi-2025a ".to_string(),
            description: Some("   ".to_string()),
        })
        .unwrap();
        assert_eq!(body.code, "TGI-2025A");
        assert!(body.description.is_none());
    }
}
