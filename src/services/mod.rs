pub mod auth;
pub mod campuses;
pub mod evaluations;
pub mod groups;
pub mod offerings;
pub mod professor;
pub mod reports;
pub mod students;
pub mod users;

pub use auth::AuthService;
pub use campuses::CampusService;
pub use evaluations::EvaluationService;
pub use groups::GroupService;
pub use offerings::OfferingService;
pub use professor::ProfessorService;
pub use reports::ReportService;
pub use students::StudentService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::TgiSystemError;
use crate::middlewares::{RequestId, RequireJWT};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app data 中取出存储实例
pub(crate) fn storage_from(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!(request_id = %RequestId::of(request), "Storage is not registered in app data");
            actix_web::error::ErrorInternalServerError("Storage not configured")
        })
}

fn generic_code(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::CONFLICT => ErrorCode::Conflict,
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        _ => ErrorCode::BadRequest,
    }
}

/// 业务错误原样返回；非预期错误记录日志，响应中只带请求 ID
pub(crate) fn error_response(request: &HttpRequest, err: &TgiSystemError) -> HttpResponse {
    let status = err.status_code();
    if status.is_client_error() {
        return HttpResponse::build(status)
            .json(ApiResponse::error_empty(generic_code(status), err.message()));
    }

    let request_id = RequestId::of(request);
    error!(
        request_id = %request_id,
        code = err.code(),
        "{} {} failed: {}",
        request.method(),
        request.path(),
        err.format_simple()
    );
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Internal server error (request id: {request_id})"),
    ))
}

/// 当前登录用户；RequireJWT 之后的路由一定存在
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_errors_pass_through() {
        let req = TestRequest::default().to_http_request();
        let resp = error_response(&req, &TgiSystemError::conflict("dup"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = error_response(&req, &TgiSystemError::not_found("Group 9"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = error_response(&req, &TgiSystemError::validation("bad"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unexpected_errors_become_500() {
        let req = TestRequest::default().to_http_request();
        let resp = error_response(&req, &TgiSystemError::database_operation("disk I/O"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_storage_is_an_error() {
        let req = TestRequest::default().to_http_request();
        assert!(storage_from(&req).is_err());
    }
}
