use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CampusService;
use crate::errors::TgiSystemError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn delete_campus(
    service: &CampusService,
    campus_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_campus(campus_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Campus deleted"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CampusNotFound,
            "Campus not found",
        ))),
        // 仍有学生属于该校区
        Err(TgiSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::CampusInUse, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
