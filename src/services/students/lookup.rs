use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::imports::entities::normalize_cell;
use crate::models::students::{requests::StudentLookupQuery, responses::StudentLookupResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

// 未找到学生不是错误，返回 found=false
pub async fn lookup_student(
    service: &StudentService,
    query: StudentLookupQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let rgm = normalize_cell(&query.rgm).to_uppercase();
    if rgm.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "RGM is required",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_student_by_rgm(&rgm).await {
        Ok(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentLookupResponse::from_lookup(rgm, student),
            "Lookup completed",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
