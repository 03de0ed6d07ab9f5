use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CampusService, clean_campus_name};
use crate::errors::TgiSystemError;
use crate::models::campuses::{requests::CampusRequest, responses::CampusResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn update_campus(
    service: &CampusService,
    campus_id: i64,
    body: CampusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(name) = clean_campus_name(&body.name) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Campus name must have 1 to 100 characters",
        )));
    };

    let storage = service.get_storage(request)?;

    match storage.update_campus(campus_id, &name).await {
        Ok(Some(campus)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(CampusResponse { campus }, "Campus updated"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CampusNotFound,
            "Campus not found",
        ))),
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::CampusAlreadyExists, "Campus already exists"),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
