use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CampusService, clean_campus_name};
use crate::errors::TgiSystemError;
use crate::models::campuses::{requests::CampusRequest, responses::CampusResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn create_campus(
    service: &CampusService,
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

    match storage.create_campus(&name).await {
        Ok(campus) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(CampusResponse { campus }, "Campus created"))),
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::CampusAlreadyExists, "Campus already exists"),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
