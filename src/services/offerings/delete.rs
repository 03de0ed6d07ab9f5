use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OfferingService;
use crate::errors::TgiSystemError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn delete_offering(
    service: &OfferingService,
    offering_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_offering(offering_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Offering deleted"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OfferingNotFound,
            "Offering not found",
        ))),
        Err(TgiSystemError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::OfferingInUse, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
