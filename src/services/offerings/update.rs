use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{OfferingService, normalize_offering};
use crate::errors::TgiSystemError;
use crate::models::offerings::{requests::OfferingRequest, responses::OfferingResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn update_offering(
    service: &OfferingService,
    offering_id: i64,
    body: OfferingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let body = match normalize_offering(body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let storage = service.get_storage(request)?;

    match storage.update_offering(offering_id, body).await {
        Ok(Some(offering)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            OfferingResponse { offering },
            "Offering updated",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OfferingNotFound,
            "Offering not found",
        ))),
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::OfferingAlreadyExists, "Offering code already exists"),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
