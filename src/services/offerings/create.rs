use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{OfferingService, normalize_offering};
use crate::errors::TgiSystemError;
use crate::models::offerings::{requests::OfferingRequest, responses::OfferingResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn create_offering(
    service: &OfferingService,
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

    match storage.create_offering(body).await {
        Ok(offering) => Ok(HttpResponse::Created().json(ApiResponse::success(
            OfferingResponse { offering },
            "Offering created",
        ))),
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::OfferingAlreadyExists, "Offering code already exists"),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
