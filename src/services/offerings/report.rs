use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{OfferingService, can_view_offering};
use crate::models::offerings::responses::OfferingReportResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn offering_report(
    service: &OfferingService,
    offering_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let offering = match storage.get_offering_by_id(offering_id).await {
        Ok(Some(offering)) => offering,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::OfferingNotFound,
                "Offering not found",
            )));
        }
        Err(e) => return Ok(error_response(request, &e)),
    };

    if !can_view_offering(&user, &offering) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::OfferingPermissionDenied,
            "You are not responsible for this offering",
        )));
    }

    match storage.grade_report_rows(Some(&[offering.id][..])).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            OfferingReportResponse { offering, rows },
            "Offering report retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
