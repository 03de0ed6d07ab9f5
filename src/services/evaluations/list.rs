use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EvaluationService, excludes_advised};
use crate::models::ApiResponse;
use crate::models::evaluations::responses::{MyEvaluationsResponse, PendingEvaluationsResponse};
use crate::services::{current_user, error_response};

pub async fn list_pending(
    service: &EvaluationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage
        .list_pending_evaluations(user.id, excludes_advised(&user))
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PendingEvaluationsResponse { items },
            "Pending evaluations retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}

pub async fn list_mine(
    service: &EvaluationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.list_my_evaluations(user.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MyEvaluationsResponse { items },
            "Evaluations retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
