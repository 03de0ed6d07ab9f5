use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GroupService, group_not_found, load_group_for};
use crate::errors::TgiSystemError;
use crate::models::grades::entities::Instrument;
use crate::models::grades::{requests::GradeFormRequest, responses::GradeFormResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn get_grades(
    service: &GroupService,
    group_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_group_for(&storage, &user, group_id, request).await {
        return Ok(resp);
    }

    match storage.get_grade_sheet(group_id).await {
        Ok(sheet) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeFormResponse::from_sheet(group_id, sheet),
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}

pub async fn save_grades(
    service: &GroupService,
    group_id: i64,
    body: GradeFormRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Some(paper) = body.paper
        && let Err(msg) = Instrument::Paper.validate_score(paper)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_group_for(&storage, &user, group_id, request).await {
        return Ok(resp);
    }

    match storage.save_grade_form(group_id, body, user.id).await {
        Ok(sheet) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeFormResponse::from_sheet(group_id, sheet),
            "Grades saved",
        ))),
        Err(TgiSystemError::NotFound(_)) => Ok(group_not_found()),
        Err(TgiSystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
