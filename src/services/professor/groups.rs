use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfessorService;
use crate::models::ApiResponse;
use crate::models::groups::responses::AdvisedGroupListResponse;
use crate::services::groups::{group_not_found, load_group_for};
use crate::services::{current_user, error_response};

pub async fn my_groups(
    service: &ProfessorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.list_advised_groups(user.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdvisedGroupListResponse { items },
            "Groups retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}

// 非指导教师返回 403
pub async fn my_group_detail(
    service: &ProfessorService,
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

    match storage.get_group_detail(group_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Group retrieved successfully",
        ))),
        Ok(None) => Ok(group_not_found()),
        Err(e) => Ok(error_response(request, &e)),
    }
}
