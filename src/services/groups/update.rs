use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GroupService, clean_group_request, group_not_found, membership_conflict};
use crate::errors::TgiSystemError;
use crate::models::groups::requests::GroupRequest;
use crate::models::{ApiResponse, ErrorCode, GuardOutcome};
use crate::services::error_response;

// 整体替换；未知学号记入 membership.unresolved，不阻止其余修改
pub async fn update_group(
    service: &GroupService,
    group_id: i64,
    body: GroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let body = match clean_group_request(body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GroupDataInvalid, msg)));
        }
    };

    let storage = service.get_storage(request)?;

    match storage.update_group(group_id, body).await {
        Ok(GuardOutcome::Applied(updated)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Group updated")))
        }
        Ok(GuardOutcome::Conflicted(conflicts)) => Ok(membership_conflict(conflicts)),
        Err(TgiSystemError::NotFound(_)) => Ok(group_not_found()),
        Err(TgiSystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GroupAdvisorInvalid, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
