use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GroupService, clean_group_request, membership_conflict};
use crate::errors::TgiSystemError;
use crate::models::groups::requests::GroupRequest;
use crate::models::groups::responses::UnknownRgmsResponse;
use crate::models::{ApiResponse, ErrorCode, GuardOutcome};
use crate::services::error_response;

pub async fn create_group(
    service: &GroupService,
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

    // 新建小组时所有学号都必须存在
    match storage.find_unknown_rgms(&body.rgms).await {
        Ok(unknown_rgms) if !unknown_rgms.is_empty() => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::GroupUnknownRgm,
                UnknownRgmsResponse { unknown_rgms },
                "Some RGMs do not match any student",
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(error_response(request, &e)),
    }

    match storage.create_group(body).await {
        Ok(GuardOutcome::Applied(created)) => {
            info!(
                "Group {} created with {} members",
                created.group.id,
                created.membership.added.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Group created")))
        }
        Ok(GuardOutcome::Conflicted(conflicts)) => Ok(membership_conflict(conflicts)),
        Err(TgiSystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GroupAdvisorInvalid, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
