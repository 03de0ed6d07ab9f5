use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::TgiSystemError;
use crate::models::{
    ApiResponse, ErrorCode, GuardOutcome,
    users::{requests::UpdateUserOfferingsRequest, responses::OfferingConflictResponse},
};
use crate::services::error_response;

pub async fn update_user_offerings(
    service: &UserService,
    user_id: i64,
    body: UpdateUserOfferingsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.role.can_advise() => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserNotProfessor,
                "Only professors can own offerings",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(request, &e)),
    }

    match storage
        .sync_professor_offerings(user_id, &body.offering_ids, body.allow_reassignment)
        .await
    {
        Ok(GuardOutcome::Applied(result)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Offerings updated successfully",
        ))),
        Ok(GuardOutcome::Conflicted(conflicts)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error(
                ErrorCode::OfferingOwnershipConflict,
                OfferingConflictResponse { conflicts },
                "Some offerings already belong to another professor",
            ),
        )),
        Err(TgiSystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::OfferingNotFound, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
