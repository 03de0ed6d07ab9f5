use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::{entities::UserRole, responses::UserGroupsResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_user_groups(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(request, &e)),
    };

    if user.role != UserRole::Professor {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserNotProfessor,
            "Only professors advise groups",
        )));
    }

    match storage.list_groups_advised_by(user.id).await {
        Ok(groups) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserGroupsResponse { user, groups },
            "Advised groups retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
