use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, hash_in_background};
use crate::errors::TgiSystemError;
use crate::models::{
    ApiResponse, ErrorCode, GuardOutcome,
    users::{
        requests::UpdateUserRequest,
        responses::{OfferingConflictResponse, UserResponse},
    },
};
use crate::services::error_response;
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    update_data.email = update_data.email.map(|e| e.trim().to_lowercase());
    update_data.full_name = update_data.full_name.map(|n| n.trim().to_string());

    if let Some(ref name) = update_data.full_name
        && let Err(msg) = validate_full_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Some(ref email) = update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
        }
        match hash_in_background(password).await {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(error_response(request, &e)),
        }
    }

    let storage = service.get_storage(request)?;

    match storage.update_user(user_id, update_data).await {
        Ok(GuardOutcome::Applied(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User information updated successfully",
        ))),
        Ok(GuardOutcome::Conflicted(conflicts)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error(
                ErrorCode::OfferingOwnershipConflict,
                OfferingConflictResponse { conflicts },
                "Some offerings already belong to another professor",
            ),
        )),
        Err(TgiSystemError::NotFound(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"),
        )),
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "E-mail already exists"),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
