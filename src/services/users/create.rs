use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, hash_in_background};
use crate::models::{
    ApiResponse, ErrorCode, GuardOutcome,
    users::{
        requests::CreateUserRequest,
        responses::{OfferingConflictResponse, UserResponse},
    },
};
use crate::services::error_response;
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.email = user_data.email.trim().to_lowercase();
    user_data.full_name = user_data.full_name.trim().to_string();

    if let Err(msg) = validate_full_name(&user_data.full_name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "E-mail already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(request, &e)),
    }

    user_data.password = match hash_in_background(std::mem::take(&mut user_data.password)).await {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(request, &e)),
    };

    match storage.create_user(user_data).await {
        Ok(GuardOutcome::Applied(user)) => {
            info!("Created user {} ({})", user.email, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created")))
        }
        Ok(GuardOutcome::Conflicted(conflicts)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error(
                ErrorCode::OfferingOwnershipConflict,
                OfferingConflictResponse { conflicts },
                "Some offerings already belong to another professor",
            ),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
