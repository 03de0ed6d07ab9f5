use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::UpdateAccountRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode, GuardOutcome};
use crate::services::{current_user, error_response};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

use super::AuthService;

fn bad_request(code: ErrorCode, msg: impl Into<String>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)))
}

pub async fn handle_update_account(
    service: &AuthService,
    update_data: UpdateAccountRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current_user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let full_name = update_data.full_name.map(|n| n.trim().to_string());
    if let Some(ref name) = full_name
        && let Err(msg) = validate_full_name(name)
    {
        return bad_request(ErrorCode::UserNameInvalid, msg);
    }

    let email = update_data.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return bad_request(ErrorCode::UserEmailInvalid, msg);
        }
        // 邮箱不能被其他用户占用
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != current_user.id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "E-mail is already in use",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(request, &e)),
        }
    }

    // 修改密码必须提供当前密码
    let password = match update_data.new_password {
        Some(new_password) => {
            let confirmed = update_data
                .current_password
                .as_deref()
                .is_some_and(|p| verify_password(p, &current_user.password_hash));
            if !confirmed {
                return bad_request(
                    ErrorCode::CurrentPasswordInvalid,
                    "Current password is incorrect",
                );
            }
            if let Err(msg) = validate_password_simple(&new_password) {
                return bad_request(ErrorCode::UserPasswordInvalid, msg);
            }
            match hash_password(&new_password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(error_response(request, &e)),
            }
        }
        None => None,
    };

    // 角色、状态与开课不能由本人修改
    let update = UpdateUserRequest {
        email,
        full_name,
        password,
        ..Default::default()
    };

    match storage.update_user(current_user.id, update).await {
        Ok(GuardOutcome::Applied(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Account updated successfully",
        ))),
        Ok(GuardOutcome::Conflicted(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::OfferingOwnershipConflict, "Offering conflict"),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
