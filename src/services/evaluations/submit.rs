use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EvaluationService, check_comments, is_own_group};
use crate::errors::TgiSystemError;
use crate::models::evaluations::{
    requests::SubmitEvaluationRequest, responses::EvaluationResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::groups::group_not_found;
use crate::services::{current_user, error_response};

pub async fn submit_evaluation(
    service: &EvaluationService,
    body: SubmitEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = body
        .items
        .validate()
        .and_then(|_| check_comments(body.comments.as_deref()))
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::EvaluationInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    let group = match storage.get_group_by_id(body.group_id).await {
        Ok(Some(group)) => group,
        Ok(None) => return Ok(group_not_found()),
        Err(e) => return Ok(error_response(request, &e)),
    };
    if is_own_group(&user, &group) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationOwnGroup,
            "You cannot evaluate a group you advise",
        )));
    }

    let score = body.items.average();
    match storage
        .create_evaluation(group.id, user.id, score, body.comments)
        .await
    {
        Ok(evaluation) => {
            info!(
                "User {} evaluated group {} with score {:.2}",
                user.id, group.id, evaluation.score
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                EvaluationResponse { evaluation },
                "Evaluation submitted",
            )))
        }
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::EvaluationAlreadyExists,
                "You have already evaluated this group",
            ),
        )),
        Err(TgiSystemError::NotFound(_)) => Ok(group_not_found()),
        Err(TgiSystemError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::EvaluationInvalid, msg))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
