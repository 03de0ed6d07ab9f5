use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::SubmitEvaluationRequest;
use crate::models::users::entities::UserRole;
use crate::services::EvaluationService;

static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

pub async fn list_pending(req: HttpRequest) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.list_pending(&req).await
}

pub async fn list_mine(req: HttpRequest) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.list_mine(&req).await
}

pub async fn submit_evaluation(
    req: HttpRequest,
    body: web::Json<SubmitEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .submit_evaluation(body.into_inner(), &req)
        .await
}

// 访客评审与教师
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::evaluator_roles()))
                    .route("", web::post().to(submit_evaluation))
                    .route("/pending", web::get().to(list_pending))
                    .route("/mine", web::get().to(list_mine)),
            ),
    );
}
