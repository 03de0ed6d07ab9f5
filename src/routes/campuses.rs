use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::campuses::requests::CampusRequest;
use crate::models::users::entities::UserRole;
use crate::services::CampusService;
use crate::utils::SafeIDI64;

static CAMPUS_SERVICE: Lazy<CampusService> = Lazy::new(CampusService::new_lazy);

pub async fn list_campuses(req: HttpRequest) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.list_campuses(&req).await
}

pub async fn create_campus(
    req: HttpRequest,
    body: web::Json<CampusRequest>,
) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.create_campus(body.into_inner(), &req).await
}

pub async fn update_campus(
    req: HttpRequest,
    campus_id: SafeIDI64,
    body: web::Json<CampusRequest>,
) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE
        .update_campus(campus_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_campus(req: HttpRequest, campus_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAMPUS_SERVICE.delete_campus(campus_id.0, &req).await
}

pub fn configure_campus_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/campuses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_campuses))
                    .route("", web::post().to(create_campus))
                    .route("/{id}", web::put().to(update_campus))
                    .route("/{id}", web::delete().to(delete_campus)),
            ),
    );
}
