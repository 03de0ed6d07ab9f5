use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::offerings::requests::{OfferingListParams, OfferingRequest};
use crate::models::users::entities::UserRole;
use crate::services::OfferingService;
use crate::utils::SafeIDI64;

static OFFERING_SERVICE: Lazy<OfferingService> = Lazy::new(OfferingService::new_lazy);

pub async fn list_offerings(
    req: HttpRequest,
    query: web::Query<OfferingListParams>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE
        .list_offerings(query.into_inner(), &req)
        .await
}

pub async fn create_offering(
    req: HttpRequest,
    body: web::Json<OfferingRequest>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE
        .create_offering(body.into_inner(), &req)
        .await
}

pub async fn update_offering(
    req: HttpRequest,
    offering_id: SafeIDI64,
    body: web::Json<OfferingRequest>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE
        .update_offering(offering_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_offering(
    req: HttpRequest,
    offering_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE.delete_offering(offering_id.0, &req).await
}

pub fn configure_offering_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_offerings))
                    .route("", web::post().to(create_offering))
                    .route("/{id}", web::put().to(update_offering))
                    .route("/{id}", web::delete().to(delete_offering)),
            ),
    );
}
