use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::offerings::requests::MyOfferingsQuery;
use crate::models::users::entities::UserRole;
use crate::services::{OfferingService, ProfessorService};
use crate::utils::SafeIDI64;

static PROFESSOR_SERVICE: Lazy<ProfessorService> = Lazy::new(ProfessorService::new_lazy);
static OFFERING_SERVICE: Lazy<OfferingService> = Lazy::new(OfferingService::new_lazy);

pub async fn my_groups(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFESSOR_SERVICE.my_groups(&req).await
}

pub async fn my_group_detail(req: HttpRequest, group_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PROFESSOR_SERVICE.my_group_detail(group_id.0, &req).await
}

pub async fn my_offerings(
    req: HttpRequest,
    query: web::Query<MyOfferingsQuery>,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE.my_offerings(query.into_inner(), &req).await
}

pub async fn offering_report(
    req: HttpRequest,
    offering_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    OFFERING_SERVICE.offering_report(offering_id.0, &req).await
}

pub fn configure_professor_routes(cfg: &mut web::ServiceConfig) {
    let professor_only = || middlewares::RequireRole::new(&UserRole::Professor);

    cfg.service(
        web::scope("/api/v1/professor")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/groups").route(web::get().to(my_groups).wrap(professor_only())))
            .service(
                web::resource("/groups/{id}")
                    .route(web::get().to(my_group_detail).wrap(professor_only())),
            )
            .service(
                web::resource("/offerings")
                    .route(web::get().to(my_offerings).wrap(professor_only())),
            )
            // 管理员也可以查看任意开课的成绩明细
            .service(
                web::resource("/offerings/{id}").route(
                    web::get()
                        .to(offering_report)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            ),
    );
}
