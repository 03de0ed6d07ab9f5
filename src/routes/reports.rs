use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::reports::requests::ReportQuery;
use crate::models::users::entities::UserRole;
use crate::services::ReportService;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn export_grades(
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.export_grades(query.into_inner(), &req).await
}

pub async fn export_groups(
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.export_groups(query.into_inner(), &req).await
}

// 导出范围在业务层按角色决定
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("/grades", web::get().to(export_grades))
                    .route("/groups", web::get().to(export_groups)),
            ),
    );
}
