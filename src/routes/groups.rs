use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::GradeFormRequest;
use crate::models::groups::requests::{GroupListParams, GroupRequest, ReconcileMembersRequest};
use crate::models::imports::requests::ImportQuery;
use crate::models::users::entities::UserRole;
use crate::services::GroupService;
use crate::utils::SafeIDI64;

static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);

pub async fn list_groups(
    req: HttpRequest,
    query: web::Query<GroupListParams>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_groups(query.into_inner(), &req).await
}

pub async fn create_group(
    req: HttpRequest,
    body: web::Json<GroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.create_group(body.into_inner(), &req).await
}

pub async fn import_groups(
    req: HttpRequest,
    query: web::Query<ImportQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .import_groups(query.into_inner(), payload, &req)
        .await
}

pub async fn get_group(req: HttpRequest, group_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.get_group(group_id.0, &req).await
}

pub async fn update_group(
    req: HttpRequest,
    group_id: SafeIDI64,
    body: web::Json<GroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .update_group(group_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_group(req: HttpRequest, group_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.delete_group(group_id.0, &req).await
}

pub async fn reconcile_members(
    req: HttpRequest,
    group_id: SafeIDI64,
    body: web::Json<ReconcileMembersRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .reconcile_members(group_id.0, body.into_inner(), &req)
        .await
}

pub async fn get_grades(req: HttpRequest, group_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.get_grades(group_id.0, &req).await
}

pub async fn save_grades(
    req: HttpRequest,
    group_id: SafeIDI64,
    body: web::Json<GradeFormRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .save_grades(group_id.0, body.into_inner(), &req)
        .await
}

pub fn configure_group_routes(cfg: &mut web::ServiceConfig) {
    let admin_only = || middlewares::RequireRole::new_any(UserRole::admin_roles());

    cfg.service(
        web::scope("/api/v1/groups")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_groups).wrap(admin_only()))
                    .route(web::post().to(create_group).wrap(admin_only())),
            )
            .service(
                web::resource("/import").route(web::post().to(import_groups).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_group).wrap(admin_only()))
                    .route(web::put().to(update_group).wrap(admin_only()))
                    .route(web::delete().to(delete_group).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}/members")
                    .route(web::put().to(reconcile_members).wrap(admin_only())),
            )
            // 教师只能评分自己指导的小组，在业务层检查
            .service(
                web::resource("/{id}/grades")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(get_grades))
                    .route(web::put().to(save_grades)),
            ),
    );
}
