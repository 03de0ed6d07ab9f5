use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CampusService;
use crate::models::ApiResponse;
use crate::models::campuses::responses::CampusListResponse;
use crate::services::error_response;

pub async fn list_campuses(
    service: &CampusService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_campuses().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CampusListResponse { items },
            "Campus list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
