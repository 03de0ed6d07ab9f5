use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GroupService, group_not_found};
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn get_group(
    service: &GroupService,
    group_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_group_detail(group_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Group retrieved successfully",
        ))),
        Ok(None) => Ok(group_not_found()),
        Err(e) => Ok(error_response(request, &e)),
    }
}
