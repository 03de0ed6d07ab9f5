use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GroupService, group_not_found};
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn delete_group(
    service: &GroupService,
    group_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_group(group_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Group deleted"))),
        Ok(false) => Ok(group_not_found()),
        Err(e) => Ok(error_response(request, &e)),
    }
}
