use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::models::ApiResponse;
use crate::models::groups::requests::{GroupListParams, GroupListQuery};
use crate::services::error_response;

pub async fn list_groups(
    service: &GroupService,
    query: GroupListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_groups_with_pagination(GroupListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Group list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
