use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OfferingService;
use crate::models::ApiResponse;
use crate::models::offerings::requests::{OfferingListParams, OfferingListQuery};
use crate::services::error_response;

pub async fn list_offerings(
    service: &OfferingService,
    query: OfferingListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_offerings_with_pagination(OfferingListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Offering list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
