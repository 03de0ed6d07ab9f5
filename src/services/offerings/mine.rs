use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OfferingService;
use crate::models::ApiResponse;
use crate::models::offerings::{requests::MyOfferingsQuery, responses::MyOfferingsResponse};
use crate::services::{current_user, error_response};

pub async fn my_offerings(
    service: &OfferingService,
    query: MyOfferingsQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    match storage.list_offerings_by_professor(user.id, search).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MyOfferingsResponse { items },
            "Offerings retrieved successfully",
        ))),
        Err(e) => Ok(error_response(request, &e)),
    }
}
