use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, clean_new_student};
use crate::errors::TgiSystemError;
use crate::models::students::{requests::CreateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn create_student(
    service: &StudentService,
    body: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let body = match clean_new_student(body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentDataInvalid, msg)));
        }
    };

    let storage = service.get_storage(request)?;

    match storage.get_student_by_rgm(&body.rgm).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentRgmAlreadyExists,
                "A student with this RGM already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(request, &e)),
    }

    match storage.create_student(body).await {
        Ok(student) => Ok(HttpResponse::Created().json(ApiResponse::success(
            StudentResponse { student },
            "Student created",
        ))),
        Err(TgiSystemError::NotFound(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::CampusNotFound, "Campus not found"),
        )),
        Err(TgiSystemError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::StudentRgmAlreadyExists,
                "A student with this RGM already exists",
            ),
        )),
        Err(e) => Ok(error_response(request, &e)),
    }
}
