use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, clean_student_update};
use crate::errors::TgiSystemError;
use crate::models::students::{requests::UpdateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    body: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let body = match clean_student_update(body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentDataInvalid, msg)));
        }
    };

    let storage = service.get_storage(request)?;

    // 学号改动时不能与其他学生重复
    if let Some(ref rgm) = body.rgm {
        match storage.get_student_by_rgm(rgm).await {
            Ok(Some(other)) if other.id != student_id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::StudentRgmAlreadyExists,
                    "A student with this RGM already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(request, &e)),
        }
    }

    match storage.update_student(student_id, body).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { student },
            "Student updated",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
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
