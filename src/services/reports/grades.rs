use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReportService;
use super::writer::{Table, attachment};
use crate::models::reports::entities::{GradeReportRow, report_file_name};
use crate::models::reports::requests::ReportQuery;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

// 管理员导出全部开课，教师只导出自己负责的开课
pub async fn export_grades(
    service: &ReportService,
    query: ReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let rows = match user.role {
        UserRole::Admin => storage.grade_report_rows(None).await,
        UserRole::Professor => match storage.list_offerings_by_professor(user.id, None).await {
            Ok(offerings) => {
                let ids: Vec<i64> = offerings.iter().map(|o| o.id).collect();
                storage.grade_report_rows(Some(ids.as_slice())).await
            }
            Err(e) => Err(e),
        },
        UserRole::Guest => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Reports are not available to guests",
            )));
        }
    };
    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => return Ok(error_response(request, &e)),
    };

    let table = Table {
        sheet_name: "Grades",
        header: GradeReportRow::HEADER.iter().map(|h| h.to_string()).collect(),
        records: rows.iter().map(GradeReportRow::to_record).collect(),
    };

    match table.render(query.format) {
        Ok(body) => {
            let file_name = report_file_name("grades", query.format, chrono::Utc::now());
            info!("User {} exported {} ({} rows)", user.id, file_name, rows.len());
            Ok(attachment(query.format, &file_name, body))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ExportFailed,
            format!("Failed to generate report: {}", e.message()),
        ))),
    }
}
