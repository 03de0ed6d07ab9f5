use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReportService;
use super::writer::{Table, attachment};
use crate::config::AppConfig;
use crate::models::reports::entities::{GroupRosterRow, report_file_name, roster_member_columns};
use crate::models::reports::requests::ReportQuery;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

// 小组名单：管理员导出全部小组，教师只导出自己指导的
pub async fn export_groups(
    service: &ReportService,
    query: ReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let advisor = match user.role {
        UserRole::Admin => None,
        UserRole::Professor => Some(user.id),
        UserRole::Guest => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Reports are not available to guests",
            )));
        }
    };
    let storage = service.get_storage(request)?;

    let rows = match storage.group_roster_rows(advisor).await {
        Ok(rows) => rows,
        Err(e) => return Ok(error_response(request, &e)),
    };

    let columns = roster_member_columns(
        &rows,
        query.max,
        AppConfig::get().report.min_member_columns,
    );
    let table = Table {
        sheet_name: "Groups",
        header: GroupRosterRow::header(columns),
        records: rows.iter().map(|r| r.to_record(columns)).collect(),
    };

    match table.render(query.format) {
        Ok(body) => {
            let file_name = report_file_name("groups", query.format, chrono::Utc::now());
            info!("User {} exported {} ({} groups)", user.id, file_name, rows.len());
            Ok(attachment(query.format, &file_name, body))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ExportFailed,
            format!("Failed to generate report: {}", e.message()),
        ))),
    }
}
