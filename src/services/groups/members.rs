use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GroupService, clean_rgms, group_not_found, membership_conflict};
use crate::errors::TgiSystemError;
use crate::models::groups::requests::ReconcileMembersRequest;
use crate::models::{ApiResponse, GuardOutcome};
use crate::services::error_response;

pub async fn reconcile_members(
    service: &GroupService,
    group_id: i64,
    body: ReconcileMembersRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let rgms = clean_rgms(&body.rgms);

    match storage
        .reconcile_group_members(group_id, &rgms, body.allow_reassignment)
        .await
    {
        Ok(GuardOutcome::Applied(result)) => {
            info!(
                "Group {} members reconciled: +{} -{} moved {}",
                group_id,
                result.added.len(),
                result.removed.len(),
                result.conflicts_resolved.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Members updated")))
        }
        Ok(GuardOutcome::Conflicted(conflicts)) => Ok(membership_conflict(conflicts)),
        Err(TgiSystemError::NotFound(_)) => Ok(group_not_found()),
        Err(e) => Ok(error_response(request, &e)),
    }
}
