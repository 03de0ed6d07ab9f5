pub mod create;
pub mod delete;
pub mod detail;
pub mod grades;
pub mod import;
pub mod list;
pub mod members;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::GradeFormRequest;
use crate::models::groups::entities::Group;
use crate::models::groups::membership::{MembershipConflict, normalize_external_ids};
use crate::models::groups::requests::{GroupListParams, GroupRequest, ReconcileMembersRequest};
use crate::models::groups::responses::MembershipConflictResponse;
use crate::models::imports::entities::normalize_cell;
use crate::models::imports::requests::ImportQuery;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;
use crate::utils::validate::validate_group_title;

pub struct GroupService {
    storage: Option<Arc<dyn Storage>>,
}

impl GroupService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_groups(
        &self,
        query: GroupListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_groups(self, query, request).await
    }

    pub async fn create_group(
        &self,
        body: GroupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_group(self, body, request).await
    }

    pub async fn get_group(&self, group_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        detail::get_group(self, group_id, request).await
    }

    pub async fn update_group(
        &self,
        group_id: i64,
        body: GroupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_group(self, group_id, body, request).await
    }

    pub async fn delete_group(
        &self,
        group_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_group(self, group_id, request).await
    }

    // 对齐成员名单
    pub async fn reconcile_members(
        &self,
        group_id: i64,
        body: ReconcileMembersRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::reconcile_members(self, group_id, body, request).await
    }

    pub async fn get_grades(&self, group_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        grades::get_grades(self, group_id, request).await
    }

    pub async fn save_grades(
        &self,
        group_id: i64,
        body: GradeFormRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grades::save_grades(self, group_id, body, request).await
    }

    pub async fn import_groups(
        &self,
        query: ImportQuery,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_groups(self, query, payload, request).await
    }
}

/// 管理员可以操作任意小组，教师只能操作自己指导的小组
pub(crate) fn can_manage_group(user: &User, group: &Group) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Professor => group.advisor_id == Some(user.id),
        UserRole::Guest => false,
    }
}

/// 读取小组并检查当前用户的权限，失败时直接给出响应
pub(crate) async fn load_group_for(
    storage: &Arc<dyn Storage>,
    user: &User,
    group_id: i64,
    request: &HttpRequest,
) -> Result<Group, HttpResponse> {
    let group = match storage.get_group_by_id(group_id).await {
        Ok(Some(group)) => group,
        Ok(None) => return Err(group_not_found()),
        Err(e) => return Err(error_response(request, &e)),
    };

    if can_manage_group(user, &group) {
        Ok(group)
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::GroupPermissionDenied,
            "You do not advise this group",
        )))
    }
}

pub(crate) fn group_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::GroupNotFound,
        "Group not found",
    ))
}

pub(crate) fn membership_conflict(conflicts: Vec<MembershipConflict>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error(
        ErrorCode::GroupMembershipConflict,
        MembershipConflictResponse { conflicts },
        "Some students already belong to another group",
    ))
}

/// 学号统一为大写
pub(crate) fn clean_rgms(raw: &[String]) -> Vec<String> {
    normalize_external_ids(
        &raw.iter()
            .map(|rgm| rgm.trim().to_uppercase())
            .collect::<Vec<_>>(),
    )
}

/// 规范化小组请求：空标题视为未设置
pub(crate) fn clean_group_request(mut body: GroupRequest) -> Result<GroupRequest, &'static str> {
    body.title = body
        .title
        .map(|t| normalize_cell(&t))
        .filter(|t| !t.is_empty());
    if let Some(ref title) = body.title {
        validate_group_title(title)?;
    }
    body.rgms = clean_rgms(&body.rgms);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: "x@example.com".to_string(),
            password_hash: String::new(),
            full_name: "X".to_string(),
            role,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn group(advisor: Option<i64>) -> Group {
        Group {
            id: 5,
            title: "Group 5".to_string(),
            advisor_id: advisor,
            advisor_name: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_group_access_by_role() {
        assert!(can_manage_group(&user(1, UserRole::Admin), &group(None)));
        assert!(can_manage_group(&user(7, UserRole::Professor), &group(Some(7))));
        assert!(!can_manage_group(&user(7, UserRole::Professor), &group(Some(8))));
        assert!(!can_manage_group(&user(7, UserRole::Professor), &group(None)));
        assert!(!can_manage_group(&user(7, UserRole::Guest), &group(Some(7))));
    }

    #[test]
    fn test_clean_group_request() {
        let body = clean_group_request(GroupRequest {
            title: Some("   ".to_string()),
            advisor_id: None,
            rgms: vec![" ab1 ".to_string(), "AB1".to_string(), "".to_string(), "2".to_string()],
            allow_reassignment: false,
        })
        .unwrap();
        assert!(body.title.is_none());
        assert_eq!(body.rgms, vec!["AB1".to_string(), "2".to_string()]);

        let too_long = GroupRequest {
            title: Some("x".repeat(300)),
            ..Default::default()
        };
        assert!(clean_group_request(too_long).is_err());
    }
}
