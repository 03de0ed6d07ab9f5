pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::evaluations::requests::SubmitEvaluationRequest;
use crate::models::groups::entities::Group;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

/// 评语最大长度（字符）
const MAX_COMMENT_CHARS: usize = 2000;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_pending(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_pending(self, request).await
    }

    pub async fn list_mine(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_mine(self, request).await
    }

    pub async fn submit_evaluation(
        &self,
        body: SubmitEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_evaluation(self, body, request).await
    }
}

/// 教师不评价、也看不到自己指导的小组
pub(crate) fn excludes_advised(user: &User) -> bool {
    match user.role {
        UserRole::Professor => true,
        UserRole::Admin | UserRole::Guest => false,
    }
}

pub(crate) fn is_own_group(user: &User, group: &Group) -> bool {
    excludes_advised(user) && group.advisor_id == Some(user.id)
}

pub(crate) fn check_comments(comments: Option<&str>) -> Result<(), String> {
    match comments {
        Some(text) if text.chars().count() > MAX_COMMENT_CHARS => Err(format!(
            "Comments must be at most {MAX_COMMENT_CHARS} characters"
        )),
        _ => Ok(()),
    }
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
            id: 1,
            title: "Project #1".to_string(),
            advisor_id: advisor,
            advisor_name: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_professor_cannot_evaluate_own_group() {
        let professor = user(3, UserRole::Professor);
        assert!(is_own_group(&professor, &group(Some(3))));
        assert!(!is_own_group(&professor, &group(Some(4))));
        assert!(!is_own_group(&user(3, UserRole::Guest), &group(Some(3))));
    }

    #[test]
    fn test_comment_length() {
        assert!(check_comments(None).is_ok());
        assert!(check_comments(Some("ok")).is_ok());
        assert!(check_comments(Some(&"x".repeat(MAX_COMMENT_CHARS + 1))).is_err());
    }
}
