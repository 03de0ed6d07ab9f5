pub mod create;
pub mod delete;
pub mod get;
pub mod groups;
pub mod list;
pub mod offerings;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{
    CreateUserRequest, UpdateUserOfferingsRequest, UpdateUserRequest, UserListParams,
};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    // 教师指导的小组
    pub async fn list_user_groups(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        groups::list_user_groups(self, user_id, request).await
    }

    // 同步教师负责的开课
    pub async fn update_user_offerings(
        &self,
        user_id: i64,
        body: UpdateUserOfferingsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        offerings::update_user_offerings(self, user_id, body, request).await
    }
}

/// 密码哈希在阻塞线程池中执行
pub(crate) async fn hash_in_background(
    password: String,
) -> Result<String, crate::errors::TgiSystemError> {
    tokio::task::spawn_blocking(move || crate::utils::password::hash_password(&password))
        .await
        .map_err(|e| crate::errors::TgiSystemError::database_operation(format!("密码处理失败: {e}")))?
}
