pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod lookup;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::imports::entities::normalize_cell;
use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, StudentLookupQuery, UpdateStudentRequest,
};
use crate::storage::Storage;
use crate::utils::validate::{validate_full_name, validate_offering_code, validate_rgm};

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        body: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, body, request).await
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        body: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, body, request).await
    }

    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }

    pub async fn lookup_student(
        &self,
        query: StudentLookupQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lookup::lookup_student(self, query, request).await
    }
}

/// 规范化新建学生请求；学号、开课代码统一转大写
pub(crate) fn clean_new_student(
    mut body: CreateStudentRequest,
) -> Result<CreateStudentRequest, &'static str> {
    body.rgm = normalize_cell(&body.rgm).to_uppercase();
    body.name = normalize_cell(&body.name);
    body.offering_code = body.offering_code.trim().to_uppercase();

    validate_rgm(&body.rgm)?;
    validate_full_name(&body.name)?;
    validate_offering_code(&body.offering_code)?;
    Ok(body)
}

pub(crate) fn clean_student_update(
    mut body: UpdateStudentRequest,
) -> Result<UpdateStudentRequest, &'static str> {
    if let Some(rgm) = body.rgm.take() {
        let rgm = normalize_cell(&rgm).to_uppercase();
        validate_rgm(&rgm)?;
        body.rgm = Some(rgm);
    }
    if let Some(name) = body.name.take() {
        let name = normalize_cell(&name);
        validate_full_name(&name)?;
        body.name = Some(name);
    }
    if let Some(code) = body.offering_code.take() {
        let code = code.trim().to_uppercase();
        validate_offering_code(&code)?;
        body.offering_code = Some(code);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_student_is_normalized() {
        let body = clean_new_student(CreateStudentRequest {
            rgm: " ab12 ".to_string(),
            name: "  Maria   Silva ".to_string(),
            campus_id: 1,
            offering_code: "tgi-a".to_string(),
        })
        .unwrap();
        assert_eq!(body.rgm, "AB12");
        assert_eq!(body.name, "Maria Silva");
        assert_eq!(body.offering_code, "TGI-A");
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = clean_new_student(CreateStudentRequest {
            rgm: "1".to_string(),
            name: "   ".to_string(),
            campus_id: 1,
            offering_code: "TGI".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_update_only_touches_given_fields() {
        let body = clean_student_update(UpdateStudentRequest {
            name: Some(" Ana ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body.name.as_deref(), Some("Ana"));
        assert!(body.rgm.is_none());
        assert!(clean_student_update(UpdateStudentRequest {
            rgm: Some("bad rgm!".to_string()),
            ..Default::default()
        })
        .is_err());
    }
}
