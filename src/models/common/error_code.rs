//! 业务错误码
//!
//! 按领域分段：1xxx 认证，2xxx 用户，3xxx 学生 / 校区 / 开课，4xxx 小组，5xxx 评分，
//! 6xxx 海报评价，7xxx 导入导出。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    InternalServerError = 500,

    // 认证
    AuthFailed = 1000,
    AccountInactive = 1001,
    CurrentPasswordInvalid = 1002,

    // 用户
    UserNotFound = 2000,
    UserEmailInvalid = 2001,
    UserEmailAlreadyExists = 2002,
    UserPasswordInvalid = 2003,
    UserNameInvalid = 2004,
    UserCreationFailed = 2005,
    UserUpdateFailed = 2006,
    UserDeleteFailed = 2007,
    CanNotDeleteCurrentUser = 2008,
    UserHasAdvisedGroups = 2009,
    UserNotProfessor = 2010,
    OfferingOwnershipConflict = 2011,

    // 学生 / 校区 / 开课
    StudentNotFound = 3000,
    StudentRgmAlreadyExists = 3001,
    StudentDataInvalid = 3002,
    CampusNotFound = 3100,
    CampusAlreadyExists = 3101,
    CampusInUse = 3102,
    OfferingNotFound = 3200,
    OfferingAlreadyExists = 3201,
    OfferingInUse = 3202,
    OfferingPermissionDenied = 3203,

    // 小组
    GroupNotFound = 4000,
    GroupDataInvalid = 4001,
    GroupUnknownRgm = 4002,
    GroupMembershipConflict = 4003,
    GroupPermissionDenied = 4004,
    GroupAdvisorInvalid = 4005,

    // 评分
    GradeInvalid = 5000,
    GradeSaveFailed = 5001,

    // 海报评价
    EvaluationInvalid = 6000,
    EvaluationAlreadyExists = 6001,
    EvaluationOwnGroup = 6002,

    // 导入导出
    FileUploadFailed = 7000,
    ImportFileParseFailed = 7001,
    ImportFileMissingColumn = 7002,
    ImportFileDataInvalid = 7003,
    ExportFailed = 7100,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_grouped_by_area() {
        assert_eq!(ErrorCode::Success.as_i32(), 0);
        assert_eq!(ErrorCode::AuthFailed.as_i32() / 1000, 1);
        assert_eq!(ErrorCode::UserHasAdvisedGroups.as_i32() / 1000, 2);
        assert_eq!(ErrorCode::CampusInUse.as_i32() / 1000, 3);
        assert_eq!(ErrorCode::GroupMembershipConflict.as_i32() / 1000, 4);
        assert_eq!(ErrorCode::GradeInvalid.as_i32() / 1000, 5);
        assert_eq!(ErrorCode::EvaluationAlreadyExists.as_i32() / 1000, 6);
        assert_eq!(ErrorCode::ExportFailed.as_i32() / 1000, 7);
    }
}
