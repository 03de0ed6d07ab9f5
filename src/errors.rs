//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 存储层的唯一约束 / 外键冲突在事务边界被转换为 `Conflict`，不会以原始数据库错误的形式向上传播。

use actix_web::http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tgi_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TgiSystemError {
            $($variant(String),)*
        }

        impl TgiSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TgiSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TgiSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TgiSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TgiSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TgiSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tgi_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Conflict("E007", "Conflict"),
    Serialization("E008", "Serialization Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    Import("E011", "Import Error"),
    Export("E012", "Export Error"),
}

impl TgiSystemError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            TgiSystemError::Validation(_) | TgiSystemError::Import(_) => StatusCode::BAD_REQUEST,
            TgiSystemError::NotFound(_) => StatusCode::NOT_FOUND,
            TgiSystemError::Conflict(_) => StatusCode::CONFLICT,
            TgiSystemError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TgiSystemError::Authorization(_) => StatusCode::FORBIDDEN,
            TgiSystemError::DatabaseConfig(_)
            | TgiSystemError::DatabaseConnection(_)
            | TgiSystemError::DatabaseOperation(_)
            | TgiSystemError::FileOperation(_)
            | TgiSystemError::Serialization(_)
            | TgiSystemError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为调用方可见的业务错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for TgiSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TgiSystemError {}

/// 将数据库错误分类：约束冲突转为 `Conflict`，其余保持为数据库操作错误
pub fn classify_db_error(err: DbErr, context: &str) -> TgiSystemError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            TgiSystemError::conflict(format!("{context}: 唯一约束冲突 ({detail})"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            TgiSystemError::conflict(format!("{context}: 外键约束冲突 ({detail})"))
        }
        _ => TgiSystemError::database_operation(format!("{context}: {err}")),
    }
}

// 为常见的错误类型实现 From trait
impl From<DbErr> for TgiSystemError {
    fn from(err: DbErr) -> Self {
        classify_db_error(err, "数据库操作失败")
    }
}

impl From<std::io::Error> for TgiSystemError {
    fn from(err: std::io::Error) -> Self {
        TgiSystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TgiSystemError {
    fn from(err: serde_json::Error) -> Self {
        TgiSystemError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TgiSystemError {
    fn from(err: csv::Error) -> Self {
        TgiSystemError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TgiSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TgiSystemError::database_config("test").code(), "E001");
        assert_eq!(TgiSystemError::validation("test").code(), "E005");
        assert_eq!(TgiSystemError::conflict("test").code(), "E007");
        assert_eq!(TgiSystemError::authentication("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(TgiSystemError::conflict("test").error_type(), "Conflict");
        assert_eq!(
            TgiSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = TgiSystemError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = TgiSystemError::not_found("Group 7");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Group 7"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TgiSystemError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TgiSystemError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TgiSystemError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TgiSystemError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(TgiSystemError::authorization("x").is_client_error());
        assert!(!TgiSystemError::export("x").is_client_error());
    }

    #[test]
    fn test_non_constraint_db_error_stays_operational() {
        let err = classify_db_error(DbErr::Custom("boom".to_string()), "查询小组失败");
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("查询小组失败"));
    }
}
