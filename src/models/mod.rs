pub mod auth;
pub mod campuses;
pub mod common;
pub mod evaluations;
pub mod grades;
pub mod groups;
pub mod imports;
pub mod offerings;
pub mod reports;
pub mod students;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::guard::GuardOutcome;
pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
