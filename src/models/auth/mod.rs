pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, UpdateAccountRequest};
pub use responses::{LoginResponse, RefreshTokenResponse, UserInfoResponse};
