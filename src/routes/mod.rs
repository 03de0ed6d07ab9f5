pub mod auth;

pub mod users;

pub mod campuses;

pub mod offerings;

pub mod students;

pub mod groups;

pub mod professor;

pub mod evaluations;

pub mod reports;

pub use auth::configure_auth_routes;
pub use campuses::configure_campus_routes;
pub use evaluations::configure_evaluation_routes;
pub use groups::configure_group_routes;
pub use offerings::configure_offering_routes;
pub use professor::configure_professor_routes;
pub use reports::configure_report_routes;
pub use students::configure_student_routes;
pub use users::configure_user_routes;
