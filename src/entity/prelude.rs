//! 预导入模块，方便使用

pub use super::banner_evaluations::{
    ActiveModel as BannerEvaluationActiveModel, Entity as BannerEvaluations,
    Model as BannerEvaluationModel,
};
pub use super::campuses::{ActiveModel as CampusActiveModel, Entity as Campuses, Model as CampusModel};
pub use super::group_assessments::{
    ActiveModel as GroupAssessmentActiveModel, Entity as GroupAssessments,
    Model as GroupAssessmentModel,
};
pub use super::group_professors::{
    ActiveModel as GroupProfessorActiveModel, Entity as GroupProfessors,
    Model as GroupProfessorModel,
};
pub use super::group_students::{
    ActiveModel as GroupStudentActiveModel, Entity as GroupStudents, Model as GroupStudentModel,
};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
pub use super::offerings::{
    ActiveModel as OfferingActiveModel, Entity as Offerings, Model as OfferingModel,
};
pub use super::students::{ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
