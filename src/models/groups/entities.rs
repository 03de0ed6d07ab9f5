use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未设置标题的小组使用的默认标题
pub fn default_group_title(group_id: i64) -> String {
    format!("Project #{group_id}")
}

// TGI 小组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct Group {
    pub id: i64,
    pub title: String,
    /// 指导教师，None 表示尚未指定
    pub advisor_id: Option<i64>,
    pub advisor_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 小组成员
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupMember {
    pub student_id: i64,
    pub rgm: String,
    pub name: String,
    pub campus_name: Option<String>,
    pub offering_code: Option<String>,
}

// 教师在小组中的身份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "group.ts")]
pub enum GroupProfessorRole {
    Advisor,
    Evaluator,
    CoAdvisor,
}

impl GroupProfessorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupProfessorRole::Advisor => "ADVISOR",
            GroupProfessorRole::Evaluator => "EVALUATOR",
            GroupProfessorRole::CoAdvisor => "CO_ADVISOR",
        }
    }
}

impl std::fmt::Display for GroupProfessorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupProfessorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADVISOR" => Ok(GroupProfessorRole::Advisor),
            "EVALUATOR" => Ok(GroupProfessorRole::Evaluator),
            "CO_ADVISOR" => Ok(GroupProfessorRole::CoAdvisor),
            _ => Err(format!("Invalid group professor role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title() {
        assert_eq!(default_group_title(12), "Project #12");
    }

    #[test]
    fn test_group_professor_role_strings() {
        for role in [
            GroupProfessorRole::Advisor,
            GroupProfessorRole::Evaluator,
            GroupProfessorRole::CoAdvisor,
        ] {
            assert_eq!(role.as_str().parse::<GroupProfessorRole>().unwrap(), role);
        }
        assert!("ORIENTADOR".parse::<GroupProfessorRole>().is_err());
    }
}
