use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::grades::entities::average_of;

/// 海报评价每一项的满分
pub const RUBRIC_MAX_SCORE: f64 = 5.0;

// 海报评价记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct PosterEvaluation {
    pub id: i64,
    pub group_id: i64,
    pub evaluator_id: i64,
    /// 七个评分项的平均值（两位小数）
    pub score: f64,
    pub comments: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 海报评价的七个评分项，每项 0..=5
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct RubricScores {
    pub material: f64,
    pub creativity: f64,
    pub exposition: f64,
    pub posture: f64,
    pub mastery: f64,
    pub relevance: f64,
    pub timing: f64,
}

impl RubricScores {
    fn items(&self) -> [(&'static str, f64); 7] {
        [
            ("material", self.material),
            ("creativity", self.creativity),
            ("exposition", self.exposition),
            ("posture", self.posture),
            ("mastery", self.mastery),
            ("relevance", self.relevance),
            ("timing", self.timing),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in self.items() {
            if !value.is_finite() || !(0.0..=RUBRIC_MAX_SCORE).contains(&value) {
                return Err(format!("评分项 {name} 必须在 0 到 {RUBRIC_MAX_SCORE} 之间"));
            }
        }
        Ok(())
    }

    /// 七项平均分，四舍五入到两位小数
    pub fn average(&self) -> f64 {
        average_of(self.items().into_iter().map(|(_, v)| v)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric(values: [f64; 7]) -> RubricScores {
        RubricScores {
            material: values[0],
            creativity: values[1],
            exposition: values[2],
            posture: values[3],
            mastery: values[4],
            relevance: values[5],
            timing: values[6],
        }
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 31 / 7 = 4.428571...
        let scores = rubric([5.0, 5.0, 4.0, 4.0, 5.0, 4.0, 4.0]);
        assert_eq!(scores.average(), 4.43);
    }

    #[test]
    fn test_full_marks() {
        assert_eq!(rubric([5.0; 7]).average(), 5.0);
    }

    #[test]
    fn test_validate_range() {
        assert!(rubric([0.0; 7]).validate().is_ok());
        let err = rubric([5.0, 5.0, 5.0, 6.0, 5.0, 5.0, 5.0])
            .validate()
            .unwrap_err();
        assert!(err.contains("posture"));
        assert!(rubric([-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).validate().is_err());
    }
}
