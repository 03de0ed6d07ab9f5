//! 评分项与派生分数
//!
//! 评分项只接受规范名称（REPORT_I / REPORT_II / PAPER），历史别名由数据库迁移统一改写。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 报告类评分项勾选时的固定得分
pub const REPORT_CHECKED_SCORE: f64 = 0.5;
/// 论文评分上限
pub const PAPER_MAX_SCORE: f64 = 4.0;
/// 数据库层的评分范围
pub const STORED_SCORE_MAX: f64 = 10.0;

// 评分项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub enum Instrument {
    #[serde(rename = "REPORT_I")]
    ReportI,
    #[serde(rename = "REPORT_II")]
    ReportII,
    #[serde(rename = "PAPER")]
    Paper,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [Instrument::ReportI, Instrument::ReportII, Instrument::Paper];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::ReportI => "REPORT_I",
            Instrument::ReportII => "REPORT_II",
            Instrument::Paper => "PAPER",
        }
    }

    /// 按评分项自身的分值规则校验
    pub fn validate_score(&self, score: f64) -> Result<(), String> {
        if !score.is_finite() {
            return Err(format!("{self} 的分数必须是有限数值"));
        }
        match self {
            Instrument::ReportI | Instrument::ReportII => {
                if score == 0.0 || score == REPORT_CHECKED_SCORE {
                    Ok(())
                } else {
                    Err(format!("{self} 的分数只能是 0 或 {REPORT_CHECKED_SCORE}"))
                }
            }
            Instrument::Paper => {
                if (0.0..=PAPER_MAX_SCORE).contains(&score) {
                    Ok(())
                } else {
                    Err(format!("{self} 的分数必须在 0 到 {PAPER_MAX_SCORE} 之间"))
                }
            }
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REPORT_I" => Ok(Instrument::ReportI),
            "REPORT_II" => Ok(Instrument::ReportII),
            "PAPER" => Ok(Instrument::Paper),
            _ => Err(format!("Invalid instrument: {s}")),
        }
    }
}

/// 勾选框映射为固定分数
pub fn checkbox_score(checked: bool) -> f64 {
    if checked { REPORT_CHECKED_SCORE } else { 0.0 }
}

/// 保留两位小数，四舍五入（half-up），仅用于非负分数
pub fn round_half_up_2(value: f64) -> f64 {
    // 抵消二进制表示误差，例如 1.005 * 100 = 100.49999...
    ((value * 100.0) + 1e-9).round() / 100.0
}

/// 对存在的分数求平均并保留两位小数；没有任何分数时返回 None
pub fn average_of<I: IntoIterator<Item = f64>>(scores: I) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        None
    } else {
        Some(round_half_up_2(sum / count as f64))
    }
}

// 单个评分记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct Assessment {
    pub group_id: i64,
    pub instrument: Instrument,
    pub score: f64,
    pub entered_by: Option<i64>,
    pub entered_at: chrono::DateTime<chrono::Utc>,
}

// 小组的三项评分及海报平均分（banner average）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeSheet {
    pub report_i: Option<f64>,
    pub report_ii: Option<f64>,
    pub paper: Option<f64>,
    /// 已录入评分项的平均值，缺失项不计入分母
    pub banner_average: Option<f64>,
}

impl GradeSheet {
    pub fn from_assessments<'a, I>(assessments: I) -> Self
    where
        I: IntoIterator<Item = &'a Assessment>,
    {
        let mut sheet = GradeSheet::default();
        for assessment in assessments {
            match assessment.instrument {
                Instrument::ReportI => sheet.report_i = Some(assessment.score),
                Instrument::ReportII => sheet.report_ii = Some(assessment.score),
                Instrument::Paper => sheet.paper = Some(assessment.score),
            }
        }
        sheet.banner_average = average_of(
            [sheet.report_i, sheet.report_ii, sheet.paper]
                .into_iter()
                .flatten(),
        );
        sheet
    }

    pub fn score(&self, instrument: Instrument) -> Option<f64> {
        match instrument {
            Instrument::ReportI => self.report_i,
            Instrument::ReportII => self.report_ii,
            Instrument::Paper => self.paper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(instrument: Instrument, score: f64) -> Assessment {
        Assessment {
            group_id: 1,
            instrument,
            score,
            entered_by: None,
            entered_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_banner_average_of_all_three() {
        let list = vec![
            assessment(Instrument::ReportI, 0.5),
            assessment(Instrument::ReportII, 0.5),
            assessment(Instrument::Paper, 3.0),
        ];
        let sheet = GradeSheet::from_assessments(&list);
        assert_eq!(sheet.banner_average, Some(1.33));
    }

    #[test]
    fn test_banner_average_excludes_missing() {
        let list = vec![
            assessment(Instrument::ReportI, 0.5),
            assessment(Instrument::Paper, 4.0),
        ];
        let sheet = GradeSheet::from_assessments(&list);
        assert_eq!(sheet.report_ii, None);
        assert_eq!(sheet.banner_average, Some(2.25));
    }

    #[test]
    fn test_banner_average_absent_without_scores() {
        let sheet = GradeSheet::from_assessments(&[]);
        assert_eq!(sheet.banner_average, None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up_2(1.005), 1.01);
        assert_eq!(round_half_up_2(2.345), 2.35);
        assert_eq!(round_half_up_2(1.3333333), 1.33);
        assert_eq!(round_half_up_2(0.0), 0.0);
    }

    #[test]
    fn test_checkbox_mapping() {
        assert_eq!(checkbox_score(true), 0.5);
        assert_eq!(checkbox_score(false), 0.0);
    }

    #[test]
    fn test_instrument_scales() {
        assert!(Instrument::ReportI.validate_score(0.5).is_ok());
        assert!(Instrument::ReportII.validate_score(0.0).is_ok());
        assert!(Instrument::ReportI.validate_score(0.3).is_err());
        assert!(Instrument::Paper.validate_score(4.0).is_ok());
        assert!(Instrument::Paper.validate_score(4.5).is_err());
        assert!(Instrument::Paper.validate_score(-0.1).is_err());
        assert!(Instrument::Paper.validate_score(f64::NAN).is_err());
    }

    #[test]
    fn test_instrument_canonical_names_only() {
        assert_eq!("REPORT_II".parse::<Instrument>(), Ok(Instrument::ReportII));
        assert!("RI".parse::<Instrument>().is_err());
        assert!("relatorio_i".parse::<Instrument>().is_err());
        assert_eq!(
            serde_json::to_string(&Instrument::ReportII).unwrap(),
            r#""REPORT_II""#
        );
    }
}
