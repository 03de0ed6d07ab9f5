//! 报表行与导出格式

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "report.ts")]
pub enum ReportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// 导出文件名，例如 `grades_20250901_153000.csv`
pub fn report_file_name(
    prefix: &str,
    format: ReportFormat,
    now: chrono::DateTime<chrono::Utc>,
) -> String {
    format!(
        "{prefix}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// 分数保留两位小数，缺失时为空
pub fn format_score(score: Option<f64>) -> String {
    score.map(|s| format!("{s:.2}")).unwrap_or_default()
}

// 成绩报表：每个学生一行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct GradeReportRow {
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub rgm: String,
    pub student_name: String,
    pub campus: String,
    pub offering_code: String,
    pub advisor_name: Option<String>,
    pub report_i: Option<f64>,
    pub report_ii: Option<f64>,
    pub paper: Option<f64>,
    pub banner_average: Option<f64>,
}

impl GradeReportRow {
    pub const HEADER: [&'static str; 10] = [
        "group_id",
        "rgm",
        "student_name",
        "campus",
        "offering",
        "advisor",
        "report_i",
        "report_ii",
        "paper",
        "banner_average",
    ];

    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.group_id.map(|id| id.to_string()).unwrap_or_default(),
            self.rgm.clone(),
            self.student_name.clone(),
            self.campus.clone(),
            self.offering_code.clone(),
            self.advisor_name.clone().unwrap_or_default(),
            format_score(self.report_i),
            format_score(self.report_ii),
            format_score(self.paper),
            format_score(self.banner_average),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct RosterMember {
    pub name: String,
    pub rgm: String,
}

// 小组名单：每个小组一行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "report.ts")]
pub struct GroupRosterRow {
    pub group_id: i64,
    pub title: String,
    pub advisor_name: Option<String>,
    pub members: Vec<RosterMember>,
}

impl GroupRosterRow {
    /// 表头：id, title, advisor, name_1, rgm_1, ...
    pub fn header(member_columns: usize) -> Vec<String> {
        let mut header = vec!["id".to_string(), "title".to_string(), "advisor".to_string()];
        for i in 1..=member_columns {
            header.push(format!("name_{i}"));
            header.push(format!("rgm_{i}"));
        }
        header
    }

    /// 成员不足时补空列，超出的成员截断
    pub fn to_record(&self, member_columns: usize) -> Vec<String> {
        let mut record = vec![
            self.group_id.to_string(),
            self.title.clone(),
            self.advisor_name.clone().unwrap_or_default(),
        ];
        for i in 0..member_columns {
            match self.members.get(i) {
                Some(m) => {
                    record.push(m.name.clone());
                    record.push(m.rgm.clone());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        record
    }
}

/// 名单导出的成员列数：显式指定优先，否则取最大成员数与下限中的较大者
pub fn roster_member_columns(
    rows: &[GroupRosterRow],
    requested: Option<usize>,
    minimum: usize,
) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => rows
            .iter()
            .map(|r| r.members.len())
            .max()
            .unwrap_or(0)
            .max(minimum),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn roster(members: usize) -> GroupRosterRow {
        GroupRosterRow {
            group_id: 5,
            title: "Robot".to_string(),
            advisor_name: None,
            members: (0..members)
                .map(|i| RosterMember {
                    name: format!("Aluno {i}"),
                    rgm: format!("000{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_file_name() {
        let now = chrono::Utc.with_ymd_and_hms(2025, 9, 1, 15, 30, 0).unwrap();
        assert_eq!(
            report_file_name("grades", ReportFormat::Xlsx, now),
            "grades_20250901_153000.xlsx"
        );
    }

    #[test]
    fn test_format_score_two_decimals() {
        assert_eq!(format_score(Some(1.0 / 3.0)), "0.33");
        assert_eq!(format_score(Some(4.0)), "4.00");
        assert_eq!(format_score(None), "");
    }

    #[test]
    fn test_roster_header_and_padding() {
        assert_eq!(
            GroupRosterRow::header(2),
            vec!["id", "title", "advisor", "name_1", "rgm_1", "name_2", "rgm_2"]
        );
        let record = roster(1).to_record(2);
        assert_eq!(record.len(), 7);
        assert_eq!(record[3], "Aluno 0");
        assert_eq!(record[5], "");
    }

    #[test]
    fn test_roster_member_columns() {
        let rows = vec![roster(1), roster(4)];
        assert_eq!(roster_member_columns(&rows, None, 3), 4);
        assert_eq!(roster_member_columns(&[roster(1)], None, 3), 3);
        assert_eq!(roster_member_columns(&rows, Some(2), 3), 2);
        assert_eq!(roster(4).to_record(2).len(), 7);
    }

    #[test]
    fn test_grade_row_record() {
        let row = GradeReportRow {
            group_id: None,
            group_title: None,
            rgm: "0001".to_string(),
            student_name: "Ana".to_string(),
            campus: "Centro".to_string(),
            offering_code: "TGI-1".to_string(),
            advisor_name: None,
            report_i: Some(0.5),
            report_ii: None,
            paper: Some(3.0),
            banner_average: Some(1.75),
        };
        let record = row.to_record();
        assert_eq!(record.len(), GradeReportRow::HEADER.len());
        assert_eq!(record[0], "");
        assert_eq!(record[6], "0.50");
        assert_eq!(record[9], "1.75");
    }
}
