//! 小组批量导入
//!
//! 文件每行：指导教师姓名、小组标题、若干学号。
//! 解析后的行先在内存中整理成按标题分组的 (标题, 学号) 对，再交给存储层落库。

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

/// 合并单元格内的连续空白并去掉首尾空白
pub fn normalize_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// 文件中的一行（已规范化）
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 文件中的行号（从 1 开始，含表头）
    pub line: usize,
    pub advisor: String,
    pub title: String,
    pub rgms: Vec<String>,
}

// 按标题聚合后的待导入小组
#[derive(Debug, Clone, PartialEq)]
pub struct ImportGroupPlan {
    pub title: String,
    /// 该标题下第一个非空的指导教师姓名
    pub advisor: Option<String>,
    pub rgms: Vec<String>,
}

// (标题, 学号)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export, export_to = "import.ts")]
pub struct ImportLink {
    pub title: String,
    pub rgm: String,
}

// 学生已属于其他小组
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "import.ts")]
pub struct ImportConflict {
    pub title: String,
    pub rgm: String,
    pub current_group_id: i64,
    pub current_group_title: String,
}

/// 整理结果：按首次出现顺序排列的小组，以及文件内重复的 (标题, 学号)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub groups: Vec<ImportGroupPlan>,
    pub duplicates: Vec<ImportLink>,
    /// 缺少标题而被跳过的行号
    pub skipped_lines: Vec<usize>,
}

impl ImportBatch {
    pub fn from_rows(rows: &[ImportRow]) -> Self {
        let mut batch = Self::default();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for row in rows {
            if row.title.is_empty() {
                batch.skipped_lines.push(row.line);
                continue;
            }
            let slot = *index.entry(row.title.clone()).or_insert_with(|| {
                batch.groups.push(ImportGroupPlan {
                    title: row.title.clone(),
                    advisor: None,
                    rgms: Vec::new(),
                });
                batch.groups.len() - 1
            });
            let group = &mut batch.groups[slot];
            if group.advisor.is_none() && !row.advisor.is_empty() {
                group.advisor = Some(row.advisor.clone());
            }
            for rgm in row.rgms.iter().filter(|r| !r.is_empty()) {
                if seen.insert((row.title.clone(), rgm.clone())) {
                    group.rgms.push(rgm.clone());
                } else {
                    batch.duplicates.push(ImportLink {
                        title: row.title.clone(),
                        rgm: rgm.clone(),
                    });
                }
            }
        }

        batch
    }

    pub fn advisor_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .filter_map(|g| g.advisor.clone())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.title.clone()).collect()
    }

    pub fn all_rgms(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|g| g.rgms.iter().cloned())
            .filter(|rgm| seen.insert(rgm.clone()))
            .collect()
    }
}

// 导入汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "import.ts")]
pub struct ImportSummary {
    /// 新建小组的标题
    pub created_groups: Vec<String>,
    pub linked: Vec<ImportLink>,
    /// 文件内重复或学生已在目标小组中
    pub duplicates: Vec<ImportLink>,
    pub missing_rgms: Vec<String>,
    /// 未改派的冲突（allow_reassignment = false）
    pub conflicts: Vec<ImportConflict>,
    /// 已改派的冲突
    pub reassigned: Vec<ImportConflict>,
    pub unknown_advisors: Vec<String>,
    pub skipped_lines: Vec<usize>,
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, advisor: &str, title: &str, rgms: &[&str]) -> ImportRow {
        ImportRow {
            line,
            advisor: advisor.to_string(),
            title: title.to_string(),
            rgms: rgms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("  Maria   da  Silva \t"), "Maria da Silva");
        assert_eq!(normalize_cell("   "), "");
    }

    #[test]
    fn test_batch_groups_rows_by_title() {
        let rows = vec![
            row(2, "", "Robot", &["0001", "0002"]),
            row(3, "Ana", "Robot", &["0003", ""]),
            row(4, "Bia", "Drone", &["0004"]),
        ];
        let batch = ImportBatch::from_rows(&rows);
        assert_eq!(batch.titles(), vec!["Robot", "Drone"]);
        assert_eq!(batch.groups[0].advisor.as_deref(), Some("Ana"));
        assert_eq!(batch.groups[0].rgms, vec!["0001", "0002", "0003"]);
        assert_eq!(batch.advisor_names(), vec!["Ana", "Bia"]);
        assert_eq!(batch.all_rgms().len(), 4);
    }

    #[test]
    fn test_batch_dedups_title_rgm_pairs() {
        let rows = vec![
            row(2, "Ana", "Robot", &["0001", "0001"]),
            row(3, "Ana", "Robot", &["0001"]),
            row(4, "Ana", "Drone", &["0001"]),
        ];
        let batch = ImportBatch::from_rows(&rows);
        assert_eq!(batch.groups[0].rgms, vec!["0001"]);
        assert_eq!(batch.groups[1].rgms, vec!["0001"]);
        assert_eq!(batch.duplicates.len(), 2);
    }

    #[test]
    fn test_batch_skips_rows_without_title() {
        let rows = vec![row(2, "Ana", "", &["0001"]), row(3, "", "Robot", &[])];
        let batch = ImportBatch::from_rows(&rows);
        assert_eq!(batch.skipped_lines, vec![2]);
        assert_eq!(batch.groups.len(), 1);
        assert!(batch.groups[0].advisor.is_none());
    }
}
