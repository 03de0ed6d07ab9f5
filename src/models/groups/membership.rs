//! 小组成员对账
//!
//! 给定小组与期望名单（学号），计算需要加入、移出的学生以及冲突。
//! 冲突：期望名单中的学生当前属于另一个小组。冲突在任何写入之前计算完成。

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use ts_rs::TS;

// 成员冲突明细（409 响应数据）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct MembershipConflict {
    pub student_id: i64,
    pub rgm: String,
    pub student_name: String,
    pub current_group_id: i64,
    pub current_group_title: String,
    pub target_group_id: i64,
}

// 对账结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct ReconcileResult {
    /// 新加入的学生 id
    pub added: Vec<i64>,
    /// 被移出的学生 id
    pub removed: Vec<i64>,
    /// 找不到对应学生的学号
    pub unresolved: Vec<String>,
    /// 从其他小组改派过来的学生 id
    pub conflicts_resolved: Vec<i64>,
}

/// 规范化学号列表：去除首尾空白、丢弃空值、按首次出现去重
pub fn normalize_external_ids<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}

/// 纯计算的成员变更计划，不涉及 I/O
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipPlan {
    pub to_add: Vec<i64>,
    pub to_remove: Vec<i64>,
    /// (学生, 当前所在小组)
    pub conflicts: Vec<(i64, i64)>,
}

impl MembershipPlan {
    /// - `current`：目标小组当前成员
    /// - `wanted`：期望名单解析出的学生，保持请求中的顺序
    /// - `memberships`：`wanted` 中学生当前所在的小组（学生 -> 小组）
    pub fn compute(
        target_group: i64,
        current: &[i64],
        wanted: &[i64],
        memberships: &HashMap<i64, i64>,
    ) -> Self {
        let current_set: BTreeSet<i64> = current.iter().copied().collect();
        let mut wanted_seen = HashSet::new();
        let wanted: Vec<i64> = wanted
            .iter()
            .copied()
            .filter(|id| wanted_seen.insert(*id))
            .collect();
        let wanted_set: BTreeSet<i64> = wanted.iter().copied().collect();

        let to_add = wanted
            .iter()
            .copied()
            .filter(|id| !current_set.contains(id))
            .collect();
        let to_remove = current_set.difference(&wanted_set).copied().collect();
        let conflicts = wanted
            .iter()
            .filter_map(|id| match memberships.get(id) {
                Some(group) if *group != target_group => Some((*id, *group)),
                _ => None,
            })
            .collect();

        Self {
            to_add,
            to_remove,
            conflicts,
        }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_dedups() {
        let raw = vec![" 0001 ", "", "0002", "0001", "   ", "0003"];
        assert_eq!(normalize_external_ids(&raw), vec!["0001", "0002", "0003"]);
    }

    #[test]
    fn test_plan_converges_roster() {
        let plan = MembershipPlan::compute(1, &[10, 11, 12], &[11, 13], &HashMap::new());
        assert_eq!(plan.to_add, vec![13]);
        assert_eq!(plan.to_remove, vec![10, 12]);
        assert!(!plan.has_conflicts());
    }

    #[test]
    fn test_plan_reports_students_of_other_groups() {
        let memberships = HashMap::from([(20, 5), (21, 7)]);
        let plan = MembershipPlan::compute(7, &[21], &[20, 21], &memberships);
        assert_eq!(plan.conflicts, vec![(20, 5)]);
        assert_eq!(plan.to_add, vec![20]);
        assert!(plan.to_remove.is_empty());
    }

    #[test]
    fn test_plan_same_roster_is_noop() {
        let memberships = HashMap::from([(1, 3), (2, 3)]);
        let plan = MembershipPlan::compute(3, &[1, 2], &[2, 1], &memberships);
        assert!(plan.is_noop());
        assert!(!plan.has_conflicts());
    }

    #[test]
    fn test_plan_empty_roster_removes_all() {
        let plan = MembershipPlan::compute(3, &[4, 5], &[], &HashMap::new());
        assert_eq!(plan.to_remove, vec![4, 5]);
        assert!(plan.to_add.is_empty());
    }

    #[test]
    fn test_plan_ignores_duplicate_wanted_ids() {
        let plan = MembershipPlan::compute(3, &[], &[8, 8], &HashMap::new());
        assert_eq!(plan.to_add, vec![8]);
    }
}
