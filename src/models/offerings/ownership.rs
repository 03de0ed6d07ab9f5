//! 开课归属守卫
//!
//! 为教师设置负责的开课时，选中的开课若已属于其他教师即为冲突；
//! 未确认改派时整体拒绝，不做任何修改。

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use ts_rs::TS;

// 冲突明细：开课及其当前负责教师
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OfferingConflict {
    pub offering_id: i64,
    pub offering_code: String,
    pub current_owner_id: i64,
    pub current_owner_name: Option<String>,
}

// 应用结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "offering.ts")]
pub struct OwnershipResult {
    pub assigned: Vec<i64>,
    pub released: Vec<i64>,
    /// 从其他教师处改派过来的开课
    pub reassigned: Vec<i64>,
}

/// 纯计算的归属变更计划，不涉及 I/O
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnershipPlan {
    /// 需要设置为该教师的开课
    pub to_assign: Vec<i64>,
    /// 不再选中、需要释放（置空）的开课
    pub to_release: Vec<i64>,
    /// (开课, 当前负责教师)
    pub conflicts: Vec<(i64, i64)>,
    /// 不存在的开课
    pub unknown: Vec<i64>,
}

impl OwnershipPlan {
    /// `owners` 为选中开课当前的负责教师（None 表示无人负责）；不在其中的开课视为不存在
    pub fn compute(
        professor_id: i64,
        selected: &[i64],
        currently_owned: &[i64],
        owners: &HashMap<i64, Option<i64>>,
    ) -> Self {
        let wanted: BTreeSet<i64> = selected.iter().copied().collect();
        let owned: BTreeSet<i64> = currently_owned.iter().copied().collect();

        let mut plan = OwnershipPlan::default();

        for &offering_id in &wanted {
            match owners.get(&offering_id) {
                None => plan.unknown.push(offering_id),
                Some(Some(owner)) if *owner == professor_id => {}
                Some(Some(owner)) => {
                    plan.conflicts.push((offering_id, *owner));
                    plan.to_assign.push(offering_id);
                }
                Some(None) => plan.to_assign.push(offering_id),
            }
        }

        plan.to_release = owned.difference(&wanted).copied().collect();
        plan
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(pairs: &[(i64, Option<i64>)]) -> HashMap<i64, Option<i64>> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_free_offerings_are_assigned_without_conflict() {
        let plan = OwnershipPlan::compute(7, &[1, 2], &[], &owners(&[(1, None), (2, None)]));
        assert_eq!(plan.to_assign, vec![1, 2]);
        assert!(plan.to_release.is_empty());
        assert!(!plan.has_conflicts());
    }

    #[test]
    fn test_offering_of_other_professor_is_conflict() {
        let plan = OwnershipPlan::compute(7, &[1, 2], &[], &owners(&[(1, Some(9)), (2, None)]));
        assert_eq!(plan.conflicts, vec![(1, 9)]);
        assert_eq!(plan.to_assign, vec![1, 2]);
    }

    #[test]
    fn test_deselected_offerings_are_released() {
        let plan = OwnershipPlan::compute(7, &[2], &[1, 2], &owners(&[(2, Some(7))]));
        assert!(plan.to_assign.is_empty());
        assert_eq!(plan.to_release, vec![1]);
        assert!(!plan.has_conflicts());
    }

    #[test]
    fn test_empty_selection_releases_everything() {
        let plan = OwnershipPlan::compute(7, &[], &[3, 4], &owners(&[]));
        assert_eq!(plan.to_release, vec![3, 4]);
        assert!(plan.to_assign.is_empty());
    }

    #[test]
    fn test_unknown_offerings_are_reported() {
        let plan = OwnershipPlan::compute(7, &[1, 99], &[], &owners(&[(1, None)]));
        assert_eq!(plan.unknown, vec![99]);
        assert_eq!(plan.to_assign, vec![1]);
    }

    #[test]
    fn test_duplicate_selection_counted_once() {
        let plan = OwnershipPlan::compute(7, &[1, 1, 1], &[], &owners(&[(1, None)]));
        assert_eq!(plan.to_assign, vec![1]);
    }
}
