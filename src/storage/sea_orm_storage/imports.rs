//! 小组批量导入的落库部分
//!
//! 整个导入在一个事务中执行。试运行只读取现有数据，新小组以负数占位 id 参与规划，
//! 不写入任何行，也不消耗数据库序列。

use super::SeaOrmStorage;
use super::groups::{insert_group, sync_advisor_link};
use super::membership::{attach_students, detach_students, group_titles};
use super::students::{memberships_of, students_by_rgm};
use crate::entity::groups::{Column as GroupColumn, Entity as Groups};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, TgiSystemError};
use crate::models::imports::{
    entities::{ImportBatch, ImportConflict, ImportLink, ImportSummary},
    requests::ImportQuery,
};
use crate::models::users::entities::UserRole;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

impl SeaOrmStorage {
    pub async fn import_groups_impl(
        &self,
        batch: &ImportBatch,
        query: ImportQuery,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary {
            duplicates: batch.duplicates.clone(),
            skipped_lines: batch.skipped_lines.clone(),
            dry_run: query.dry_run,
            ..Default::default()
        };

        let txn = self.begin().await?;

        // 指导教师按全名匹配；重名时取 id 最小者
        let advisor_names = batch.advisor_names();
        let mut advisors: HashMap<String, i64> = HashMap::new();
        if !advisor_names.is_empty() {
            let users = Users::find()
                .filter(UserColumn::FullName.is_in(advisor_names.clone()))
                .filter(UserColumn::Role.eq(UserRole::PROFESSOR))
                .order_by_asc(UserColumn::Id)
                .all(&txn)
                .await
                .map_err(|e| TgiSystemError::database_operation(format!("查询指导教师失败: {e}")))?;
            for user in users {
                advisors.entry(user.full_name).or_insert(user.id);
            }
        }
        summary.unknown_advisors = advisor_names
            .into_iter()
            .filter(|name| !advisors.contains_key(name))
            .collect();

        // 已存在的小组按标题匹配
        let mut groups_by_title: HashMap<String, i64> = HashMap::new();
        let existing = Groups::find()
            .filter(GroupColumn::Title.is_in(batch.titles()))
            .order_by_asc(GroupColumn::Id)
            .all(&txn)
            .await
            .map_err(|e| TgiSystemError::database_operation(format!("查询小组失败: {e}")))?;
        for group in existing {
            if let Some(title) = group.title {
                groups_by_title.entry(title).or_insert(group.id);
            }
        }

        let students = students_by_rgm(&txn, &batch.all_rgms()).await?;
        let student_ids: Vec<i64> = students.values().map(|s| s.id).collect();
        let mut memberships = memberships_of(&txn, &student_ids).await?;

        let current_groups: Vec<i64> = memberships.values().copied().collect();
        let mut titles_by_id = group_titles(&txn, &current_groups).await?;
        let mut missing_seen = HashSet::new();
        let mut next_placeholder: i64 = 0;

        for plan in &batch.groups {
            let group_id = match groups_by_title.get(&plan.title) {
                Some(id) => *id,
                None => {
                    let advisor_id = plan.advisor.as_ref().and_then(|n| advisors.get(n)).copied();
                    let id = if query.dry_run {
                        next_placeholder -= 1;
                        next_placeholder
                    } else {
                        let model = insert_group(&txn, Some(plan.title.clone()), advisor_id).await?;
                        sync_advisor_link(&txn, model.id, advisor_id).await?;
                        model.id
                    };
                    groups_by_title.insert(plan.title.clone(), id);
                    titles_by_id.insert(id, plan.title.clone());
                    summary.created_groups.push(plan.title.clone());
                    id
                }
            };

            for rgm in &plan.rgms {
                let link = ImportLink {
                    title: plan.title.clone(),
                    rgm: rgm.clone(),
                };
                let Some(student) = students.get(rgm) else {
                    if missing_seen.insert(rgm.clone()) {
                        summary.missing_rgms.push(rgm.clone());
                    }
                    continue;
                };

                match memberships.get(&student.id).copied() {
                    Some(current) if current == group_id => summary.duplicates.push(link),
                    Some(current) => {
                        let conflict = ImportConflict {
                            title: plan.title.clone(),
                            rgm: rgm.clone(),
                            current_group_id: current,
                            current_group_title: titles_by_id
                                .get(&current)
                                .cloned()
                                .unwrap_or_default(),
                        };
                        if query.allow_reassignment {
                            if !query.dry_run {
                                detach_students(&txn, &[student.id]).await?;
                                attach_students(&txn, group_id, &[student.id]).await?;
                            }
                            memberships.insert(student.id, group_id);
                            summary.reassigned.push(conflict);
                        } else {
                            summary.conflicts.push(conflict);
                        }
                    }
                    None => {
                        if !query.dry_run {
                            attach_students(&txn, group_id, &[student.id]).await?;
                        }
                        memberships.insert(student.id, group_id);
                        summary.linked.push(link);
                    }
                }
            }
        }

        if !summary.unknown_advisors.is_empty() {
            warn!("导入时未找到指导教师: {:?}", summary.unknown_advisors);
        }

        if query.dry_run {
            txn.rollback()
                .await
                .map_err(|e| TgiSystemError::database_operation(format!("回滚试运行失败: {e}")))?;
            info!(
                "导入试运行：将新建 {} 个小组，关联 {} 名学生",
                summary.created_groups.len(),
                summary.linked.len()
            );
        } else {
            Self::commit(txn).await?;
            info!(
                "导入完成：新建 {} 个小组，关联 {} 名学生，冲突 {}，改派 {}",
                summary.created_groups.len(),
                summary.linked.len(),
                summary.conflicts.len(),
                summary.reassigned.len()
            );
        }

        Ok(summary)
    }
}
