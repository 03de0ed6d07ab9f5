use super::SeaOrmStorage;
use crate::entity::banner_evaluations::Entity as BannerEvaluations;
use crate::entity::group_assessments::{Column as AssessmentColumn, Entity as GroupAssessments};
use crate::entity::group_professors::Entity as GroupProfessors;
use crate::entity::group_students::{Column as MembershipColumn, Entity as GroupStudents};
use crate::errors::TgiSystemError;
use crate::models::{
    GuardOutcome,
    grades::{entities::Instrument, requests::GradeFormRequest},
    groups::requests::GroupRequest,
    imports::{
        entities::{ImportBatch, ImportRow},
        requests::ImportQuery,
    },
    offerings::requests::OfferingRequest,
    students::requests::CreateStudentRequest,
    users::{
        entities::UserRole,
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};
use crate::storage::Storage;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::from_url("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory storage")
}

async fn seed_students(storage: &SeaOrmStorage, rgms: &[&str]) -> Vec<i64> {
    let campus = storage.create_campus("Campinas").await.unwrap();
    let mut ids = Vec::new();
    for rgm in rgms {
        let student = storage
            .create_student(CreateStudentRequest {
                rgm: rgm.to_string(),
                name: format!("Aluno {rgm}"),
                campus_id: campus.id,
                offering_code: "TGI-2025".to_string(),
            })
            .await
            .unwrap();
        ids.push(student.id);
    }
    ids
}

async fn professor(storage: &SeaOrmStorage, name: &str) -> i64 {
    let outcome = storage
        .create_user(CreateUserRequest {
            email: format!("{}@example.com", name.to_lowercase()),
            full_name: name.to_string(),
            password: "hash".to_string(),
            role: UserRole::Professor,
            is_active: true,
            offering_ids: Vec::new(),
            reassign_offerings: false,
        })
        .await
        .unwrap();
    match outcome {
        GuardOutcome::Applied(user) => user.id,
        GuardOutcome::Conflicted(_) => panic!("unexpected conflict"),
    }
}

async fn group_with(storage: &SeaOrmStorage, title: &str, rgms: &[&str]) -> i64 {
    let outcome = storage
        .create_group(GroupRequest {
            title: Some(title.to_string()),
            advisor_id: None,
            rgms: rgms.iter().map(|r| r.to_string()).collect(),
            allow_reassignment: false,
        })
        .await
        .unwrap();
    match outcome {
        GuardOutcome::Applied(written) => written.group.id,
        GuardOutcome::Conflicted(c) => panic!("unexpected conflict: {c:?}"),
    }
}

async fn member_rgms(storage: &SeaOrmStorage, group_id: i64) -> Vec<String> {
    let mut rgms: Vec<String> = storage
        .list_group_members(group_id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.rgm)
        .collect();
    rgms.sort();
    rgms
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_reconcile_converges_to_desired_roster() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002", "0003", "0004"]).await;
    let group = group_with(&storage, "Robot", &["0001", "0002"]).await;

    let outcome = storage
        .reconcile_group_members(group, &strings(&["0002", " 0003 ", "9999", "0003"]), false)
        .await
        .unwrap();
    let GuardOutcome::Applied(result) = outcome else {
        panic!("expected reconcile to apply");
    };

    assert_eq!(member_rgms(&storage, group).await, vec!["0002", "0003"]);
    assert_eq!(result.added.len(), 1);
    assert_eq!(result.removed.len(), 1);
    assert_eq!(result.unresolved, vec!["9999"]);

    // 再次对账没有变化
    let again = storage
        .reconcile_group_members(group, &strings(&["0002", "0003"]), false)
        .await
        .unwrap();
    let GuardOutcome::Applied(result) = again else {
        panic!("expected reconcile to apply");
    };
    assert!(result.added.is_empty() && result.removed.is_empty());
}

#[tokio::test]
async fn test_conflict_rejects_without_mutation_then_reassigns() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002"]).await;
    let group5 = group_with(&storage, "Group 5", &["0001"]).await;
    let group7 = group_with(&storage, "Group 7", &["0002"]).await;

    let outcome = storage
        .reconcile_group_members(group7, &strings(&["0001"]), false)
        .await
        .unwrap();
    let GuardOutcome::Conflicted(conflicts) = outcome else {
        panic!("expected a conflict");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].rgm, "0001");
    assert_eq!(conflicts[0].current_group_id, group5);
    assert_eq!(conflicts[0].current_group_title, "Group 5");
    assert_eq!(conflicts[0].target_group_id, group7);

    assert_eq!(member_rgms(&storage, group5).await, vec!["0001"]);
    assert_eq!(member_rgms(&storage, group7).await, vec!["0002"]);

    let outcome = storage
        .reconcile_group_members(group7, &strings(&["0001"]), true)
        .await
        .unwrap();
    let GuardOutcome::Applied(result) = outcome else {
        panic!("expected reassignment to apply");
    };
    assert_eq!(result.conflicts_resolved.len(), 1);
    assert!(member_rgms(&storage, group5).await.is_empty());
    assert_eq!(member_rgms(&storage, group7).await, vec!["0001"]);
}

#[tokio::test]
async fn test_reconcile_unknown_group_is_not_found() {
    let storage = storage().await;
    let err = storage
        .reconcile_group_members(404, &strings(&["0001"]), false)
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::NotFound(_)));
}

#[tokio::test]
async fn test_group_without_title_gets_default() {
    let storage = storage().await;
    let outcome = storage.create_group(GroupRequest::default()).await.unwrap();
    let GuardOutcome::Applied(written) = outcome else {
        panic!("expected create to apply");
    };
    assert_eq!(written.group.title, format!("Project #{}", written.group.id));
}

#[tokio::test]
async fn test_upsert_assessment_is_idempotent() {
    let storage = storage().await;
    let group = group_with(&storage, "Robot", &[]).await;

    for _ in 0..2 {
        storage
            .upsert_assessment(group, Instrument::Paper, 3.0, None)
            .await
            .unwrap();
    }
    let rows = GroupAssessments::find()
        .filter(AssessmentColumn::GroupId.eq(group))
        .count(&storage.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(
        storage.get_assessment_score(group, Instrument::Paper).await.unwrap(),
        Some(3.0)
    );

    storage
        .upsert_assessment(group, Instrument::Paper, 2.5, None)
        .await
        .unwrap();
    assert_eq!(
        storage.get_assessment_score(group, Instrument::Paper).await.unwrap(),
        Some(2.5)
    );
}

#[tokio::test]
async fn test_upsert_rejects_invalid_scores() {
    let storage = storage().await;
    let group = group_with(&storage, "Robot", &[]).await;

    let err = storage
        .upsert_assessment(group, Instrument::ReportI, 0.3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::Validation(_)));

    let err = storage
        .upsert_assessment(999, Instrument::Paper, 1.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::NotFound(_)));
}

#[tokio::test]
async fn test_banner_average_from_grade_form() {
    let storage = storage().await;
    let advisor = professor(&storage, "Ana").await;
    let group = group_with(&storage, "Robot", &[]).await;

    let sheet = storage
        .save_grade_form(
            group,
            GradeFormRequest {
                report_i: true,
                report_ii: true,
                paper: Some(3.0),
            },
            advisor,
        )
        .await
        .unwrap();
    assert_eq!(sheet.banner_average, Some(1.33));
    assert_eq!(storage.get_grade_sheet(group).await.unwrap(), sheet);
    assert_eq!(storage.list_group_assessments(group).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_group_leaves_no_orphans() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002"]).await;
    let advisor = professor(&storage, "Ana").await;
    let outcome = storage
        .create_group(GroupRequest {
            title: Some("Robot".to_string()),
            advisor_id: Some(advisor),
            rgms: strings(&["0001", "0002"]),
            allow_reassignment: false,
        })
        .await
        .unwrap();
    let GuardOutcome::Applied(written) = outcome else {
        panic!("expected create to apply");
    };
    let group = written.group.id;
    storage
        .upsert_assessment(group, Instrument::ReportI, 0.5, Some(advisor))
        .await
        .unwrap();
    let guest = storage
        .create_user(CreateUserRequest {
            email: "guest@example.com".to_string(),
            full_name: "Guest".to_string(),
            password: "hash".to_string(),
            role: UserRole::Guest,
            is_active: true,
            offering_ids: Vec::new(),
            reassign_offerings: false,
        })
        .await
        .unwrap();
    let GuardOutcome::Applied(guest) = guest else {
        panic!("expected guest to be created");
    };
    storage
        .create_evaluation(group, guest.id, 4.5, None)
        .await
        .unwrap();

    assert!(storage.delete_group(group).await.unwrap());
    assert!(!storage.delete_group(group).await.unwrap());

    let db = &storage.db;
    assert_eq!(
        GroupStudents::find()
            .filter(MembershipColumn::GroupId.eq(group))
            .count(db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(GroupAssessments::find().count(db).await.unwrap(), 0);
    assert_eq!(BannerEvaluations::find().count(db).await.unwrap(), 0);
    assert_eq!(GroupProfessors::find().count(db).await.unwrap(), 0);
    assert!(storage.get_student_by_rgm("0001").await.unwrap().is_some());
}

#[tokio::test]
async fn test_evaluation_once_per_evaluator() {
    let storage = storage().await;
    let group = group_with(&storage, "Robot", &[]).await;
    let evaluator = professor(&storage, "Bia").await;

    let pending = storage.list_pending_evaluations(evaluator, true).await.unwrap();
    assert_eq!(pending.len(), 1);

    storage
        .create_evaluation(group, evaluator, 4.43, Some("  ótimo ".to_string()))
        .await
        .unwrap();
    let err = storage
        .create_evaluation(group, evaluator, 3.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::Conflict(_)));

    assert!(storage.list_pending_evaluations(evaluator, true).await.unwrap().is_empty());
    let mine = storage.list_my_evaluations(evaluator).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].group_title, "Robot");
    assert_eq!(mine[0].evaluation.comments.as_deref(), Some("ótimo"));

    let detail = storage.get_group_detail(group).await.unwrap().unwrap();
    assert_eq!(detail.poster_average, Some(4.43));
    assert_eq!(detail.poster_evaluation_count, 1);
}

#[tokio::test]
async fn test_pending_skips_advised_groups() {
    let storage = storage().await;
    let advisor = professor(&storage, "Ana").await;
    storage
        .create_group(GroupRequest {
            title: Some("Mine".to_string()),
            advisor_id: Some(advisor),
            ..Default::default()
        })
        .await
        .unwrap();
    group_with(&storage, "Other", &[]).await;

    let pending = storage.list_pending_evaluations(advisor, true).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].group.title, "Other");
    assert_eq!(storage.list_advised_groups(advisor).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_advisor_must_be_professor() {
    let storage = storage().await;
    let err = storage
        .create_group(GroupRequest {
            title: Some("Robot".to_string()),
            advisor_id: Some(12345),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::Validation(_)));
    assert!(storage.list_group_members(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_offering_ownership_guard() {
    let storage = storage().await;
    let ana = professor(&storage, "Ana").await;
    let bia = professor(&storage, "Bia").await;
    let offering = storage
        .create_offering(OfferingRequest {
            code: "TGI-A".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let outcome = storage
        .sync_professor_offerings(ana, &[offering.id], false)
        .await
        .unwrap();
    assert!(!outcome.is_conflicted());

    let outcome = storage
        .sync_professor_offerings(bia, &[offering.id], false)
        .await
        .unwrap();
    let GuardOutcome::Conflicted(conflicts) = outcome else {
        panic!("expected an ownership conflict");
    };
    assert_eq!(conflicts[0].current_owner_id, ana);
    assert_eq!(conflicts[0].offering_code, "TGI-A");
    let owner = storage.get_offering_by_id(offering.id).await.unwrap().unwrap();
    assert_eq!(owner.professor_id, Some(ana));

    let outcome = storage
        .sync_professor_offerings(bia, &[offering.id], true)
        .await
        .unwrap();
    assert!(!outcome.is_conflicted());
    let owner = storage.get_offering_by_id(offering.id).await.unwrap().unwrap();
    assert_eq!(owner.professor_id, Some(bia));

    // 角色改为访客后释放全部开课
    storage
        .update_user(
            bia,
            UpdateUserRequest {
                role: Some(UserRole::Guest),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let owner = storage.get_offering_by_id(offering.id).await.unwrap().unwrap();
    assert_eq!(owner.professor_id, None);
}

#[tokio::test]
async fn test_import_dry_run_writes_nothing() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002"]).await;
    professor(&storage, "Ana").await;

    let rows = vec![
        ImportRow {
            line: 2,
            advisor: "Ana".to_string(),
            title: "Robot".to_string(),
            rgms: strings(&["0001", "0002", "0001"]),
        },
        ImportRow {
            line: 3,
            advisor: "Zeca".to_string(),
            title: "Drone".to_string(),
            rgms: strings(&["7777"]),
        },
    ];
    let batch = ImportBatch::from_rows(&rows);

    let preview = storage
        .import_groups(
            &batch,
            ImportQuery {
                dry_run: true,
                allow_reassignment: false,
            },
        )
        .await
        .unwrap();
    assert!(preview.dry_run);
    assert_eq!(preview.created_groups, vec!["Robot", "Drone"]);
    assert_eq!(preview.linked.len(), 2);
    assert_eq!(preview.duplicates.len(), 1);
    assert_eq!(preview.missing_rgms, vec!["7777"]);
    assert_eq!(preview.unknown_advisors, vec!["Zeca"]);

    let listed = storage
        .list_groups_with_pagination(Default::default())
        .await
        .unwrap();
    assert_eq!(listed.pagination.total, 0);

    let applied = storage
        .import_groups(&batch, ImportQuery::default())
        .await
        .unwrap();
    assert_eq!(applied.linked, preview.linked);
    let listed = storage
        .list_groups_with_pagination(Default::default())
        .await
        .unwrap();
    assert_eq!(listed.pagination.total, 2);
    let robot = listed
        .items
        .iter()
        .find(|item| item.group.title == "Robot")
        .unwrap();
    assert_eq!(robot.group.advisor_name.as_deref(), Some("Ana"));
    assert_eq!(robot.members.len(), 2);

    // 第二次导入全部视为重复
    let again = storage
        .import_groups(&batch, ImportQuery::default())
        .await
        .unwrap();
    assert!(again.created_groups.is_empty());
    assert!(again.linked.is_empty());
    assert_eq!(again.duplicates.len(), 3);
}

#[tokio::test]
async fn test_import_reports_conflicts_unless_reassigning() {
    let storage = storage().await;
    seed_students(&storage, &["0001"]).await;
    let group5 = group_with(&storage, "Group 5", &["0001"]).await;

    let batch = ImportBatch::from_rows(&[ImportRow {
        line: 2,
        advisor: String::new(),
        title: "Group 7".to_string(),
        rgms: strings(&["0001"]),
    }]);

    let summary = storage
        .import_groups(&batch, ImportQuery::default())
        .await
        .unwrap();
    assert_eq!(summary.conflicts.len(), 1);
    assert_eq!(summary.conflicts[0].current_group_id, group5);
    assert_eq!(member_rgms(&storage, group5).await, vec!["0001"]);

    let summary = storage
        .import_groups(
            &batch,
            ImportQuery {
                dry_run: false,
                allow_reassignment: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.reassigned.len(), 1);
    assert!(member_rgms(&storage, group5).await.is_empty());
}

#[tokio::test]
async fn test_group_search_matches_member_rgm() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002"]).await;
    group_with(&storage, "Robot", &["0001"]).await;
    group_with(&storage, "Drone", &["0002"]).await;

    let listed = storage
        .list_groups_with_pagination(crate::models::groups::requests::GroupListQuery {
            search: Some("0002".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].group.title, "Drone");
}

#[tokio::test]
async fn test_reports_rows() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002", "0003"]).await;
    let group = group_with(&storage, "Robot", &["0001", "0002"]).await;
    storage
        .upsert_assessment(group, Instrument::Paper, 4.0, None)
        .await
        .unwrap();

    let rows = storage.grade_report_rows(None).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].group_id, Some(group));
    assert_eq!(rows[0].paper, Some(4.0));
    assert_eq!(rows[0].offering_code, "TGI-2025");
    assert_eq!(rows[2].group_id, None);

    assert!(storage.grade_report_rows(Some(&[][..])).await.unwrap().is_empty());

    let roster = storage.group_roster_rows(None).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].members.len(), 2);
}

#[tokio::test]
async fn test_unique_violation_during_apply_rolls_back_reconcile() {
    let storage = storage().await;
    let ids = seed_students(&storage, &["0001", "0002", "0003"]).await;
    let group5 = group_with(&storage, "Group 5", &["0001"]).await;
    let group7 = group_with(&storage, "Group 7", &["0002"]).await;

    // 并发写入：0003 在对账规划之后被放进 Group 5
    storage
        .db
        .execute_unprepared(&format!(
            "CREATE TRIGGER concurrent_member BEFORE INSERT ON group_students \
             WHEN NEW.student_id = {student} AND NEW.group_id = {group7} \
             BEGIN INSERT INTO group_students (group_id, student_id, created_at) \
             VALUES ({group5}, {student}, 0); END",
            student = ids[2],
        ))
        .await
        .unwrap();

    let err = storage
        .reconcile_group_members(group7, &strings(&["0003"]), false)
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::Conflict(_)));

    // 0002 的移除一并撤销
    assert_eq!(member_rgms(&storage, group7).await, vec!["0002"]);
    assert_eq!(member_rgms(&storage, group5).await, vec!["0001"]);
}

#[tokio::test]
async fn test_inactive_professor_cannot_advise() {
    let storage = storage().await;
    let outcome = storage
        .create_user(CreateUserRequest {
            email: "bia@example.com".to_string(),
            full_name: "Bia".to_string(),
            password: "hash".to_string(),
            role: UserRole::Professor,
            is_active: false,
            offering_ids: Vec::new(),
            reassign_offerings: false,
        })
        .await
        .unwrap();
    let GuardOutcome::Applied(user) = outcome else {
        panic!("unexpected conflict");
    };

    let err = storage
        .create_group(GroupRequest {
            title: Some("Robot".to_string()),
            advisor_id: Some(user.id),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TgiSystemError::Validation(_)));
}

#[tokio::test]
async fn test_import_dry_run_keeps_memberships_and_ids() {
    let storage = storage().await;
    seed_students(&storage, &["0001", "0002"]).await;
    let group5 = group_with(&storage, "Group 5", &["0001"]).await;

    let rows = vec![
        ImportRow {
            line: 2,
            advisor: String::new(),
            title: "Robot".to_string(),
            rgms: strings(&["0001", "0002"]),
        },
        ImportRow {
            line: 3,
            advisor: String::new(),
            title: "Drone".to_string(),
            rgms: strings(&["0002"]),
        },
    ];
    let batch = ImportBatch::from_rows(&rows);

    let preview = storage
        .import_groups(
            &batch,
            ImportQuery {
                dry_run: true,
                allow_reassignment: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(preview.created_groups, vec!["Robot", "Drone"]);
    assert_eq!(preview.reassigned.len(), 2);
    assert_eq!(preview.reassigned[0].current_group_id, group5);
    // 试运行中 0002 先进入 Robot，随后改派到 Drone
    assert_eq!(preview.reassigned[1].current_group_title, "Robot");
    assert_eq!(preview.linked.len(), 1);

    assert_eq!(member_rgms(&storage, group5).await, vec!["0001"]);
    let next = group_with(&storage, "Group 6", &[]).await;
    assert_eq!(next, group5 + 1);
}
