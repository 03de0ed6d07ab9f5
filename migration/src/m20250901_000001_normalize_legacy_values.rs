use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 历史评分项名称 -> 规范名称
const INSTRUMENT_ALIASES: &[(&str, &[&str])] = &[
    (
        "REPORT_I",
        &["RI", "ri", "RELATORIO_I", "relatorio_i", "RelatorioI"],
    ),
    (
        "REPORT_II",
        &["RII", "rii", "RELATORIO_II", "relatorio_ii", "RelatorioII"],
    ),
    ("PAPER", &["paper", "Paper", "ARTIGO", "artigo"]),
];

/// 历史角色值 -> 规范角色
const ROLE_ALIASES: &[(&str, &[&str])] = &[
    ("admin", &["Role.admin", "ADMIN", "Admin"]),
    ("professor", &["Role.professor", "PROFESSOR", "Professor"]),
    (
        "guest",
        &["convidado", "Role.convidado", "Role.guest", "GUEST", "Guest"],
    ),
];

/// 小组教师关系的历史值
const GROUP_ROLE_ALIASES: &[(&str, &[&str])] = &[
    ("ADVISOR", &["ORIENTADOR", "orientador"]),
    ("EVALUATOR", &["AVALIADOR", "avaliador"]),
    ("CO_ADVISOR", &["COORIENTADOR", "coorientador"]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (canonical, aliases) in INSTRUMENT_ALIASES {
            // 同一小组若已存在规范名称的记录，旧记录直接丢弃，避免违反 (group_id, instrument) 唯一约束
            let canonical_groups = Query::select()
                .column(GroupAssessments::GroupId)
                .from(GroupAssessments::Table)
                .and_where(Expr::col(GroupAssessments::Instrument).eq(*canonical))
                .to_owned();
            let delete = Query::delete()
                .from_table(GroupAssessments::Table)
                .and_where(Expr::col(GroupAssessments::Instrument).is_in(aliases.iter().copied()))
                .and_where(
                    Expr::col(GroupAssessments::GroupId).in_subquery(
                        Query::select()
                            .column(GroupAssessments::GroupId)
                            .from_subquery(canonical_groups, CanonicalGroups::Table)
                            .to_owned(),
                    ),
                )
                .to_owned();
            manager.exec_stmt(delete).await?;

            let update = Query::update()
                .table(GroupAssessments::Table)
                .value(GroupAssessments::Instrument, *canonical)
                .and_where(Expr::col(GroupAssessments::Instrument).is_in(aliases.iter().copied()))
                .to_owned();
            manager.exec_stmt(update).await?;
        }

        for (canonical, aliases) in ROLE_ALIASES {
            let update = Query::update()
                .table(Users::Table)
                .value(Users::Role, *canonical)
                .and_where(Expr::col(Users::Role).is_in(aliases.iter().copied()))
                .to_owned();
            manager.exec_stmt(update).await?;
        }

        for (canonical, aliases) in GROUP_ROLE_ALIASES {
            let update = Query::update()
                .table(GroupProfessors::Table)
                .value(GroupProfessors::RoleInGroup, *canonical)
                .and_where(Expr::col(GroupProfessors::RoleInGroup).is_in(aliases.iter().copied()))
                .to_owned();
            manager.exec_stmt(update).await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // 规范化不可逆
        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupAssessments {
    #[sea_orm(iden = "group_assessments")]
    Table,
    GroupId,
    Instrument,
}

#[derive(DeriveIden)]
enum CanonicalGroups {
    #[sea_orm(iden = "canonical_groups")]
    Table,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Role,
}

#[derive(DeriveIden)]
enum GroupProfessors {
    #[sea_orm(iden = "group_professors")]
    Table,
    RoleInGroup,
}
