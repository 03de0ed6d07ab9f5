use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 校区表
        manager
            .create_table(
                Table::create()
                    .table(Campuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campuses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Campuses::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Campuses::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 开课（班次）表，professor_id 为空表示尚未分配负责教师
        manager
            .create_table(
                Table::create()
                    .table(Offerings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offerings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Offerings::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Offerings::Description).text().null())
                    .col(ColumnDef::new(Offerings::ProfessorId).big_integer().null())
                    .col(ColumnDef::new(Offerings::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Offerings::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Offerings::Table, Offerings::ProfessorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::Rgm)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::CampusId).big_integer().not_null())
                    .col(ColumnDef::new(Students::OfferingId).big_integer().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::CampusId)
                            .to(Campuses::Table, Campuses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::OfferingId)
                            .to(Offerings::Table, Offerings::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // TGI 小组表（标题列由后续迁移添加）
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::AdvisorId).big_integer().null())
                    .col(ColumnDef::new(Groups::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Groups::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Groups::Table, Groups::AdvisorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 小组成员表：主键为 (group_id, student_id)，另有 student_id 唯一索引
        manager
            .create_table(
                Table::create()
                    .table(GroupStudents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupStudents::GroupId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GroupStudents::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupStudents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GroupStudents::GroupId)
                            .col(GroupStudents::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupStudents::Table, GroupStudents::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupStudents::Table, GroupStudents::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 小组教师关联表
        manager
            .create_table(
                Table::create()
                    .table(GroupProfessors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupProfessors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupProfessors::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupProfessors::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupProfessors::RoleInGroup)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupProfessors::Table, GroupProfessors::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupProfessors::Table, GroupProfessors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 小组评分表
        manager
            .create_table(
                Table::create()
                    .table(GroupAssessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupAssessments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupAssessments::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupAssessments::Instrument)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupAssessments::Score)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupAssessments::EnteredBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GroupAssessments::EnteredAt)
                            .big_integer()
                            .not_null(),
                    )
                    .check(
                        Expr::col(GroupAssessments::Score)
                            .gte(0.0)
                            .and(Expr::col(GroupAssessments::Score).lte(10.0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupAssessments::Table, GroupAssessments::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupAssessments::Table, GroupAssessments::EnteredBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 海报评价表
        manager
            .create_table(
                Table::create()
                    .table(BannerEvaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BannerEvaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BannerEvaluations::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BannerEvaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BannerEvaluations::Score)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BannerEvaluations::Comments).text().null())
                    .col(
                        ColumnDef::new(BannerEvaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .check(
                        Expr::col(BannerEvaluations::Score)
                            .gte(0.0)
                            .and(Expr::col(BannerEvaluations::Score).lte(5.0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BannerEvaluations::Table, BannerEvaluations::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BannerEvaluations::Table, BannerEvaluations::EvaluatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_offerings_professor_id")
                    .table(Offerings::Table)
                    .col(Offerings::ProfessorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_campus_id")
                    .table(Students::Table)
                    .col(Students::CampusId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_offering_id")
                    .table(Students::Table)
                    .col(Students::OfferingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tgi_groups_advisor_id")
                    .table(Groups::Table)
                    .col(Groups::AdvisorId)
                    .to_owned(),
            )
            .await?;

        // 一个学生最多属于一个小组
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_group_students_student")
                    .table(GroupStudents::Table)
                    .col(GroupStudents::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_group_professors_link")
                    .table(GroupProfessors::Table)
                    .col(GroupProfessors::GroupId)
                    .col(GroupProfessors::UserId)
                    .col(GroupProfessors::RoleInGroup)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_group_assessments_instrument")
                    .table(GroupAssessments::Table)
                    .col(GroupAssessments::GroupId)
                    .col(GroupAssessments::Instrument)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_banner_evaluations_evaluator")
                    .table(BannerEvaluations::Table)
                    .col(BannerEvaluations::GroupId)
                    .col(BannerEvaluations::EvaluatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(BannerEvaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupAssessments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupProfessors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offerings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Campuses {
    #[sea_orm(iden = "campuses")]
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Offerings {
    #[sea_orm(iden = "offerings")]
    Table,
    Id,
    Code,
    Description,
    ProfessorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Rgm,
    Name,
    CampusId,
    OfferingId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Groups {
    #[sea_orm(iden = "tgi_groups")]
    Table,
    Id,
    AdvisorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GroupStudents {
    #[sea_orm(iden = "group_students")]
    Table,
    GroupId,
    StudentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupProfessors {
    #[sea_orm(iden = "group_professors")]
    Table,
    Id,
    GroupId,
    UserId,
    RoleInGroup,
}

#[derive(DeriveIden)]
enum GroupAssessments {
    #[sea_orm(iden = "group_assessments")]
    Table,
    Id,
    GroupId,
    Instrument,
    Score,
    EnteredBy,
    EnteredAt,
}

#[derive(DeriveIden)]
enum BannerEvaluations {
    #[sea_orm(iden = "banner_evaluations")]
    Table,
    Id,
    GroupId,
    EvaluatorId,
    Score,
    Comments,
    CreatedAt,
}
