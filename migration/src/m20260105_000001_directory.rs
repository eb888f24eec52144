use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Teammates {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Position,
    Department,
    Branch,
    Nmls,
    HeadshotUrl,
    StartDate,
    Birthday,
    OnboardingStatus,
    Linkedin,
    Calendly,
    ManagerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeammateTags {
    Table,
    Id,
    TeammateId,
    TagName,
    TagColor,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LicensedStates {
    Table,
    Id,
    StateCode,
    StateName,
}

#[derive(DeriveIden)]
enum TeammateLicensedStates {
    Table,
    Id,
    TeammateId,
    LicensedStateId,
    LicenseNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClientReviews {
    Table,
    Id,
    TeammateId,
    ClientName,
    ReviewText,
    Rating,
    ReviewDate,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teammates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teammates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teammates::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Teammates::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Teammates::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Teammates::Phone).string_len(64))
                    .col(ColumnDef::new(Teammates::Position).string_len(128).not_null())
                    .col(ColumnDef::new(Teammates::Department).string_len(64).not_null())
                    .col(ColumnDef::new(Teammates::Branch).string_len(64).not_null())
                    .col(ColumnDef::new(Teammates::Nmls).string_len(64))
                    .col(ColumnDef::new(Teammates::HeadshotUrl).string_len(1024))
                    .col(ColumnDef::new(Teammates::StartDate).date())
                    .col(ColumnDef::new(Teammates::Birthday).date())
                    .col(
                        ColumnDef::new(Teammates::OnboardingStatus)
                            .string_len(32)
                            .not_null()
                            .default("Not started"),
                    )
                    .col(ColumnDef::new(Teammates::Linkedin).string_len(512))
                    .col(ColumnDef::new(Teammates::Calendly).string_len(512))
                    .col(ColumnDef::new(Teammates::ManagerId).uuid())
                    .col(
                        ColumnDef::new(Teammates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Teammates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teammates_manager")
                            .from(Teammates::Table, Teammates::ManagerId)
                            .to(Teammates::Table, Teammates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teammates_email")
                    .table(Teammates::Table)
                    .col(Teammates::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teammates_name")
                    .table(Teammates::Table)
                    .col(Teammates::FirstName)
                    .col(Teammates::LastName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeammateTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TeammateTags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TeammateTags::TeammateId).uuid().not_null())
                    .col(ColumnDef::new(TeammateTags::TagName).string_len(64).not_null())
                    .col(ColumnDef::new(TeammateTags::TagColor).string_len(32))
                    .col(
                        ColumnDef::new(TeammateTags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teammate_tags_teammate")
                            .from(TeammateTags::Table, TeammateTags::TeammateId)
                            .to(Teammates::Table, Teammates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teammate_tags_unique")
                    .table(TeammateTags::Table)
                    .col(TeammateTags::TeammateId)
                    .col(TeammateTags::TagName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LicensedStates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LicensedStates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(LicensedStates::StateCode).string_len(2).not_null())
                    .col(ColumnDef::new(LicensedStates::StateName).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_licensed_states_code")
                    .table(LicensedStates::Table)
                    .col(LicensedStates::StateCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeammateLicensedStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeammateLicensedStates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeammateLicensedStates::TeammateId).uuid().not_null())
                    .col(
                        ColumnDef::new(TeammateLicensedStates::LicensedStateId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeammateLicensedStates::LicenseNumber).string_len(64))
                    .col(
                        ColumnDef::new(TeammateLicensedStates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teammate_licenses_teammate")
                            .from(TeammateLicensedStates::Table, TeammateLicensedStates::TeammateId)
                            .to(Teammates::Table, Teammates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teammate_licenses_state")
                            .from(
                                TeammateLicensedStates::Table,
                                TeammateLicensedStates::LicensedStateId,
                            )
                            .to(LicensedStates::Table, LicensedStates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientReviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClientReviews::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ClientReviews::TeammateId).uuid().not_null())
                    .col(ColumnDef::new(ClientReviews::ClientName).string_len(256).not_null())
                    .col(ColumnDef::new(ClientReviews::ReviewText).text().not_null())
                    .col(ColumnDef::new(ClientReviews::Rating).small_integer().not_null())
                    .col(ColumnDef::new(ClientReviews::ReviewDate).date())
                    .col(
                        ColumnDef::new(ClientReviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_reviews_teammate")
                            .from(ClientReviews::Table, ClientReviews::TeammateId)
                            .to(Teammates::Table, Teammates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeammateLicensedStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LicensedStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeammateTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teammates::Table).to_owned())
            .await
    }
}
