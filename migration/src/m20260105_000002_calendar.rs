use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum CalendarEvents {
    Table,
    Id,
    Title,
    EventDate,
    StartTime,
    EndTime,
    AllDay,
    Category,
    Location,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CalendarEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CalendarEvents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CalendarEvents::Title).string_len(200).not_null())
                    .col(ColumnDef::new(CalendarEvents::EventDate).date().not_null())
                    .col(ColumnDef::new(CalendarEvents::StartTime).time())
                    .col(ColumnDef::new(CalendarEvents::EndTime).time())
                    .col(
                        ColumnDef::new(CalendarEvents::AllDay)
                            .boolean()
                            .not_null()
                            .default(Expr::value(false)),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::Category)
                            .string_len(32)
                            .not_null()
                            .default("meeting"),
                    )
                    .col(ColumnDef::new(CalendarEvents::Location).string_len(200))
                    .col(ColumnDef::new(CalendarEvents::Description).text())
                    .col(
                        ColumnDef::new(CalendarEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_calendar_events_date")
                    .table(CalendarEvents::Table)
                    .col(CalendarEvents::EventDate)
                    .col(CalendarEvents::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CalendarEvents::Table).to_owned())
            .await
    }
}
