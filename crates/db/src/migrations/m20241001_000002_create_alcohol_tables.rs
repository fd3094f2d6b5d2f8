//! Create alcohol_type and alcohol_record tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlcoholType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlcoholType::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlcoholType::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(AlcoholType::AlcoholContentPerServing)
                            .double()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alcohol_type_name")
                    .table(AlcoholType::Table)
                    .col(AlcoholType::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlcoholRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlcoholRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlcoholRecord::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(AlcoholRecord::Date).date().not_null())
                    .col(
                        ColumnDef::new(AlcoholRecord::AlcoholTypeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlcoholRecord::Servings)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AlcoholRecord::DrinkingDuration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AlcoholRecord::Weather).string_len(16).not_null())
                    .col(ColumnDef::new(AlcoholRecord::Mood).string_len(16).not_null())
                    .col(
                        ColumnDef::new(AlcoholRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AlcoholRecord::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alcohol_record_user")
                            .from(AlcoholRecord::Table, AlcoholRecord::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alcohol_record_alcohol_type")
                            .from(AlcoholRecord::Table, AlcoholRecord::AlcoholTypeId)
                            .to(AlcoholType::Table, AlcoholType::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per user per calendar date
        manager
            .create_index(
                Index::create()
                    .name("idx_alcohol_record_user_date")
                    .table(AlcoholRecord::Table)
                    .col(AlcoholRecord::UserId)
                    .col(AlcoholRecord::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alcohol_record_alcohol_type_id")
                    .table(AlcoholRecord::Table)
                    .col(AlcoholRecord::AlcoholTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlcoholRecord::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AlcoholType::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum AlcoholType {
    Table,
    Id,
    Name,
    AlcoholContentPerServing,
}

#[derive(Iden)]
enum AlcoholRecord {
    Table,
    Id,
    UserId,
    Date,
    AlcoholTypeId,
    Servings,
    DrinkingDuration,
    Weather,
    Mood,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
