use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Officers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Officers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Officers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Officers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Officers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Officers::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Officers::BadgeNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Officers::Station).string().not_null())
                    .col(
                        ColumnDef::new(Officers::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Officers::CurrentLatitude).double())
                    .col(ColumnDef::new(Officers::CurrentLongitude).double())
                    .col(ColumnDef::new(Officers::CurrentLocatedAt).date_time())
                    .col(ColumnDef::new(Officers::DeviceToken).string())
                    .col(ColumnDef::new(Officers::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_officers_status")
                    .table(Officers::Table)
                    .col(Officers::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Officers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Officers {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Phone,
    BadgeNumber,
    Station,
    Status,
    CurrentLatitude,
    CurrentLongitude,
    CurrentLocatedAt,
    DeviceToken,
    CreatedAt,
}
