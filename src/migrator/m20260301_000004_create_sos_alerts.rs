use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SosAlerts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SosAlerts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SosAlerts::OfficerId).uuid().not_null())
                    .col(ColumnDef::new(SosAlerts::Latitude).double().not_null())
                    .col(ColumnDef::new(SosAlerts::Longitude).double().not_null())
                    .col(ColumnDef::new(SosAlerts::Timestamp).date_time().not_null())
                    .col(
                        ColumnDef::new(SosAlerts::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(SosAlerts::Priority)
                            .string_len(32)
                            .not_null()
                            .default("critical"),
                    )
                    .col(ColumnDef::new(SosAlerts::Notes).text())
                    .col(ColumnDef::new(SosAlerts::AcknowledgedBy).string())
                    .col(ColumnDef::new(SosAlerts::AcknowledgedAt).date_time())
                    .col(ColumnDef::new(SosAlerts::ResolvedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sos_alerts_officer")
                            .from(SosAlerts::Table, SosAlerts::OfficerId)
                            .to(Officers::Table, Officers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sos_alerts_status")
                    .table(SosAlerts::Table)
                    .col(SosAlerts::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SosAlerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SosAlerts {
    Table,
    Id,
    OfficerId,
    Latitude,
    Longitude,
    Timestamp,
    Status,
    Priority,
    Notes,
    AcknowledgedBy,
    AcknowledgedAt,
    ResolvedAt,
}

#[derive(DeriveIden)]
enum Officers {
    Table,
    Id,
}
