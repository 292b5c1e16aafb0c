use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Incidents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Incidents::IncidentType).string_len(32).not_null())
                    .col(ColumnDef::new(Incidents::Description).text().not_null())
                    .col(ColumnDef::new(Incidents::Latitude).double().not_null())
                    .col(ColumnDef::new(Incidents::Longitude).double().not_null())
                    .col(ColumnDef::new(Incidents::Address).string())
                    .col(ColumnDef::new(Incidents::ReportedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Incidents::Severity)
                            .string_len(32)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Incidents::Status)
                            .string_len(32)
                            .not_null()
                            .default("reported"),
                    )
                    .col(ColumnDef::new(Incidents::Images).json().not_null())
                    .col(ColumnDef::new(Incidents::Timestamp).date_time().not_null())
                    .col(ColumnDef::new(Incidents::ResolvedAt).date_time())
                    .col(ColumnDef::new(Incidents::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_reported_by")
                            .from(Incidents::Table, Incidents::ReportedBy)
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
                    .name("idx_incidents_timestamp")
                    .table(Incidents::Table)
                    .col(Incidents::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_status")
                    .table(Incidents::Table)
                    .col(Incidents::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Incidents {
    Table,
    Id,
    IncidentType,
    Description,
    Latitude,
    Longitude,
    Address,
    ReportedBy,
    Severity,
    Status,
    Images,
    Timestamp,
    ResolvedAt,
    Notes,
}

#[derive(DeriveIden)]
enum Officers {
    Table,
    Id,
}
