use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patrols::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patrols::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Patrols::OfficerId).uuid().not_null())
                    .col(ColumnDef::new(Patrols::StartTime).date_time().not_null())
                    .col(ColumnDef::new(Patrols::EndTime).date_time())
                    .col(
                        ColumnDef::new(Patrols::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Patrols::Distance)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Patrols::Notes).text())
                    .col(ColumnDef::new(Patrols::Area).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patrols_officer")
                            .from(Patrols::Table, Patrols::OfficerId)
                            .to(Officers::Table, Officers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Samples are the patrol's route; one insert per GPS fix, ordered by
        // `sequence` within a patrol.
        manager
            .create_table(
                Table::create()
                    .table(PatrolLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PatrolLocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PatrolLocations::PatrolId).uuid().not_null())
                    .col(ColumnDef::new(PatrolLocations::OfficerId).uuid().not_null())
                    .col(ColumnDef::new(PatrolLocations::Sequence).integer().not_null())
                    .col(ColumnDef::new(PatrolLocations::Latitude).double().not_null())
                    .col(ColumnDef::new(PatrolLocations::Longitude).double().not_null())
                    .col(ColumnDef::new(PatrolLocations::Accuracy).double())
                    .col(ColumnDef::new(PatrolLocations::Speed).double())
                    .col(
                        ColumnDef::new(PatrolLocations::Timestamp)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patrol_locations_patrol")
                            .from(PatrolLocations::Table, PatrolLocations::PatrolId)
                            .to(Patrols::Table, Patrols::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patrol_locations_officer")
                            .from(PatrolLocations::Table, PatrolLocations::OfficerId)
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
                    .name("idx_patrol_locations_patrol_sequence")
                    .table(PatrolLocations::Table)
                    .col(PatrolLocations::PatrolId)
                    .col(PatrolLocations::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PatrolLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Patrols::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patrols {
    Table,
    Id,
    OfficerId,
    StartTime,
    EndTime,
    Status,
    Distance,
    Notes,
    Area,
}

#[derive(DeriveIden)]
enum PatrolLocations {
    Table,
    Id,
    PatrolId,
    OfficerId,
    Sequence,
    Latitude,
    Longitude,
    Accuracy,
    Speed,
    Timestamp,
}

#[derive(DeriveIden)]
enum Officers {
    Table,
    Id,
}
