use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CarMakes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarMakes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CarMakes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(CarMakes::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CarModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarModels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CarModels::CarMakeId).integer().not_null())
                    .col(ColumnDef::new(CarModels::Name).string_len(100).not_null())
                    .col(ColumnDef::new(CarModels::Type).string_len(20).not_null())
                    .col(ColumnDef::new(CarModels::Year).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-car_models-car_make_id")
                            .from(CarModels::Table, CarModels::CarMakeId)
                            .to(CarMakes::Table, CarMakes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CarModels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CarMakes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CarMakes {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum CarModels {
    Table,
    Id,
    CarMakeId,
    Name,
    Type,
    Year,
}
