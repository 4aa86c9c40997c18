use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DealerReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DealerReviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DealerReviews::Name).string_len(100).not_null())
                    // dealer ids live in the upstream service, so no foreign key here
                    .col(ColumnDef::new(DealerReviews::Dealership).integer().not_null())
                    .col(ColumnDef::new(DealerReviews::Review).text().not_null())
                    .col(ColumnDef::new(DealerReviews::Purchase).boolean().not_null())
                    .col(ColumnDef::new(DealerReviews::PurchaseDate).date().not_null())
                    .col(ColumnDef::new(DealerReviews::CarMake).string_len(100).not_null())
                    .col(ColumnDef::new(DealerReviews::CarModel).string_len(100).not_null())
                    .col(ColumnDef::new(DealerReviews::CarYear).integer().not_null())
                    .col(
                        ColumnDef::new(DealerReviews::Sentiment)
                            .string_len(20)
                            .not_null()
                            .default("neutral"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dealer_reviews-dealership")
                    .table(DealerReviews::Table)
                    .col(DealerReviews::Dealership)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DealerReviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DealerReviews {
    Table,
    Id,
    Name,
    Dealership,
    Review,
    Purchase,
    PurchaseDate,
    CarMake,
    CarModel,
    CarYear,
    Sentiment,
}
