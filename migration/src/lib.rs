pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_table_car_catalog;
mod m20240301_000002_create_table_dealer_reviews;
mod m20240301_000003_create_table_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_table_car_catalog::Migration),
            Box::new(m20240301_000002_create_table_dealer_reviews::Migration),
            Box::new(m20240301_000003_create_table_users::Migration),
        ]
    }
}
