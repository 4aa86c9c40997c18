use sea_orm::entity::prelude::*;

use crate::model::Sentiment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dealer_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Upstream dealer id. Not a foreign key.
    pub dealership: i32,
    #[sea_orm(column_type = "Text")]
    pub review: String,
    pub purchase: bool,
    pub purchase_date: Date,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
    pub sentiment: Sentiment,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
