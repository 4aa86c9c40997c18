use std::ops::RangeInclusive;

use sea_orm::{entity::prelude::*, ActiveValue};
use serde::Serialize;

/// Model years a [`Model`] may carry.
pub const YEARS: RangeInclusive<i32> = 2015..=2023;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum CarType {
    #[sea_orm(string_value = "SUV")]
    Suv,
    #[sea_orm(string_value = "SEDAN")]
    Sedan,
    #[sea_orm(string_value = "WAGON")]
    Wagon,
    #[sea_orm(string_value = "HATCHBACK")]
    Hatchback,
    #[sea_orm(string_value = "CONVERTIBLE")]
    Convertible,
    #[sea_orm(string_value = "COUPE")]
    Coupe,
    #[sea_orm(string_value = "TRUCK")]
    Truck,
}

impl CarType {
    pub fn label(&self) -> &'static str {
        match self {
            CarType::Suv => "SUV",
            CarType::Sedan => "Sedan",
            CarType::Wagon => "Wagon",
            CarType::Hatchback => "Hatchback",
            CarType::Convertible => "Convertible",
            CarType::Coupe => "Coupe",
            CarType::Truck => "Truck",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "car_models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub car_make_id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub body_type: CarType,
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car_make::Entity",
        from = "Column::CarMakeId",
        to = "super::car_make::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CarMake,
}

impl Related<super::car_make::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarMake.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(year) | ActiveValue::Unchanged(year) = &self.year {
            if !YEARS.contains(year) {
                return Err(DbErr::Custom(format!(
                    "car model year {} is outside {}..={}",
                    year,
                    YEARS.start(),
                    YEARS.end()
                )));
            }
        }
        Ok(self)
    }
}
