use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "car_makes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::car_model::Entity")]
    CarModel,
}

impl Related<super::car_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarModel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
