use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
    TransactionTrait,
};

use crate::entity::{
    car_make,
    car_model::{self, CarType},
};

const SAMPLE_CATALOG: [(&str, &str, [(&str, CarType, i32); 2]); 4] = [
    (
        "Toyota",
        "Japanese manufacturer known for reliable sedans and hybrids.",
        [("Camry", CarType::Sedan, 2023), ("RAV4", CarType::Suv, 2022)],
    ),
    (
        "Honda",
        "Japanese manufacturer of compact cars and crossovers.",
        [("Civic", CarType::Sedan, 2022), ("CR-V", CarType::Suv, 2021)],
    ),
    (
        "Ford",
        "American manufacturer of trucks and muscle cars.",
        [("F-150", CarType::Truck, 2023), ("Mustang", CarType::Coupe, 2020)],
    ),
    (
        "Chevrolet",
        "American manufacturer with a long line of pickups.",
        [("Silverado", CarType::Truck, 2023), ("Malibu", CarType::Sedan, 2019)],
    ),
];

/// Inserts the sample makes and models when no make exists yet.
/// Returns whether anything was inserted.
pub async fn seed_if_empty(db: &DatabaseConnection) -> anyhow::Result<bool> {
    let existing = car_make::Entity::find()
        .count(db)
        .await
        .context("failed to count car makes")?;
    if existing > 0 {
        trace!("car catalog already has {} makes. skipping seed", existing);
        return Ok(false);
    }

    let txn = db.begin().await.context("failed to begin transaction")?;
    for (name, description, models) in SAMPLE_CATALOG {
        let make = car_make::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            description: ActiveValue::Set(description.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .with_context(|| format!("failed to insert car make {}", name))?;

        for (model_name, body_type, year) in models {
            car_model::ActiveModel {
                car_make_id: ActiveValue::Set(make.id),
                name: ActiveValue::Set(model_name.to_string()),
                body_type: ActiveValue::Set(body_type),
                year: ActiveValue::Set(year),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .with_context(|| format!("failed to insert car model {}", model_name))?;
        }
    }
    txn.commit().await.context("failed to commit car catalog")?;

    info!("seeded car catalog with {} makes", SAMPLE_CATALOG.len());
    Ok(true)
}

pub async fn list_makes(db: &DatabaseConnection) -> anyhow::Result<Vec<car_make::Model>> {
    car_make::Entity::find()
        .order_by_asc(car_make::Column::Id)
        .all(db)
        .await
        .context("failed to list car makes")
}

/// Every model paired with its make.
pub async fn list_models(
    db: &DatabaseConnection,
) -> anyhow::Result<Vec<(car_model::Model, car_make::Model)>> {
    let rows = car_model::Entity::find()
        .find_also_related(car_make::Entity)
        .order_by_asc(car_model::Column::Id)
        .all(db)
        .await
        .context("failed to list car models")?;

    Ok(rows
        .into_iter()
        .filter_map(|(model, make)| make.map(|make| (model, make)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let db = database::connect_in_memory().await.unwrap();

        assert!(seed_if_empty(&db).await.unwrap());
        assert!(!seed_if_empty(&db).await.unwrap());

        let makes = list_makes(&db).await.unwrap();
        let names: Vec<&str> = makes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Toyota", "Honda", "Ford", "Chevrolet"]);
        assert_eq!(list_models(&db).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn models_carry_their_make() {
        let db = database::connect_in_memory().await.unwrap();
        seed_if_empty(&db).await.unwrap();

        let models = list_models(&db).await.unwrap();
        let (f150, ford) = models
            .iter()
            .find(|(model, _)| model.name == "F-150")
            .unwrap();
        assert_eq!(ford.name, "Ford");
        assert_eq!(f150.body_type, CarType::Truck);
        assert!(car_model::YEARS.contains(&f150.year));
    }
}
