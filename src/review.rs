use anyhow::Context;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection};
use serde::Deserialize;

use crate::{entity::dealer_review, sentiment::SentimentService};

/// Review form as posted by the browser. Everything arrives as text.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub name: String,
    pub review: String,
    /// Checkbox: absent when unticked.
    pub purchase: Option<String>,
    pub purchase_date: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReview {
    pub name: String,
    pub review: String,
    pub purchase: bool,
    pub purchase_date: chrono::NaiveDate,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
}

impl ReviewForm {
    pub fn validate(&self) -> Result<NewReview, Vec<String>> {
        let mut errors = Vec::new();

        let mut text = |label: &str, value: &str, max: Option<usize>| {
            let value = value.trim();
            if value.is_empty() {
                errors.push(format!("{} is required.", label));
            } else if let Some(max) = max.filter(|max| value.chars().count() > *max) {
                errors.push(format!("{} must be {} characters or fewer.", label, max));
            }
            value.to_string()
        };
        let name = text("Name", &self.name, Some(100));
        let review = text("Review", &self.review, None);
        let car_make = text("Car make", &self.car_make, Some(100));
        let car_model = text("Car model", &self.car_model, Some(100));

        let purchase_date =
            match chrono::NaiveDate::parse_from_str(self.purchase_date.trim(), "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) if self.purchase_date.trim().is_empty() => {
                    errors.push("Purchase date is required.".to_string());
                    None
                }
                Err(_) => {
                    errors.push("Enter a valid purchase date (YYYY-MM-DD).".to_string());
                    None
                }
            };
        let car_year = match self.car_year.trim().parse::<i32>() {
            Ok(year) => Some(year),
            Err(_) => {
                errors.push("Car year must be a whole number.".to_string());
                None
            }
        };

        match (purchase_date, car_year) {
            (Some(purchase_date), Some(car_year)) if errors.is_empty() => Ok(NewReview {
                name,
                review,
                purchase: self.purchased(),
                purchase_date,
                car_make,
                car_model,
                car_year,
            }),
            _ => Err(errors),
        }
    }

    fn purchased(&self) -> bool {
        match self.purchase.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "false" | "0" | "off"),
        }
    }
}

/// Classifies the review text and stores the review against `dealer_id`.
pub async fn submit(
    db: &DatabaseConnection,
    sentiment: &SentimentService,
    dealer_id: i32,
    review: NewReview,
) -> anyhow::Result<dealer_review::Model> {
    let classification = sentiment.classify(&review.review).await;
    debug!("review for dealer {} classified as {:?}", dealer_id, classification);

    let stored = dealer_review::ActiveModel {
        name: ActiveValue::Set(review.name),
        dealership: ActiveValue::Set(dealer_id),
        review: ActiveValue::Set(review.review),
        purchase: ActiveValue::Set(review.purchase),
        purchase_date: ActiveValue::Set(review.purchase_date),
        car_make: ActiveValue::Set(review.car_make),
        car_model: ActiveValue::Set(review.car_model),
        car_year: ActiveValue::Set(review.car_year),
        sentiment: ActiveValue::Set(classification.sentiment()),
        ..Default::default()
    }
    .insert(db)
    .await
    .context("failed to insert review")?;

    info!(
        "stored review {} for dealer {} ({})",
        stored.id,
        dealer_id,
        stored.sentiment.as_str()
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database, entity::dealer_review, model::Sentiment, test_support};
    use sea_orm::{EntityTrait, PaginatorTrait};

    fn form() -> ReviewForm {
        ReviewForm {
            name: "Lee".to_string(),
            review: "Wonderful staff".to_string(),
            purchase: Some("on".to_string()),
            purchase_date: "2023-10-15".to_string(),
            car_make: "Toyota".to_string(),
            car_model: "Camry".to_string(),
            car_year: "2023".to_string(),
        }
    }

    #[test]
    fn valid_form_converts() {
        let review = form().validate().unwrap();
        assert!(review.purchase);
        assert_eq!(review.car_year, 2023);
        assert_eq!(review.purchase_date.to_string(), "2023-10-15");
    }

    #[test]
    fn unticked_checkbox_is_no_purchase() {
        let mut unticked = form();
        unticked.purchase = None;
        assert!(!unticked.validate().unwrap().purchase);
    }

    #[test]
    fn invalid_form_lists_errors() {
        let errors = ReviewForm {
            purchase_date: "15/10/2023".to_string(),
            car_year: "soon".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert!(errors.contains(&"Name is required.".to_string()));
        assert!(errors.contains(&"Enter a valid purchase date (YYYY-MM-DD).".to_string()));
        assert!(errors.contains(&"Car year must be a whole number.".to_string()));
        assert_eq!(errors.len(), 6);
    }

    #[tokio::test]
    async fn submit_stores_one_classified_review() {
        let db = database::connect_in_memory().await.unwrap();
        let sentiment = SentimentService::new(reqwest::Client::new(), test_support::UNREACHABLE);

        let stored = submit(&db, &sentiment, 3, form().validate().unwrap())
            .await
            .unwrap();

        assert_eq!(stored.dealership, 3);
        assert_eq!(stored.sentiment, Sentiment::Positive);
        assert_eq!(dealer_review::Entity::find().count(&db).await.unwrap(), 1);
    }
}
