//! Records exchanged with the dealership and sentiment services.
//!
//! Upstream records are kept as the JSON the dealership service sent, so the
//! JSON API echoes them unchanged. Pages read them through lenient
//! accessors that tolerate missing fields and mismatched scalar types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::entity::dealer_review;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sentiment {
    #[sea_orm(string_value = "positive")]
    Positive,
    #[sea_orm(string_value = "negative")]
    Negative,
    #[default]
    #[sea_orm(string_value = "neutral")]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// A dealership exactly as the dealership service sent it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dealer(pub Value);

impl Dealer {
    pub fn id(&self) -> Option<i64> {
        int_field(&self.0, "id")
    }

    /// Text of a field, empty when it is missing or not a scalar.
    pub fn field(&self, key: &str) -> String {
        text_field(&self.0, key)
    }
}

/// A review exactly as the dealership service (or the local store) sent it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewRecord(pub Value);

impl ReviewRecord {
    pub fn field(&self, key: &str) -> String {
        text_field(&self.0, key)
    }

    /// Accepts `true`, `"true"`, `"on"` and non-zero numbers.
    pub fn purchased(&self) -> bool {
        match self.0.get("purchase") {
            Some(Value::Bool(purchase)) => *purchase,
            Some(Value::String(purchase)) => matches!(
                purchase.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "yes" | "1"
            ),
            Some(Value::Number(purchase)) => purchase.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from(self.field("sentiment"))
    }
}

impl From<dealer_review::Model> for ReviewRecord {
    fn from(review: dealer_review::Model) -> Self {
        ReviewRecord(json!({
            "id": review.id,
            "name": review.name,
            "dealership": review.dealership,
            "review": review.review,
            "purchase": review.purchase,
            "purchase_date": review.purchase_date.format("%Y-%m-%d").to_string(),
            "car_make": review.car_make,
            "car_model": review.car_model,
            "car_year": review.car_year,
            "sentiment": review.sentiment.as_str(),
        }))
    }
}

fn text_field(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn int_field(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sentiment_label_is_neutral() {
        let parsed: Sentiment = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(parsed, Sentiment::Neutral);
        let parsed: Sentiment = serde_json::from_str("\"Positive\"").unwrap();
        assert_eq!(parsed, Sentiment::Positive);
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"negative\""
        );
    }

    #[test]
    fn accessors_tolerate_mismatched_types() {
        let dealer = Dealer(json!({
            "_id": "65a1",
            "id": "7",
            "city": "Reno",
            "zip": 89501
        }));
        assert_eq!(dealer.id(), Some(7));
        assert_eq!(dealer.field("zip"), "89501");
        assert_eq!(dealer.field("short_name"), "");

        let review = ReviewRecord(json!({
            "car_year": "2023",
            "purchase": "true",
            "sentiment": "Negative"
        }));
        assert!(review.purchased());
        assert_eq!(review.field("car_year"), "2023");
        assert_eq!(review.sentiment(), Sentiment::Negative);
        assert!(!ReviewRecord(json!({"purchase": 0})).purchased());
        assert_eq!(ReviewRecord(json!([1, 2])).sentiment(), Sentiment::Neutral);
    }

    #[test]
    fn review_record_from_stored_review() {
        let stored = dealer_review::Model {
            id: 3,
            name: "Ann".to_string(),
            dealership: 2,
            review: "fine".to_string(),
            purchase: true,
            purchase_date: chrono::NaiveDate::from_ymd_opt(2023, 4, 9).unwrap(),
            car_make: "Ford".to_string(),
            car_model: "F-150".to_string(),
            car_year: 2021,
            sentiment: Sentiment::Positive,
        };

        let record = ReviewRecord::from(stored);
        assert_eq!(record.field("purchase_date"), "2023-04-09");
        assert!(record.purchased());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["id"], 3);
        assert_eq!(json["dealership"], 2);
    }
}
