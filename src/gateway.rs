//! Client for the dealership service.
//!
//! A 200 answer whose body is a JSON array is passed through record by
//! record without schema checks. Transport failures and bodies that are not
//! a JSON array fall back to local data: the fixed dealer fixture for
//! listings, the local review table for reviews. A non-200 answer is
//! reported as [`Fetched::Rejected`] and reads as an empty list.

use anyhow::Context;
use reqwest::StatusCode;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    entity::dealer_review,
    model::{Dealer, ReviewRecord},
};

/// Outcome of a call to an upstream service.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<T> {
    /// The service answered 200 with a decodable body.
    Remote(Vec<T>),
    /// The service was unreachable or sent garbage; local data was used.
    Fallback(Vec<T>),
    /// The service answered with a non-200 status.
    Rejected(StatusCode),
}

impl<T> Fetched<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Fetched::Remote(items) | Fetched::Fallback(items) => items,
            Fetched::Rejected(_) => Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Fetched::Remote(_))
    }
}

#[derive(Clone)]
pub struct DealershipService {
    client: reqwest::Client,
    base_url: String,
}

impl DealershipService {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> DealershipService {
        DealershipService {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Lists dealerships, optionally filtered by state name. An empty
    /// state means no filter.
    pub async fn fetch_dealerships(&self, state: Option<&str>) -> Fetched<Dealer> {
        let path = match state.filter(|s| !s.is_empty()) {
            Some(state) => format!("/dealerships/{}", urlencoding::encode(state)),
            None => "/dealerships".to_string(),
        };

        match self.get_list::<Dealer>(&path).await {
            Ok(Ok(dealers)) => Fetched::Remote(dealers),
            Ok(Err(status)) => Fetched::Rejected(status),
            Err(err) => {
                warn!(
                    "dealership service unavailable ({:#}). serving fixture dealerships",
                    err
                );
                Fetched::Fallback(fixture_dealerships())
            }
        }
    }

    /// Lists reviews for a dealer. When the service is unreachable the
    /// locally stored reviews are returned in storage order.
    pub async fn fetch_reviews(
        &self,
        db: &DatabaseConnection,
        dealer_id: i32,
    ) -> anyhow::Result<Fetched<ReviewRecord>> {
        let path = format!("/reviews/dealer/{}", dealer_id);

        match self.get_list::<ReviewRecord>(&path).await {
            Ok(Ok(reviews)) => Ok(Fetched::Remote(reviews)),
            Ok(Err(status)) => Ok(Fetched::Rejected(status)),
            Err(err) => {
                warn!(
                    "dealership service unavailable ({:#}). serving local reviews for dealer {}",
                    err, dealer_id
                );
                let reviews = local_reviews(db, dealer_id).await?;
                Ok(Fetched::Fallback(reviews))
            }
        }
    }

    /// Looks a dealer up in the unfiltered listing.
    pub async fn find_dealer(&self, dealer_id: i32) -> Option<Dealer> {
        self.fetch_dealerships(None)
            .await
            .into_vec()
            .into_iter()
            .find(|dealer| dealer.id() == Some(dealer_id.into()))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> anyhow::Result<Result<Vec<T>, StatusCode>> {
        let url = format!("{}{}", self.base_url, path);
        trace!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("GET {} answered {}", url, status);
            return Ok(Err(status));
        }

        let items = response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("failed to decode response from {}", url))?;
        Ok(Ok(items))
    }
}

pub async fn local_reviews(
    db: &DatabaseConnection,
    dealer_id: i32,
) -> anyhow::Result<Vec<ReviewRecord>> {
    let reviews = dealer_review::Entity::find()
        .filter(dealer_review::Column::Dealership.eq(dealer_id))
        .order_by_asc(dealer_review::Column::Id)
        .all(db)
        .await
        .context("failed to load local reviews")?;

    Ok(reviews.into_iter().map(ReviewRecord::from).collect())
}

/// Dealers served while the dealership service is down.
pub fn fixture_dealerships() -> Vec<Dealer> {
    [
        json!({
            "id": 1,
            "city": "Brooklyn",
            "state": "New York",
            "st": "NY",
            "address": "123 Main St",
            "zip": "11201",
            "lat": 40.6892,
            "long": -73.9442,
            "short_name": "Brooklyn Motors",
            "full_name": "Brooklyn Motors Car Dealership"
        }),
        json!({
            "id": 2,
            "city": "Austin",
            "state": "Texas",
            "st": "TX",
            "address": "456 Oak Ave",
            "zip": "73301",
            "lat": 30.2672,
            "long": -97.7431,
            "short_name": "Austin Auto",
            "full_name": "Austin Auto Sales"
        }),
        json!({
            "id": 3,
            "city": "Topeka",
            "state": "Kansas",
            "st": "KS",
            "address": "789 Pine St",
            "zip": "66603",
            "lat": 39.0473,
            "long": -95.6890,
            "short_name": "Kansas Cars",
            "full_name": "Kansas Car Center"
        }),
    ]
    .into_iter()
    .map(Dealer)
    .collect()
}
