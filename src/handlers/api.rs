//! JSON endpoints mirroring the upstream services.

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    auth::CurrentUser,
    catalog,
    entity::car_make,
    error::AppError,
    flash::Flashes,
    model::{Dealer, ReviewRecord, Sentiment},
    state::AppState,
    views::{self, PageContext},
};

#[derive(Serialize)]
pub struct Dealerships {
    dealerships: Vec<Dealer>,
}

#[derive(Serialize)]
pub struct Reviews {
    reviews: Vec<ReviewRecord>,
}

#[derive(Serialize)]
pub struct CarMakes {
    car_makes: Vec<car_make::Model>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    text: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    text: String,
    sentiment: Sentiment,
}

pub async fn dealerships(State(state): State<AppState>) -> Json<Dealerships> {
    let dealerships = state.dealerships.fetch_dealerships(None).await.into_vec();
    Json(Dealerships { dealerships })
}

pub async fn dealerships_by_state(
    State(state): State<AppState>,
    Path(us_state): Path<String>,
) -> Json<Dealerships> {
    let dealerships = state
        .dealerships
        .fetch_dealerships(Some(&us_state))
        .await
        .into_vec();
    Json(Dealerships { dealerships })
}

pub async fn dealer_reviews(
    State(state): State<AppState>,
    Path(dealer_id): Path<i32>,
) -> Result<Json<Reviews>, AppError> {
    let reviews = state
        .dealerships
        .fetch_reviews(&state.db, dealer_id)
        .await?
        .into_vec();
    Ok(Json(Reviews { reviews }))
}

pub async fn cars(State(state): State<AppState>) -> Result<Json<CarMakes>, AppError> {
    let car_makes = catalog::list_makes(&state.db).await?;
    Ok(Json(CarMakes { car_makes }))
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let sentiment = state.sentiment.classify(&request.text).await.sentiment();
    Json(AnalyzeResponse {
        text: request.text,
        sentiment,
    })
}

pub async fn sentiment_form(user: CurrentUser, flashes: Flashes) -> Response {
    views::sentiment_test(PageContext::new(user, flashes))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.db.ping().await {
        Ok(()) => "Connected",
        Err(err) => {
            warn!("database ping failed: {}", err);
            "Not Connected"
        }
    };
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "database": database,
    }))
}
