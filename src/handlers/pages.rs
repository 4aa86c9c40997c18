use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::{
    auth::CurrentUser,
    error::AppError,
    flash::{self, Flash, Flashes},
    state::AppState,
    views::{self, PageContext},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StateFilter {
    state: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<StateFilter>,
    user: CurrentUser,
    flashes: Flashes,
) -> Response {
    let selected = filter.state.trim();
    let dealers = state
        .dealerships
        .fetch_dealerships(Some(selected))
        .await
        .into_vec();

    views::index(PageContext::new(user, flashes), &dealers, selected)
}

pub async fn about(user: CurrentUser, flashes: Flashes) -> Response {
    views::about(PageContext::new(user, flashes))
}

pub async fn contact(user: CurrentUser, flashes: Flashes) -> Response {
    views::contact(PageContext::new(user, flashes))
}

pub async fn dealer_details(
    State(state): State<AppState>,
    Path(dealer_id): Path<i32>,
    user: CurrentUser,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let Some(dealer) = state.dealerships.find_dealer(dealer_id).await else {
        debug!("dealer {} not found", dealer_id);
        return Ok(flash::redirect("/", Flash::error("Dealer not found.")));
    };

    let reviews = state
        .dealerships
        .fetch_reviews(&state.db, dealer_id)
        .await?
        .into_vec();

    Ok(views::dealer_details(
        PageContext::new(user, flashes),
        &dealer,
        &reviews,
    ))
}
