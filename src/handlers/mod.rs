use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response, routing::get, Router};

use crate::state::AppState;

pub mod account;
pub mod api;
pub mod pages;
pub mod reviews;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/about/", get(pages::about))
        .route("/contact/", get(pages::contact))
        .route("/login/", get(account::login_form).post(account::login))
        .route("/logout/", get(account::logout))
        .route("/signup/", get(account::signup_form).post(account::signup))
        .route("/dealer/{dealer_id}/", get(pages::dealer_details))
        .route(
            "/dealer/{dealer_id}/add_review/",
            get(reviews::review_form).post(reviews::add_review),
        )
        .route("/api/dealerships/", get(api::dealerships))
        .route("/api/dealerships/{state}/", get(api::dealerships_by_state))
        .route("/api/reviews/dealer/{dealer_id}/", get(api::dealer_reviews))
        .route("/api/cars/", get(api::cars))
        .route("/api/sentiment/", get(api::sentiment_form).post(api::analyze))
        .route("/health", get(api::health))
        .layer(axum::middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
