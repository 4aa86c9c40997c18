use std::time::Duration;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use dealership_rs::{
    catalog, database,
    entity::dealer_review,
    handlers,
    model::Sentiment,
    AppState, Config,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tower::ServiceExt;

const UNREACHABLE: &str = "http://127.0.0.1:9";

async fn app() -> (Router, DatabaseConnection) {
    let db = database::connect_in_memory().await.unwrap();
    catalog::seed_if_empty(&db).await.unwrap();

    let config = Config {
        dealership_api_url: UNREACHABLE.to_string(),
        sentiment_api_url: UNREACHABLE.to_string(),
        upstream_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let state = AppState::with_connection(config, db.clone()).unwrap();
    (handlers::router(state), db)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = Request::get(uri);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    request.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = Request::post(uri).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    request.body(Body::from(body.to_string())).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}

fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", name)))
        .map(|value| value.split(';').next().unwrap_or_default().to_string())
}

/// Signs up and logs in, returning the session cookie pair.
async fn logged_in(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_form(
            "/signup/",
            "username=dana&first_name=Dana&last_name=Reyes&email=dana%40example.com&password1=s3cret-pass&password2=s3cret-pass",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login/");

    let response = app
        .clone()
        .oneshot(post_form("/login/", "username=dana&password=s3cret-pass", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    set_cookie(&response, "sessionid").unwrap()
}

const REVIEW_FORM: &str = "name=Lee&review=Excellent+service%2C+great+price&purchase=on&purchase_date=2023-10-15&car_make=Toyota&car_model=Camry&car_year=2023";

#[tokio::test]
async fn home_lists_fixture_dealers_when_service_is_down() {
    let (app, _db) = app().await;

    let response = app.oneshot(get("/?state=Texas", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Brooklyn Motors Car Dealership"));
    assert!(html.contains("Austin Auto Sales"));
    assert!(html.contains("Kansas Car Center"));
    assert!(html.contains(r#"<option value="Texas" selected>"#));
}

#[tokio::test]
async fn anonymous_review_submission_redirects_to_login() {
    let (app, db) = app().await;

    let response = app
        .oneshot(post_form("/dealer/1/add_review/", REVIEW_FORM, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login/?next=%2Fdealer%2F1%2Fadd_review%2F");
    assert_eq!(dealer_review::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn anonymous_review_submission_redirects_whatever_the_body() {
    let (app, db) = app().await;

    let request = Request::post("/dealer/1/add_review/")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Sam","review":"great"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login/?next=%2Fdealer%2F1%2Fadd_review%2F");

    let session = logged_in(&app).await;
    let request = Request::post("/dealer/1/add_review/")
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, session.as_str())
        .body(Body::from(r#"{"name":"Sam","review":"great"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(dealer_review::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn anonymous_review_form_redirects_to_login() {
    let (app, _db) = app().await;

    let response = app.oneshot(get("/dealer/2/add_review/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login/?next="));
}

#[tokio::test]
async fn signed_in_review_submission_stores_one_review() {
    let (app, db) = app().await;
    let session = logged_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/dealer/1/add_review/", Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Camry"));

    let response = app
        .clone()
        .oneshot(post_form("/dealer/1/add_review/", REVIEW_FORM, Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dealer/1/");
    assert!(set_cookie(&response, "messages").is_some());

    let reviews = dealer_review::Entity::find().all(&db).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].dealership, 1);
    assert_eq!(reviews[0].sentiment, Sentiment::Positive);

    let response = app
        .oneshot(get("/api/reviews/dealer/1/", None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(json["reviews"][0]["purchase_date"], "2023-10-15");
    assert_eq!(json["reviews"][0]["sentiment"], "positive");
}

#[tokio::test]
async fn invalid_review_is_rerendered_without_storing() {
    let (app, db) = app().await;
    let session = logged_in(&app).await;

    let response = app
        .oneshot(post_form(
            "/dealer/3/add_review/",
            "name=Lee&review=&purchase_date=yesterday&car_make=Ford&car_model=F-150&car_year=2023",
            Some(&session),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Review is required."));
    assert!(html.contains("Enter a valid purchase date"));
    assert_eq!(dealer_review::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_dealer_redirects_home() {
    let (app, _db) = app().await;

    let response = app.clone().oneshot(get("/dealer/99/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // the flashed message shows on the next page and is then cleared
    let flash = set_cookie(&response, "messages").unwrap();
    let response = app.oneshot(get("/", Some(&flash))).await.unwrap();
    assert_eq!(set_cookie(&response, "messages").as_deref(), Some("messages="));
    assert!(body_text(response).await.contains("Dealer not found."));
}

#[tokio::test]
async fn unknown_dealer_review_submission_redirects_home() {
    let (app, db) = app().await;
    let session = logged_in(&app).await;

    let response = app
        .oneshot(post_form("/dealer/99/add_review/", REVIEW_FORM, Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(dealer_review::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn failed_login_rerenders_with_message() {
    let (app, _db) = app().await;
    logged_in(&app).await;

    let response = app
        .oneshot(post_form("/login/", "username=dana&password=wrong", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "sessionid").is_none());
    assert!(body_text(response).await.contains("Invalid username or password."));
}

#[tokio::test]
async fn login_follows_local_next() {
    let (app, _db) = app().await;
    logged_in(&app).await;

    let response = app
        .oneshot(post_form(
            "/login/",
            "username=dana&password=s3cret-pass&next=%2Fdealer%2F2%2Fadd_review%2F",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dealer/2/add_review/");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let (app, db) = app().await;
    let session = logged_in(&app).await;

    let response = app
        .clone()
        .oneshot(get("/logout/", Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(set_cookie(&response, "sessionid").as_deref(), Some("sessionid="));

    let response = app
        .oneshot(post_form("/dealer/1/add_review/", REVIEW_FORM, Some(&session)))
        .await
        .unwrap();
    assert!(location(&response).starts_with("/login/"));
    assert_eq!(dealer_review::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn dealership_api_serves_fixture_for_any_state() {
    let (app, _db) = app().await;

    for uri in ["/api/dealerships/", "/api/dealerships/Florida/"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let ids: Vec<i64> = json["dealerships"]
            .as_array()
            .unwrap()
            .iter()
            .map(|dealer| dealer["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

#[tokio::test]
async fn cars_api_lists_makes() {
    let (app, _db) = app().await;

    let json = body_json(app.oneshot(get("/api/cars/", None)).await.unwrap()).await;
    let makes = json["car_makes"].as_array().unwrap();
    assert_eq!(makes.len(), 4);
    assert_eq!(makes[0]["name"], "Toyota");
    assert!(makes[0]["description"].is_string());
}

#[tokio::test]
async fn sentiment_api_falls_back_to_heuristic() {
    let (app, _db) = app().await;

    let request = Request::post("/api/sentiment/")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "The worst, most disappointing visit"}"#))
        .unwrap();
    let json = body_json(app.oneshot(request).await.unwrap()).await;

    assert_eq!(json["text"], "The worst, most disappointing visit");
    assert_eq!(json["sentiment"], "negative");
}

#[tokio::test]
async fn health_reports_database() {
    let (app, _db) = app().await;

    let json = body_json(app.oneshot(get("/health", None)).await.unwrap()).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["database"], "Connected");
}
