use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    auth::{self, CurrentUser, Registration, SignupForm, SESSION_COOKIE},
    cookie,
    error::AppError,
    flash::{self, Flash, Flashes},
    state::AppState,
    views::{self, PageContext},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    username: String,
    password: String,
    next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
fn local_path(next: Option<&str>) -> Option<&str> {
    next.filter(|next| next.starts_with('/') && !next.starts_with("//"))
}

pub async fn login_form(
    Query(query): Query<LoginQuery>,
    user: CurrentUser,
    flashes: Flashes,
) -> Response {
    views::login(
        PageContext::new(user, flashes),
        "",
        local_path(query.next.as_deref()),
    )
}

pub async fn login(
    State(state): State<AppState>,
    user: CurrentUser,
    flashes: Flashes,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = local_path(form.next.as_deref());

    let Some(account) = auth::authenticate(&state.db, &form.username, &form.password).await? else {
        info!("failed login for {:?}", form.username);
        let ctx = PageContext::new(user, flashes).with(Flash::error("Invalid username or password."));
        return Ok(views::login(ctx, &form.username, next));
    };

    let token = auth::start_session(&state.db, &account, state.config.session_ttl).await?;
    info!("user {} logged in", account.username);

    let welcome = Flash::success(format!("Welcome back, {}!", account.display_name()));
    Ok((
        AppendHeaders([
            (
                SET_COOKIE,
                cookie::set(
                    SESSION_COOKIE,
                    &token,
                    Some(state.config.session_ttl.num_seconds()),
                ),
            ),
            (SET_COOKIE, welcome.cookie()),
        ]),
        Redirect::to(next.unwrap_or("/")),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = cookie::get(&headers, SESSION_COOKIE) {
        auth::end_session(&state.db, token).await?;
        info!("session ended");
    }

    let farewell = Flash::success("You have been successfully logged out.");
    Ok((
        AppendHeaders([
            (SET_COOKIE, cookie::clear(SESSION_COOKIE)),
            (SET_COOKIE, farewell.cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}

pub async fn signup_form(user: CurrentUser, flashes: Flashes) -> Response {
    views::signup(PageContext::new(user, flashes), &SignupForm::default(), &[])
}

pub async fn signup(
    State(state): State<AppState>,
    user: CurrentUser,
    flashes: Flashes,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    match auth::register(&state.db, &form).await? {
        Registration::Created(account) => Ok(flash::redirect(
            "/login/",
            Flash::success(format!("Account created for {}!", account.username)),
        )),
        Registration::Invalid(errors) => Ok(views::signup(
            PageContext::new(user, flashes),
            &form,
            &errors,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_paths_are_followed() {
        assert_eq!(local_path(Some("/dealer/1/add_review/")), Some("/dealer/1/add_review/"));
        assert_eq!(local_path(Some("//evil.example")), None);
        assert_eq!(local_path(Some("https://evil.example")), None);
        assert_eq!(local_path(None), None);
    }
}
