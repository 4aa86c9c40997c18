//! Accounts, password hashing and cookie sessions.

use anyhow::Context;
use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter,
};
use serde::Deserialize;

use crate::{
    cookie,
    entity::{session, user},
    error::AppError,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "sessionid";

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))
}

/// Verify a password against an argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl SignupForm {
    fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push("Username is required.".to_string());
        } else if username.chars().count() > 150
            || !username
                .chars()
                .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.push(
                "Username must be 150 characters or fewer: letters, digits and @/./+/-/_ only."
                    .to_string(),
            );
        }
        for (label, value) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
            if value.trim().is_empty() {
                errors.push(format!("{} is required.", label));
            } else if value.trim().chars().count() > 30 {
                errors.push(format!("{} must be 30 characters or fewer.", label));
            }
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("Email is required.".to_string());
        } else if !email.contains('@') {
            errors.push("Enter a valid email address.".to_string());
        }
        if self.password1.is_empty() {
            errors.push("Password is required.".to_string());
        } else if self.password1 != self.password2 {
            errors.push("The two password fields didn't match.".to_string());
        }

        errors
    }
}

#[derive(Debug)]
pub enum Registration {
    Created(user::Model),
    Invalid(Vec<String>),
}

pub async fn register(db: &DatabaseConnection, form: &SignupForm) -> anyhow::Result<Registration> {
    let mut errors = form.errors();
    let username = form.username.trim();

    if errors.is_empty() && find_user(db, username).await?.is_some() {
        errors.push("A user with that username already exists.".to_string());
    }
    if !errors.is_empty() {
        return Ok(Registration::Invalid(errors));
    }

    let user = user::ActiveModel {
        username: ActiveValue::Set(username.to_string()),
        first_name: ActiveValue::Set(form.first_name.trim().to_string()),
        last_name: ActiveValue::Set(form.last_name.trim().to_string()),
        email: ActiveValue::Set(form.email.trim().to_string()),
        password_hash: ActiveValue::Set(hash_password(&form.password1)?),
        date_joined: ActiveValue::Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .context("failed to insert user")?;

    info!("registered user {}", user.username);
    Ok(Registration::Created(user))
}

async fn find_user(db: &DatabaseConnection, username: &str) -> anyhow::Result<Option<user::Model>> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .context("failed to look up user")
}

pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<user::Model>> {
    let user = find_user(db, username.trim()).await?;
    Ok(user.filter(|user| verify_password(password, &user.password_hash)))
}

/// Opens a session for `user` and returns its token.
pub async fn start_session(
    db: &DatabaseConnection,
    user: &user::Model,
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let token = uuid::Uuid::new_v4().to_string();

    session::ActiveModel {
        token: ActiveValue::Set(token.clone()),
        user_id: ActiveValue::Set(user.id),
        expires_at: ActiveValue::Set(chrono::Utc::now() + ttl),
    }
    .insert(db)
    .await
    .context("failed to insert session")?;

    Ok(token)
}

pub async fn end_session(db: &DatabaseConnection, token: &str) -> anyhow::Result<()> {
    session::Entity::delete_by_id(token.to_string())
        .exec(db)
        .await
        .context("failed to delete session")?;
    Ok(())
}

/// The user behind a session token. Expired sessions are removed.
pub async fn session_user(
    db: &DatabaseConnection,
    token: &str,
) -> anyhow::Result<Option<user::Model>> {
    let Some(session) = session::Entity::find_by_id(token.to_string())
        .one(db)
        .await
        .context("failed to look up session")?
    else {
        return Ok(None);
    };

    if session.expires_at <= chrono::Utc::now() {
        trace!("session for user {} expired", session.user_id);
        session
            .delete(db)
            .await
            .context("failed to delete expired session")?;
        return Ok(None);
    }

    session
        .find_related(user::Entity)
        .one(db)
        .await
        .context("failed to load session user")
}

/// The signed-in user, if the request carries a live session cookie.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<user::Model>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match cookie::get(&parts.headers, SESSION_COOKIE) {
            Some(token) => Ok(CurrentUser(session_user(&state.db, token).await?)),
            None => Ok(CurrentUser(None)),
        }
    }
}
