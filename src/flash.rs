//! One-shot messages shown on the next rendered page.
//!
//! Messages ride in the `messages` cookie as url-encoded JSON and the page
//! that displays them clears the cookie.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::cookie;

pub const COOKIE_NAME: &str = "messages";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Flash {
        Flash {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Flash {
        Flash {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// `Set-Cookie` value carrying this message to the next request.
    pub fn cookie(&self) -> String {
        let json = serde_json::to_string(&[self]).unwrap_or_default();
        cookie::set(COOKIE_NAME, &urlencoding::encode(&json), None)
    }
}

fn decode(raw: &str) -> Vec<Flash> {
    urlencoding::decode(raw)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

/// Messages flashed by the previous response.
#[derive(Clone, Debug, Default)]
pub struct Flashes(pub Vec<Flash>);

impl<S: Send + Sync> FromRequestParts<S> for Flashes {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flashes(
            cookie::get(&parts.headers, COOKIE_NAME)
                .map(decode)
                .unwrap_or_default(),
        ))
    }
}

/// Redirects to `to`, showing `flash` on the page that follows.
pub fn redirect(to: &str, flash: Flash) -> Response {
    (AppendHeaders([(SET_COOKIE, flash.cookie())]), Redirect::to(to)).into_response()
}
