use axum::http::{header::COOKIE, HeaderMap};

/// Value of the first cookie called `name` in the request headers.
pub fn get<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value for a site-wide, script-inaccessible cookie.
pub fn set(name: &str, value: &str, max_age: Option<i64>) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, value);
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    cookie
}

pub fn clear(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}
