use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// One-shot message displayed on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// Bootstrap alert class.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Success => "success",
            Level::Error => "danger",
        }
    }
}

pub fn encode(messages: &[Flash]) -> anyhow::Result<String> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(messages)?))
}

/// Garbage in the cookie yields no messages.
pub fn decode(value: &str) -> Vec<Flash> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

pub fn read(jar: &CookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE_NAME)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

fn build_cookie<'a>(value: String) -> Cookie<'a> {
    Cookie::build((FLASH_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie<'a>() -> Cookie<'a> {
    let mut cookie = build_cookie(String::new());
    cookie.make_removal();

    cookie
}

/// Redirects to `to`, queuing `flash` for the page rendered there.
pub fn redirect(jar: CookieJar, flash: Flash, to: &str) -> Response {
    match encode(&[flash]) {
        Ok(value) => (jar.add(build_cookie(value)), Redirect::to(to)).into_response(),
        Err(err) => {
            tracing::error!("{err}");

            Redirect::to(to).into_response()
        }
    }
}
