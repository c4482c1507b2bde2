use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use nikjin_user::UserView;
use serde::{Deserialize, Serialize};

use crate::{config::JwtConfig, routes::AppState};

pub const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String,
}

pub fn generate_token(config: &JwtConfig, sub: String) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now + config.expiration_days * 24 * 60 * 60,
        iat: now,
        iss: config.issuer.to_owned(),
        sub,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Returns the user id carried by a valid token.
pub fn verify_token(config: &JwtConfig, token: &str) -> Option<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.sub)
}

pub fn build_cookie<'a>(config: &JwtConfig, sub: String) -> anyhow::Result<Cookie<'a>> {
    let token = generate_token(config, sub)?;

    Ok(Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

pub fn removal_cookie<'a>() -> Cookie<'a> {
    Cookie::build(AUTH_COOKIE_NAME).path("/").build()
}

#[derive(Clone)]
struct CurrentUser(Option<UserView>);

/// Resolves the signed-in user once per request.
pub async fn current_user(parts: &mut Parts, state: &AppState) -> Option<UserView> {
    if let Some(CurrentUser(user)) = parts.extensions.get::<CurrentUser>() {
        return user.clone();
    }

    let jar = CookieJar::from_headers(&parts.headers);
    let user = match jar
        .get(AUTH_COOKIE_NAME)
        .and_then(|cookie| verify_token(&state.config.jwt, cookie.value()))
    {
        Some(id) => state.user_query.find(id).await.unwrap_or_else(|e| {
            tracing::error!("{e}");
            None
        }),
        None => None,
    };

    parts.extensions.insert(CurrentUser(user.clone()));

    user
}

/// Signed-in user; anonymous requests are sent to the login page and come
/// back to where they were.
pub struct AuthUser(pub UserView);

pub struct LoginRedirect(String);

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.0).into_response()
    }
}

pub fn login_url(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_user(parts, state).await {
            Some(user) => Ok(AuthUser(user)),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|p| p.as_str().to_owned())
                    .unwrap_or_else(|| "/".to_owned());

                Err(LoginRedirect(login_url(&next)))
            }
        }
    }
}

/// Signed-in user when there is one.
pub struct MaybeUser(pub Option<UserView>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user(parts, state).await))
    }
}

/// Only same-site absolute paths are followed after login. Control
/// characters are refused since browsers drop tabs and newlines, turning
/// `/\t/host` into `//host`.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim).filter(|next| {
        next.starts_with('/')
            && !next.starts_with("//")
            && !next.contains('\\')
            && !next.chars().any(char::is_control)
    })
}
