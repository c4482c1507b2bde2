use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use nikjin_user::UserView;

use crate::{
    flash::{self, Flash},
    routes::AppState,
};

/// Values every page layout needs.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<UserView>,
    pub messages: Vec<Flash>,
}

impl PageContext {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct Template {
    ctx: PageContext,
    consumed_flash: bool,
}

impl Template {
    pub fn ctx(&self) -> PageContext {
        self.ctx.clone()
    }

    pub fn user(&self) -> Option<&UserView> {
        self.ctx.user.as_ref()
    }

    /// Shows `flash` on the page about to be rendered, no redirect involved.
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.ctx.messages.push(flash);
        self
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        self.render_status(StatusCode::OK, template)
    }

    pub fn render_status<T: askama::Template>(&self, status: StatusCode, template: T) -> Response {
        let mut response = match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!("{err}");

                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template. Error: {err}"),
                )
                    .into_response();
            }
        };

        if self.consumed_flash {
            if let Ok(value) = flash::removal_cookie().to_string().parse() {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }

        response
    }

    pub fn not_found(&self) -> Response {
        self.render_status(
            StatusCode::NOT_FOUND,
            NotFoundTemplate { ctx: self.ctx() },
        )
    }

    pub fn server_error(&self) -> Response {
        self.render_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            ServerTemplate { ctx: self.ctx() },
        )
    }
}

impl FromRequestParts<AppState> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = crate::auth::current_user(parts, state).await;
        let messages = flash::read(&CookieJar::from_headers(&parts.headers));

        Ok(Template {
            consumed_flash: !messages.is_empty(),
            ctx: PageContext { user, messages },
        })
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
}

#[derive(askama::Template)]
#[template(path = "500.html")]
pub struct ServerTemplate {
    pub ctx: PageContext,
}

#[macro_export]
macro_rules! try_page_response {
    ($result:expr, $template:expr) => {
        match $result.await {
            Ok(r) => r,
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };

    (sync: $result:expr, $template:expr) => {
        match $result {
            Ok(r) => r,
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };

    (opt: $result:expr, $template:expr) => {
        match $result.await {
            Ok(Some(r)) => r,
            Ok(_) => return $template.not_found(),
            Err(err) => {
                tracing::error!("{err}");

                return $template.server_error();
            }
        }
    };
}
