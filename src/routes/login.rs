use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use nikjin_user::LoginInput;
use serde::Deserialize;

use crate::{
    auth,
    flash::{self, Flash},
    routes::AppState,
    template::{PageContext, Template},
};

#[derive(askama::Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub username: String,
    pub next: String,
    pub error_message: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct PageQuery {
    pub next: String,
}

pub async fn page(template: Template, Query(query): Query<PageQuery>) -> impl IntoResponse {
    template.render(LoginTemplate {
        ctx: template.ctx(),
        username: String::new(),
        next: query.next,
        error_message: None,
    })
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ActionInput {
    pub username: String,
    pub password: String,
    pub next: String,
}

pub async fn action(
    template: Template,
    jar: CookieJar,
    State(state): State<AppState>,
    Form(input): Form<ActionInput>,
) -> impl IntoResponse {
    let result = state
        .user_command
        .login(LoginInput {
            username: input.username.to_owned(),
            password: input.password.to_owned(),
        })
        .await;

    let id = match result {
        Ok(id) => id,
        Err(nikjin_shared::Error::User(message)) => {
            return template.render(LoginTemplate {
                ctx: template.ctx(),
                username: input.username,
                next: input.next,
                error_message: Some(message),
            });
        }
        Err(err) => {
            tracing::error!("{err}");

            return template.server_error();
        }
    };

    let cookie = match auth::build_cookie(&state.config.jwt, id) {
        Ok(cookie) => cookie,
        Err(err) => {
            tracing::error!("{err}");

            return template.server_error();
        }
    };

    let to = auth::safe_next(Some(&input.next)).unwrap_or("/dashboard");

    (jar.add(cookie), Redirect::to(to)).into_response()
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    flash::redirect(
        jar.remove(auth::removal_cookie()),
        Flash::success("You have been successfully logged out."),
        "/",
    )
}
