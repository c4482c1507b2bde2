use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use nikjin_user::RegisterInput;
use serde::Deserialize;

use crate::{
    flash::{self, Flash},
    form::FormErrors,
    routes::AppState,
    template::{PageContext, Template},
};

#[derive(Deserialize, Default, Clone)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(askama::Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
    pub form: RegisterForm,
    pub errors: FormErrors,
}

pub async fn page(template: Template) -> impl IntoResponse {
    if template.user().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    template.render(RegisterTemplate {
        ctx: template.ctx(),
        form: RegisterForm::default(),
        errors: FormErrors::default(),
    })
}

pub async fn action(
    template: Template,
    jar: CookieJar,
    State(state): State<AppState>,
    Form(input): Form<RegisterForm>,
) -> impl IntoResponse {
    if template.user().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let result = state
        .user_command
        .register(RegisterInput {
            username: input.username.to_owned(),
            first_name: input.first_name.to_owned(),
            last_name: input.last_name.to_owned(),
            email: input.email.to_owned(),
            password: input.password.to_owned(),
            password_confirm: input.password_confirm.to_owned(),
        })
        .await;

    match result {
        Ok(_) => flash::redirect(
            jar,
            Flash::success("Registration successful! Please login with your new account."),
            "/login",
        ),
        Err(nikjin_shared::Error::Validate(errors)) => {
            let template = template.with_flash(Flash::error("Please correct the errors below."));

            template.render(RegisterTemplate {
                ctx: template.ctx(),
                form: RegisterForm {
                    password: String::new(),
                    password_confirm: String::new(),
                    ..input
                },
                errors: FormErrors::from(&errors),
            })
        }
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}
