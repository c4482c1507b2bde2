use axum::response::{IntoResponse, Redirect};

use crate::template::{PageContext, Template};

#[derive(askama::Template)]
#[template(path = "welcome.html")]
pub struct WelcomeTemplate {
    pub ctx: PageContext,
}

pub async fn page(template: Template) -> impl IntoResponse {
    if template.user().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    template.render(WelcomeTemplate {
        ctx: template.ctx(),
    })
}
