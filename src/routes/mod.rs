use axum::{Router, response::IntoResponse, routing::get};
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use crate::template::Template;

mod dashboard;
mod health;
mod index;
mod login;
mod profile;
mod projects;
mod register;
mod tasks;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: nikjin_user::Command,
    pub user_query: nikjin_user::Query,
    pub task_command: nikjin_task::Command,
    pub task_query: nikjin_task::Query,
    pub project_command: nikjin_project::Command,
    pub project_query: nikjin_project::Query,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: nikjin_shared::State) -> Self {
        Self {
            config,
            user_command: nikjin_user::Command(state.clone()),
            user_query: nikjin_user::Query(state.read_db.clone()),
            task_command: nikjin_task::Command(state.clone()),
            task_query: nikjin_task::Query(state.read_db.clone()),
            project_command: nikjin_project::Command(state.clone()),
            project_query: nikjin_project::Query(state.read_db.clone()),
            pool: state.read_db,
        }
    }
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    template.not_found()
}

pub fn router(app_state: AppState) -> Router {
    let media_dir = app_state.config.media.dir.to_owned();

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/", get(index::page))
        .route("/register", get(register::page).post(register::action))
        .route("/login", get(login::page).post(login::action))
        .route("/logout", get(login::logout))
        .route("/dashboard", get(dashboard::page))
        .route("/profile", get(profile::page).post(profile::action))
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::detail))
        .route("/tasks", get(tasks::list))
        .route(
            "/tasks/create",
            get(tasks::create_page).post(tasks::create_action),
        )
        .route("/tasks/{id}", get(tasks::detail))
        .route(
            "/tasks/{id}/update",
            get(tasks::update_page).post(tasks::update_action),
        )
        .route(
            "/tasks/{id}/delete",
            get(tasks::delete_page).post(tasks::delete_action),
        )
        .route("/projects", get(projects::list))
        .route(
            "/projects/create",
            get(projects::create_page).post(projects::create_action),
        )
        .route("/projects/{id}", get(projects::detail))
        .route(
            "/projects/{id}/update",
            get(projects::update_page).post(projects::update_action),
        )
        .route(
            "/projects/{id}/delete",
            get(projects::delete_page).post(projects::delete_action),
        )
        .nest_service("/static", crate::assets::AssetsService::new())
        .nest_service("/media", ServeDir::new(media_dir))
        .fallback(fallback)
        .with_state(app_state)
}
