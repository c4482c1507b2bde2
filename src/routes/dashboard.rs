use axum::{extract::State, response::IntoResponse};
use nikjin_project::ProjectView;
use nikjin_task::TaskView;

use crate::{
    auth::AuthUser,
    routes::AppState,
    template::{PageContext, Template},
    try_page_response,
};

const RECENT_LIMIT: u64 = 5;

#[derive(askama::Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub total_users: u64,
    pub total_tasks: u64,
    pub total_projects: u64,
    pub my_tasks: u64,
    pub recent_tasks: Vec<TaskView>,
    pub recent_projects: Vec<ProjectView>,
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let total_users = try_page_response!(state.user_query.count(), template);
    let total_tasks = try_page_response!(state.task_query.count(), template);
    let total_projects = try_page_response!(state.project_query.count(), template);
    let my_tasks = try_page_response!(state.task_query.count_assigned_to(&user.id), template);
    let recent_tasks = try_page_response!(
        state.task_query.recent_assigned_to(&user.id, RECENT_LIMIT),
        template
    );
    let recent_projects = try_page_response!(
        state.project_query.recent_involving(&user.id, RECENT_LIMIT),
        template
    );

    template.render(DashboardTemplate {
        ctx: template.ctx(),
        total_users,
        total_tasks,
        total_projects,
        my_tasks,
        recent_tasks,
        recent_projects,
    })
}
