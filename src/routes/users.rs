use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use nikjin_project::ProjectView;
use nikjin_task::TaskView;
use nikjin_user::{Profile, UserFilter, UserView};
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    form::Pagination,
    routes::AppState,
    template::{PageContext, Template},
    try_page_response,
};

const DETAIL_LIMIT: u64 = 10;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ListQuery {
    pub search: String,
    pub page: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "users/list.html")]
pub struct ListTemplate {
    pub ctx: PageContext,
    pub users: Vec<UserView>,
    pub pagination: Pagination,
    pub search: String,
}

pub async fn list(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let page = try_page_response!(
        state.user_query.filter(UserFilter {
            search: Some(query.search.to_owned()),
            page: query.page,
        }),
        template
    );

    let pagination = Pagination::new(&page, &[("search", &query.search)]);

    template.render(ListTemplate {
        ctx: template.ctx(),
        users: page.items,
        pagination,
        search: query.search,
    })
}

#[derive(askama::Template)]
#[template(path = "users/detail.html")]
pub struct DetailTemplate {
    pub ctx: PageContext,
    pub profile_user: UserView,
    pub profile: Profile,
    pub tasks: Vec<TaskView>,
    pub projects: Vec<ProjectView>,
}

pub async fn detail(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let profile_user = try_page_response!(opt: state.user_query.find(&id), template);
    let profile = try_page_response!(state.user_command.profile(&id), template);
    let tasks = try_page_response!(
        state.task_query.recent_assigned_to(&id, DETAIL_LIMIT),
        template
    );
    let projects = try_page_response!(
        state.project_query.recent_involving(&id, DETAIL_LIMIT),
        template
    );

    template.render(DetailTemplate {
        ctx: template.ctx(),
        profile_user,
        profile,
        tasks,
        projects,
    })
}
