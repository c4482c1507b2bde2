use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use nikjin_project::{ProjectDetail, ProjectFilter, ProjectInput, ProjectView};
use nikjin_task::TaskView;
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    flash::{self, Flash},
    form::{Choice, FormErrors, Pagination},
    routes::AppState,
    template::{PageContext, Template},
    try_page_response,
};

const DETAIL_TASKS_LIMIT: u64 = 10;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ListQuery {
    pub search: String,
    pub page: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "projects/list.html")]
pub struct ListTemplate {
    pub ctx: PageContext,
    pub projects: Vec<ProjectView>,
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
        state.project_query.filter(ProjectFilter {
            search: Some(query.search.to_owned()),
            page: query.page,
        }),
        template
    );

    let pagination = Pagination::new(&page, &[("search", &query.search)]);

    template.render(ListTemplate {
        ctx: template.ctx(),
        projects: page.items,
        pagination,
        search: query.search,
    })
}

#[derive(askama::Template)]
#[template(path = "projects/detail.html")]
pub struct DetailTemplate {
    pub ctx: PageContext,
    pub detail: ProjectDetail,
    pub tasks: Vec<TaskView>,
}

pub async fn detail(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let detail = try_page_response!(opt: state.project_query.find(&id), template);
    let tasks = try_page_response!(
        state
            .task_query
            .recent_for_members_of(&id, DETAIL_TASKS_LIMIT),
        template
    );

    template.render(DetailTemplate {
        ctx: template.ctx(),
        detail,
        tasks,
    })
}

/// Submitted values; unchecked checkboxes are simply absent.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
    pub deadline: String,
    pub is_active: Option<String>,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            members: Vec::new(),
            deadline: String::new(),
            is_active: Some("on".to_owned()),
        }
    }
}

impl From<&ProjectDetail> for ProjectForm {
    fn from(detail: &ProjectDetail) -> Self {
        Self {
            name: detail.project.name.to_owned(),
            description: detail.project.description.to_owned(),
            members: detail.member_ids(),
            deadline: detail
                .project
                .deadline
                .map(nikjin_shared::format_datetime_local)
                .unwrap_or_default(),
            is_active: detail.project.is_active.then(|| "on".to_owned()),
        }
    }
}

impl ProjectForm {
    pub fn active(&self) -> bool {
        self.is_active.is_some()
    }

    /// Converts the submitted values; an unreadable deadline is left empty in
    /// the input and reported in the errors.
    fn to_input(&self) -> (ProjectInput, FormErrors) {
        let mut errors = FormErrors::default();

        let deadline = match self.deadline.trim() {
            "" => None,
            value => {
                let parsed = nikjin_shared::parse_datetime_local(value);
                if parsed.is_none() {
                    errors.add("deadline", "Enter a valid date/time.");
                }

                parsed
            }
        };

        let input = ProjectInput {
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            members: self.members.to_owned(),
            deadline,
            is_active: self.active(),
        };

        (input, errors)
    }
}

#[derive(askama::Template)]
#[template(path = "projects/form.html")]
pub struct FormTemplate {
    pub ctx: PageContext,
    pub project: Option<ProjectView>,
    pub form: ProjectForm,
    pub errors: FormErrors,
    pub users: Vec<Choice>,
}

async fn render_form(
    template: Template,
    state: &AppState,
    project: Option<ProjectView>,
    form: ProjectForm,
    errors: FormErrors,
) -> Response {
    let users = try_page_response!(state.user_query.all(), template);
    let users = users
        .into_iter()
        .map(|u| {
            let selected = form.members.contains(&u.id);
            Choice::new(u.id.to_owned(), u.display_name(), selected)
        })
        .collect();

    let template = if errors.is_empty() {
        template
    } else {
        template.with_flash(Flash::error("Please correct the errors below."))
    };

    template.render(FormTemplate {
        ctx: template.ctx(),
        project,
        form,
        errors,
        users,
    })
}

pub async fn create_page(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    render_form(
        template,
        &state,
        None,
        ProjectForm::default(),
        FormErrors::default(),
    )
    .await
}

pub async fn create_action(
    template: Template,
    jar: CookieJar,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(form): Form<ProjectForm>,
) -> impl IntoResponse {
    let (input, mut errors) = form.to_input();
    if !errors.is_empty() {
        let checked = try_page_response!(state.project_command.field_errors(&input), template);
        errors.extend(FormErrors::from(&checked));

        return render_form(template, &state, None, form, errors).await;
    }

    match state.project_command.create(input, &user.id).await {
        Ok(_) => flash::redirect(
            jar,
            Flash::success("Project created successfully!"),
            "/projects",
        ),
        Err(nikjin_shared::Error::Validate(errors)) => {
            render_form(template, &state, None, form, FormErrors::from(&errors)).await
        }
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}

pub async fn update_page(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let detail = try_page_response!(opt: state.project_query.find(id), template);
    let form = ProjectForm::from(&detail);

    render_form(
        template,
        &state,
        Some(detail.project),
        form,
        FormErrors::default(),
    )
    .await
}

pub async fn update_action(
    template: Template,
    jar: CookieJar,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(form): Form<ProjectForm>,
) -> impl IntoResponse {
    let detail = try_page_response!(opt: state.project_query.find(&id), template);

    let (input, mut errors) = form.to_input();
    if !errors.is_empty() {
        let checked = try_page_response!(state.project_command.field_errors(&input), template);
        errors.extend(FormErrors::from(&checked));

        return render_form(template, &state, Some(detail.project), form, errors).await;
    }

    match state.project_command.update(&id, input).await {
        Ok(_) => flash::redirect(
            jar,
            Flash::success("Project updated successfully!"),
            &format!("/projects/{id}"),
        ),
        Err(nikjin_shared::Error::Validate(errors)) => {
            render_form(
                template,
                &state,
                Some(detail.project),
                form,
                FormErrors::from(&errors),
            )
            .await
        }
        Err(nikjin_shared::Error::NotFound) => template.not_found(),
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}

#[derive(askama::Template)]
#[template(path = "projects/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub ctx: PageContext,
    pub project: ProjectView,
}

pub async fn delete_page(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let detail = try_page_response!(opt: state.project_query.find(id), template);

    template.render(ConfirmDeleteTemplate {
        ctx: template.ctx(),
        project: detail.project,
    })
}

pub async fn delete_action(
    template: Template,
    jar: CookieJar,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    match state.project_command.delete(id).await {
        Ok(_) => flash::redirect(
            jar,
            Flash::success("Project deleted successfully!"),
            "/projects",
        ),
        Err(nikjin_shared::Error::NotFound) => template.not_found(),
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}
