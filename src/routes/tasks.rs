use std::str::FromStr;

use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use nikjin_task::{Priority, Status, TaskFilter, TaskInput, TaskView};
use serde::Deserialize;
use strum::VariantArray;

use crate::{
    auth::AuthUser,
    flash::{self, Flash},
    form::{Choice, FormErrors, Pagination},
    routes::AppState,
    template::{PageContext, Template},
    try_page_response,
};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ListQuery {
    pub search: String,
    pub status: String,
    pub priority: String,
    pub page: Option<String>,
}

#[derive(askama::Template)]
#[template(path = "tasks/list.html")]
pub struct ListTemplate {
    pub ctx: PageContext,
    pub tasks: Vec<TaskView>,
    pub pagination: Pagination,
    pub search: String,
    pub statuses: Vec<Choice>,
    pub priorities: Vec<Choice>,
}

fn status_choices(selected: &str) -> Vec<Choice> {
    Status::VARIANTS
        .iter()
        .map(|s| Choice::new(s.to_string(), s.label(), s.to_string() == selected))
        .collect()
}

fn priority_choices(selected: &str) -> Vec<Choice> {
    Priority::VARIANTS
        .iter()
        .map(|p| Choice::new(p.to_string(), p.label(), p.to_string() == selected))
        .collect()
}

pub async fn list(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let page = try_page_response!(
        state.task_query.filter(TaskFilter {
            search: Some(query.search.to_owned()),
            status: Some(query.status.to_owned()),
            priority: Some(query.priority.to_owned()),
            page: query.page.to_owned(),
        }),
        template
    );

    let pagination = Pagination::new(
        &page,
        &[
            ("search", &query.search),
            ("status", &query.status),
            ("priority", &query.priority),
        ],
    );

    template.render(ListTemplate {
        ctx: template.ctx(),
        tasks: page.items,
        pagination,
        statuses: status_choices(&query.status),
        priorities: priority_choices(&query.priority),
        search: query.search,
    })
}

#[derive(askama::Template)]
#[template(path = "tasks/detail.html")]
pub struct DetailTemplate {
    pub ctx: PageContext,
    pub task: TaskView,
}

pub async fn detail(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let task = try_page_response!(opt: state.task_query.find(id), template);

    template.render(DetailTemplate {
        ctx: template.ctx(),
        task,
    })
}

/// Raw form values, kept as typed so they can be echoed back.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: String,
    pub due_date: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::default().to_string(),
            status: Status::default().to_string(),
            assigned_to: String::new(),
            due_date: String::new(),
        }
    }
}

impl From<&TaskView> for TaskForm {
    fn from(task: &TaskView) -> Self {
        Self {
            title: task.title.to_owned(),
            description: task.description.to_owned(),
            priority: task.priority.0.to_string(),
            status: task.status.0.to_string(),
            assigned_to: task.assigned_to.to_owned().unwrap_or_default(),
            due_date: task
                .due_date
                .map(nikjin_shared::format_datetime_local)
                .unwrap_or_default(),
        }
    }
}

fn parse_choice<T: FromStr>(errors: &mut FormErrors, field: &str, value: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }

    let parsed = T::from_str(value).ok();
    if parsed.is_none() {
        errors.add(
            field,
            format!("Select a valid choice. {value} is not one of the available choices."),
        );
    }

    parsed
}

impl TaskForm {
    /// Converts the typed-in values, collecting the errors the command can not see.
    /// Fields that fail to convert fall back to their defaults in the input.
    fn to_input(&self) -> (TaskInput, FormErrors) {
        let mut errors = FormErrors::default();

        let priority = parse_choice::<Priority>(&mut errors, "priority", &self.priority);
        let status = parse_choice::<Status>(&mut errors, "status", &self.status);

        let due_date = match self.due_date.trim() {
            "" => None,
            value => {
                let parsed = nikjin_shared::parse_datetime_local(value);
                if parsed.is_none() {
                    errors.add("due_date", "Enter a valid date/time.");
                }

                parsed
            }
        };

        let input = TaskInput {
            title: self.title.to_owned(),
            description: self.description.to_owned(),
            priority: priority.unwrap_or_default(),
            status: status.unwrap_or_default(),
            assigned_to: Some(self.assigned_to.to_owned()).filter(|id| !id.trim().is_empty()),
            due_date,
        };

        (input, errors)
    }
}

#[derive(askama::Template)]
#[template(path = "tasks/form.html")]
pub struct FormTemplate {
    pub ctx: PageContext,
    pub task: Option<TaskView>,
    pub form: TaskForm,
    pub errors: FormErrors,
    pub priorities: Vec<Choice>,
    pub statuses: Vec<Choice>,
    pub users: Vec<Choice>,
}

async fn render_form(
    template: Template,
    state: &AppState,
    task: Option<TaskView>,
    form: TaskForm,
    errors: FormErrors,
) -> Response {
    let users = try_page_response!(state.user_query.all(), template);
    let users = users
        .into_iter()
        .map(|u| Choice::new(u.id.to_owned(), u.username.to_owned(), u.id == form.assigned_to))
        .collect();

    let template = if errors.is_empty() {
        template
    } else {
        template.with_flash(Flash::error("Please correct the errors below."))
    };

    template.render(FormTemplate {
        ctx: template.ctx(),
        priorities: priority_choices(&form.priority),
        statuses: status_choices(&form.status),
        task,
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
    render_form(template, &state, None, TaskForm::default(), FormErrors::default()).await
}

pub async fn create_action(
    template: Template,
    jar: CookieJar,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(form): Form<TaskForm>,
) -> impl IntoResponse {
    let (input, mut errors) = form.to_input();
    if !errors.is_empty() {
        let checked = try_page_response!(state.task_command.field_errors(&input), template);
        errors.extend(FormErrors::from(&checked));

        return render_form(template, &state, None, form, errors).await;
    }

    match state.task_command.create(input, &user.id).await {
        Ok(_) => flash::redirect(jar, Flash::success("Task created successfully!"), "/tasks"),
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
    let task = try_page_response!(opt: state.task_query.find(id), template);
    let form = TaskForm::from(&task);

    render_form(template, &state, Some(task), form, FormErrors::default()).await
}

pub async fn update_action(
    template: Template,
    jar: CookieJar,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
    Form(form): Form<TaskForm>,
) -> impl IntoResponse {
    let task = try_page_response!(opt: state.task_query.find(&id), template);

    let (input, mut errors) = form.to_input();
    if !errors.is_empty() {
        let checked = try_page_response!(state.task_command.field_errors(&input), template);
        errors.extend(FormErrors::from(&checked));

        return render_form(template, &state, Some(task), form, errors).await;
    }

    match state.task_command.update(&id, input).await {
        Ok(_) => flash::redirect(
            jar,
            Flash::success("Task updated successfully!"),
            &format!("/tasks/{id}"),
        ),
        Err(nikjin_shared::Error::Validate(errors)) => {
            render_form(template, &state, Some(task), form, FormErrors::from(&errors)).await
        }
        Err(nikjin_shared::Error::NotFound) => template.not_found(),
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}

#[derive(askama::Template)]
#[template(path = "tasks/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub ctx: PageContext,
    pub task: TaskView,
}

pub async fn delete_page(
    template: Template,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let task = try_page_response!(opt: state.task_query.find(id), template);

    template.render(ConfirmDeleteTemplate {
        ctx: template.ctx(),
        task,
    })
}

pub async fn delete_action(
    template: Template,
    jar: CookieJar,
    _user: AuthUser,
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    match state.task_command.delete(id).await {
        Ok(_) => flash::redirect(jar, Flash::success("Task deleted successfully!"), "/tasks"),
        Err(nikjin_shared::Error::NotFound) => template.not_found(),
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}
