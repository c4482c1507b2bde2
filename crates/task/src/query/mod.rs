use nikjin_db::table::{JoinAlias, ProjectMember, Task, User};
use nikjin_shared::{Page, Paginator};
use sea_query::{
    Cond, Expr, ExprTrait, Func, JoinType, LikeExpr, Order, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::{Priority, Status};

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

#[derive(Debug, Clone, FromRow)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: sqlx::types::Text<Priority>,
    pub status: sqlx::types::Text<Status>,
    pub assigned_to: Option<String>,
    pub assigned_to_username: Option<String>,
    pub created_by: String,
    pub created_by_username: String,
    pub due_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TaskView {
    pub fn priority_label(&self) -> &'static str {
        self.priority.0.label()
    }

    pub fn status_label(&self) -> &'static str {
        self.status.0.label()
    }

    /// Stored value, used for CSS classes and form values.
    pub fn priority_code(&self) -> &str {
        self.priority.0.as_ref()
    }

    pub fn status_code(&self) -> &str {
        self.status.0.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.status.0 == Status::Completed
    }

    pub fn is_overdue(&self) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < nikjin_shared::now())
    }

    pub fn due_date_display(&self) -> String {
        self.due_date
            .map(nikjin_shared::format_datetime)
            .unwrap_or_default()
    }

    pub fn created_at_display(&self) -> String {
        nikjin_shared::format_datetime(self.created_at)
    }

    pub fn updated_at_display(&self) -> String {
        nikjin_shared::format_datetime(self.updated_at)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub page: Option<String>,
}

fn select_tasks() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            (Task::Table, Task::Id),
            (Task::Table, Task::Title),
            (Task::Table, Task::Description),
            (Task::Table, Task::Priority),
            (Task::Table, Task::Status),
            (Task::Table, Task::AssignedTo),
            (Task::Table, Task::CreatedBy),
            (Task::Table, Task::DueDate),
            (Task::Table, Task::CreatedAt),
            (Task::Table, Task::UpdatedAt),
        ])
        .expr_as(
            Expr::col((JoinAlias::Assignee, User::Username)),
            JoinAlias::AssignedToUsername,
        )
        .expr_as(
            Expr::col((JoinAlias::Creator, User::Username)),
            JoinAlias::CreatedByUsername,
        )
        .from(Task::Table)
        .join_as(
            JoinType::LeftJoin,
            User::Table,
            JoinAlias::Assignee,
            Expr::col((JoinAlias::Assignee, User::Id)).equals((Task::Table, Task::AssignedTo)),
        )
        .join_as(
            JoinType::InnerJoin,
            User::Table,
            JoinAlias::Creator,
            Expr::col((JoinAlias::Creator, User::Id)).equals((Task::Table, Task::CreatedBy)),
        )
        .to_owned()
}

fn newest_first(statement: &mut SelectStatement) -> &mut SelectStatement {
    statement
        .order_by((Task::Table, Task::CreatedAt), Order::Desc)
        .order_by((Task::Table, Task::Id), Order::Desc)
}

fn filter_condition(input: &TaskFilter) -> Cond {
    let mut cond = Cond::all();

    if let Some(search) = input.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = nikjin_shared::like_contains(search);
        cond = cond.add(
            Cond::any()
                .add(
                    Expr::col((Task::Table, Task::Title))
                        .like(LikeExpr::new(pattern.to_owned()).escape('\\')),
                )
                .add(
                    Expr::col((Task::Table, Task::Description))
                        .like(LikeExpr::new(pattern).escape('\\')),
                ),
        );
    }

    if let Some(status) = input.status.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(Expr::col((Task::Table, Task::Status)).eq(status));
    }

    if let Some(priority) = input.priority.as_deref().filter(|p| !p.is_empty()) {
        cond = cond.add(Expr::col((Task::Table, Task::Priority)).eq(priority));
    }

    cond
}

fn members_of(project_id: String) -> SelectStatement {
    sea_query::Query::select()
        .column(ProjectMember::UserId)
        .from(ProjectMember::Table)
        .and_where(Expr::col(ProjectMember::ProjectId).eq(project_id))
        .to_owned()
}

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<TaskView>> {
        let statement = select_tasks()
            .and_where(Expr::col((Task::Table, Task::Id)).eq(id.into()))
            .limit(1)
            .to_owned();

        self.fetch_optional(statement).await
    }

    pub async fn find_by_title(&self, title: impl Into<String>) -> anyhow::Result<Option<TaskView>> {
        let statement = select_tasks()
            .and_where(Expr::col((Task::Table, Task::Title)).eq(title.into()))
            .limit(1)
            .to_owned();

        self.fetch_optional(statement).await
    }

    /// Search over title and description with exact status and priority
    /// matches, newest first. Unknown status or priority values match nothing.
    pub async fn filter(&self, input: TaskFilter) -> anyhow::Result<Page<TaskView>> {
        let cond = filter_condition(&input);
        let paginator =
            Paginator::new(self.count_where(cond.clone()).await?, nikjin_shared::PER_PAGE);
        let number = paginator.page_number(input.page.as_deref());

        let mut statement = select_tasks();
        statement.cond_where(cond);
        newest_first(&mut statement)
            .limit(paginator.per_page)
            .offset(paginator.offset(number));

        Ok(paginator.page(number, self.fetch_all(statement).await?))
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        self.count_where(Cond::all()).await
    }

    pub async fn count_assigned_to(&self, user_id: impl Into<String>) -> anyhow::Result<u64> {
        self.count_where(Cond::all().add(Expr::col((Task::Table, Task::AssignedTo)).eq(user_id.into())))
            .await
    }

    pub async fn recent_assigned_to(
        &self,
        user_id: impl Into<String>,
        limit: u64,
    ) -> anyhow::Result<Vec<TaskView>> {
        let mut statement = select_tasks();
        statement.and_where(Expr::col((Task::Table, Task::AssignedTo)).eq(user_id.into()));
        newest_first(&mut statement).limit(limit);

        self.fetch_all(statement).await
    }

    /// Tasks assigned to any member of the project.
    pub async fn recent_for_members_of(
        &self,
        project_id: impl Into<String>,
        limit: u64,
    ) -> anyhow::Result<Vec<TaskView>> {
        let mut statement = select_tasks();
        statement.and_where(
            Expr::col((Task::Table, Task::AssignedTo)).in_subquery(members_of(project_id.into())),
        );
        newest_first(&mut statement).limit(limit);

        self.fetch_all(statement).await
    }

    async fn count_where(&self, cond: Cond) -> anyhow::Result<u64> {
        let statement = sea_query::Query::select()
            .expr(Func::count(Expr::col((Task::Table, Task::Id))))
            .from(Task::Table)
            .cond_where(cond)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.0)
            .await?;

        Ok(count as u64)
    }

    async fn fetch_all(&self, statement: SelectStatement) -> anyhow::Result<Vec<TaskView>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TaskView, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn fetch_optional(&self, statement: SelectStatement) -> anyhow::Result<Option<TaskView>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TaskView, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }
}
