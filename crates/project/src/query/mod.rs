use nikjin_db::table::{JoinAlias, Project, ProjectMember, User};
use nikjin_shared::{Page, Paginator};
use sea_query::{
    Cond, Expr, ExprTrait, Func, JoinType, LikeExpr, Order, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub manager_id: String,
    pub manager_username: String,
    pub deadline: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProjectView {
    pub fn deadline_display(&self) -> String {
        self.deadline
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

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Member {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl Member {
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned();
        if full_name.is_empty() {
            return self.username.to_owned();
        }

        full_name
    }
}

#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: ProjectView,
    pub members: Vec<Member>,
}

impl ProjectDetail {
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.to_owned()).collect()
    }
}

#[derive(Debug, Default)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub page: Option<String>,
}

fn select_projects() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            (Project::Table, Project::Id),
            (Project::Table, Project::Name),
            (Project::Table, Project::Description),
            (Project::Table, Project::ManagerId),
            (Project::Table, Project::Deadline),
            (Project::Table, Project::IsActive),
            (Project::Table, Project::CreatedAt),
            (Project::Table, Project::UpdatedAt),
        ])
        .expr_as(
            Expr::col((JoinAlias::Manager, User::Username)),
            JoinAlias::ManagerUsername,
        )
        .from(Project::Table)
        .join_as(
            JoinType::InnerJoin,
            User::Table,
            JoinAlias::Manager,
            Expr::col((JoinAlias::Manager, User::Id)).equals((Project::Table, Project::ManagerId)),
        )
        .to_owned()
}

fn newest_first(statement: &mut SelectStatement) -> &mut SelectStatement {
    statement
        .order_by((Project::Table, Project::CreatedAt), Order::Desc)
        .order_by((Project::Table, Project::Id), Order::Desc)
}

fn search_condition(search: Option<&str>) -> Cond {
    let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return Cond::all();
    };

    let pattern = nikjin_shared::like_contains(search);

    Cond::any()
        .add(
            Expr::col((Project::Table, Project::Name))
                .like(LikeExpr::new(pattern.to_owned()).escape('\\')),
        )
        .add(
            Expr::col((Project::Table, Project::Description))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
}

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<ProjectDetail>> {
        let id = id.into();
        let statement = select_projects()
            .and_where(Expr::col((Project::Table, Project::Id)).eq(id.to_owned()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(project) = sqlx::query_as_with::<_, ProjectView, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
        else {
            return Ok(None);
        };

        let members = self.members(id).await?;

        Ok(Some(ProjectDetail { project, members }))
    }

    pub async fn find_by_name(&self, name: impl Into<String>) -> anyhow::Result<Option<ProjectView>> {
        let statement = select_projects()
            .and_where(Expr::col((Project::Table, Project::Name)).eq(name.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ProjectView, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    /// Members ordered by username.
    pub async fn members(&self, project_id: impl Into<String>) -> anyhow::Result<Vec<Member>> {
        let statement = sea_query::Query::select()
            .columns([
                (User::Table, User::Id),
                (User::Table, User::Username),
                (User::Table, User::FirstName),
                (User::Table, User::LastName),
            ])
            .from(ProjectMember::Table)
            .inner_join(
                User::Table,
                Expr::col((User::Table, User::Id)).equals((ProjectMember::Table, ProjectMember::UserId)),
            )
            .and_where(Expr::col((ProjectMember::Table, ProjectMember::ProjectId)).eq(project_id.into()))
            .order_by((User::Table, User::Username), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Member, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    /// Search over name and description, newest first.
    pub async fn filter(&self, input: ProjectFilter) -> anyhow::Result<Page<ProjectView>> {
        let cond = search_condition(input.search.as_deref());
        let paginator =
            Paginator::new(self.count_where(cond.clone()).await?, nikjin_shared::PER_PAGE);
        let number = paginator.page_number(input.page.as_deref());

        let mut statement = select_projects();
        statement.cond_where(cond);
        newest_first(&mut statement)
            .limit(paginator.per_page)
            .offset(paginator.offset(number));

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let projects = sqlx::query_as_with::<_, ProjectView, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(paginator.page(number, projects))
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        self.count_where(Cond::all()).await
    }

    /// Projects the user manages or belongs to, each listed once.
    pub async fn recent_involving(
        &self,
        user_id: impl Into<String>,
        limit: u64,
    ) -> anyhow::Result<Vec<ProjectView>> {
        let user_id = user_id.into();
        let member_of = sea_query::Query::select()
            .column(ProjectMember::ProjectId)
            .from(ProjectMember::Table)
            .and_where(Expr::col(ProjectMember::UserId).eq(user_id.to_owned()))
            .to_owned();

        let mut statement = select_projects();
        statement.cond_where(
            Cond::any()
                .add(Expr::col((Project::Table, Project::ManagerId)).eq(user_id))
                .add(Expr::col((Project::Table, Project::Id)).in_subquery(member_of)),
        );
        newest_first(&mut statement).limit(limit);

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ProjectView, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn count_where(&self, cond: Cond) -> anyhow::Result<u64> {
        let statement = sea_query::Query::select()
            .expr(Func::count(Expr::col((Project::Table, Project::Id))))
            .from(Project::Table)
            .cond_where(cond)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.0)
            .await?;

        Ok(count as u64)
    }
}
