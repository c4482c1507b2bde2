use nikjin_db::table::{User, UserProfile};
use nikjin_shared::{Page, Paginator};
use sea_query::{Cond, Expr, ExprTrait, Func, LikeExpr, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

#[derive(Debug, Default, Clone, Serialize, FromRow)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: i64,
    pub last_login: Option<i64>,
}

impl UserView {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Full name, or the username for accounts without one.
    pub fn display_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            return self.username.to_owned();
        }

        full_name
    }

    pub fn joined_at(&self) -> String {
        nikjin_shared::format_date(self.created_at)
    }

    pub fn last_login_at(&self) -> String {
        self.last_login
            .map(nikjin_shared::format_datetime)
            .unwrap_or_else(|| "Never".to_owned())
    }
}

#[derive(Debug, Default, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: String,
    pub phone: String,
    pub address: String,
    pub profile_picture: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Profile {
    /// Public URL of the uploaded picture, served from the media directory.
    pub fn picture_url(&self) -> Option<String> {
        self.profile_picture
            .as_ref()
            .map(|path| format!("/media/{path}"))
    }
}

#[derive(Debug, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub page: Option<String>,
}

fn select_users() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            User::Id,
            User::Username,
            User::Email,
            User::FirstName,
            User::LastName,
            User::CreatedAt,
            User::LastLogin,
        ])
        .from(User::Table)
        .to_owned()
}

fn search_condition(search: &str) -> Cond {
    let pattern = nikjin_shared::like_contains(search);

    [User::Username, User::FirstName, User::LastName, User::Email]
        .into_iter()
        .fold(Cond::any(), |cond, column| {
            cond.add(Expr::col(column).like(LikeExpr::new(pattern.to_owned()).escape('\\')))
        })
}

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<UserView>> {
        let statement = select_users()
            .and_where(Expr::col(User::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    pub async fn find_by_username(
        &self,
        username: impl Into<String>,
    ) -> anyhow::Result<Option<UserView>> {
        let statement = select_users()
            .and_where(Expr::col(User::Username).eq(username.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    pub async fn find_profile(&self, user_id: impl Into<String>) -> anyhow::Result<Option<Profile>> {
        let statement = sea_query::Query::select()
            .columns([
                UserProfile::UserId,
                UserProfile::Phone,
                UserProfile::Address,
                UserProfile::ProfilePicture,
                UserProfile::CreatedAt,
                UserProfile::UpdatedAt,
            ])
            .from(UserProfile::Table)
            .and_where(Expr::col(UserProfile::UserId).eq(user_id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        self.count_where(Cond::all()).await
    }

    /// Every user ordered by username, for assignee and member pickers.
    pub async fn all(&self) -> anyhow::Result<Vec<UserView>> {
        let statement = select_users()
            .order_by(User::Username, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn filter(&self, input: UserFilter) -> anyhow::Result<Page<UserView>> {
        let cond = match input.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => search_condition(search),
            _ => Cond::all(),
        };

        let paginator = Paginator::new(self.count_where(cond.clone()).await?, nikjin_shared::PER_PAGE);
        let number = paginator.page_number(input.page.as_deref());

        let statement = select_users()
            .cond_where(cond)
            .order_by(User::Username, Order::Asc)
            .limit(paginator.per_page)
            .offset(paginator.offset(number))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let users = sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(paginator.page(number, users))
    }

    async fn count_where(&self, cond: Cond) -> anyhow::Result<u64> {
        let statement = sea_query::Query::select()
            .expr(Func::count(Expr::col(User::Id)))
            .from(User::Table)
            .cond_where(cond)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&self.0)
            .await?;

        Ok(count as u64)
    }
}
