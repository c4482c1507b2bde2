use nikjin_db::table::{User, UserProfile};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool, prelude::FromRow};

#[derive(FromRow)]
pub struct UserRow {
    pub id: String,
    pub password: String,
}

pub enum FindType {
    Id(String),
    Username(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> nikjin_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([User::Id, User::Password])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Username(username) => {
            statement.and_where(Expr::col(User::Username).eq(username))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub struct CreateInput {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub created_at: i64,
}

/// Returns `false` when the username is already taken.
pub(crate) async fn create(
    conn: &mut SqliteConnection,
    input: CreateInput,
) -> nikjin_shared::Result<bool> {
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Id,
            User::Username,
            User::Email,
            User::FirstName,
            User::LastName,
            User::Password,
            User::CreatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.username.into(),
            input.email.into(),
            input.first_name.into(),
            input.last_name.into(),
            input.password.into(),
            input.created_at.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    match sqlx::query_with(&sql, values).execute(conn).await {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Inserts an empty profile unless one already exists.
pub(crate) async fn create_profile(
    conn: &mut SqliteConnection,
    user_id: String,
    now: i64,
) -> nikjin_shared::Result<()> {
    let statement = Query::insert()
        .into_table(UserProfile::Table)
        .columns([
            UserProfile::UserId,
            UserProfile::Phone,
            UserProfile::Address,
            UserProfile::CreatedAt,
            UserProfile::UpdatedAt,
        ])
        .values_panic([
            user_id.into(),
            "".into(),
            "".into(),
            now.into(),
            now.into(),
        ])
        .on_conflict(OnConflict::column(UserProfile::UserId).do_nothing().to_owned())
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn update_last_login(
    pool: &SqlitePool,
    id: String,
    now: i64,
) -> nikjin_shared::Result<()> {
    let statement = Query::update()
        .table(User::Table)
        .value(User::LastLogin, now)
        .and_where(Expr::col(User::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) async fn is_username_exists(
    pool: &SqlitePool,
    username: impl Into<String>,
) -> nikjin_shared::Result<bool> {
    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Username).eq(username.into()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub struct UpdateProfileInput {
    pub user_id: String,
    pub phone: String,
    pub address: String,
    pub profile_picture: Option<Option<String>>,
    pub updated_at: i64,
}

pub(crate) async fn update_profile(
    pool: &SqlitePool,
    input: UpdateProfileInput,
) -> nikjin_shared::Result<()> {
    let mut statement = Query::update()
        .table(UserProfile::Table)
        .value(UserProfile::Phone, input.phone)
        .value(UserProfile::Address, input.address)
        .value(UserProfile::UpdatedAt, input.updated_at)
        .and_where(Expr::col(UserProfile::UserId).eq(input.user_id))
        .to_owned();

    if let Some(profile_picture) = input.profile_picture {
        statement.value(UserProfile::ProfilePicture, profile_picture);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
