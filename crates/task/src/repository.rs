use nikjin_db::table::{Task, User};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::{Priority, Status};

pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub assigned_to: Option<String>,
    pub due_date: Option<i64>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    id: String,
    record: TaskRecord,
    created_by: String,
    now: i64,
) -> nikjin_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Task::Table)
        .columns([
            Task::Id,
            Task::Title,
            Task::Description,
            Task::Priority,
            Task::Status,
            Task::AssignedTo,
            Task::CreatedBy,
            Task::DueDate,
            Task::CreatedAt,
            Task::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            record.title.into(),
            record.description.into(),
            record.priority.to_string().into(),
            record.status.to_string().into(),
            record.assigned_to.into(),
            created_by.into(),
            record.due_date.into(),
            now.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Returns false when no task has this id.
pub(crate) async fn update(
    pool: &SqlitePool,
    id: String,
    record: TaskRecord,
    now: i64,
) -> nikjin_shared::Result<bool> {
    let statement = Query::update()
        .table(Task::Table)
        .value(Task::Title, record.title)
        .value(Task::Description, record.description)
        .value(Task::Priority, record.priority.to_string())
        .value(Task::Status, record.status.to_string())
        .value(Task::AssignedTo, record.assigned_to)
        .value(Task::DueDate, record.due_date)
        .value(Task::UpdatedAt, now)
        .and_where(Expr::col(Task::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete(pool: &SqlitePool, id: String) -> nikjin_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(Task::Table)
        .and_where(Expr::col(Task::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn is_user_exists(pool: &SqlitePool, id: String) -> nikjin_shared::Result<bool> {
    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}
