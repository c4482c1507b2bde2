use nikjin_db::table::{Project, ProjectMember, User};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool};

pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
    pub deadline: Option<i64>,
    pub is_active: bool,
}

pub(crate) async fn create(
    conn: &mut SqliteConnection,
    id: String,
    record: &ProjectRecord,
    manager_id: String,
    now: i64,
) -> nikjin_shared::Result<()> {
    let statement = Query::insert()
        .into_table(Project::Table)
        .columns([
            Project::Id,
            Project::Name,
            Project::Description,
            Project::ManagerId,
            Project::Deadline,
            Project::IsActive,
            Project::CreatedAt,
            Project::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            record.name.to_owned().into(),
            record.description.to_owned().into(),
            manager_id.into(),
            record.deadline.into(),
            record.is_active.into(),
            now.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

/// Returns false when no project has this id.
pub(crate) async fn update(
    conn: &mut SqliteConnection,
    id: String,
    record: &ProjectRecord,
    now: i64,
) -> nikjin_shared::Result<bool> {
    let statement = Query::update()
        .table(Project::Table)
        .value(Project::Name, record.name.to_owned())
        .value(Project::Description, record.description.to_owned())
        .value(Project::Deadline, record.deadline)
        .value(Project::IsActive, record.is_active)
        .value(Project::UpdatedAt, now)
        .and_where(Expr::col(Project::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn replace_members(
    conn: &mut SqliteConnection,
    project_id: String,
    members: &[String],
) -> nikjin_shared::Result<()> {
    let statement = Query::delete()
        .from_table(ProjectMember::Table)
        .and_where(Expr::col(ProjectMember::ProjectId).eq(project_id.to_owned()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if members.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(ProjectMember::Table)
        .columns([ProjectMember::ProjectId, ProjectMember::UserId])
        .to_owned();

    for user_id in members {
        statement.values_panic([project_id.to_owned().into(), user_id.to_owned().into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn delete(pool: &SqlitePool, id: String) -> nikjin_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(Project::Table)
        .and_where(Expr::col(Project::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

/// Ids among `ids` that belong to no user.
pub(crate) async fn unknown_users(
    pool: &SqlitePool,
    ids: &[String],
) -> nikjin_shared::Result<Vec<String>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Id).is_in(ids.iter().cloned()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let found = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(ids
        .iter()
        .filter(|id| !found.iter().any(|(found,)| found == *id))
        .cloned()
        .collect())
}
