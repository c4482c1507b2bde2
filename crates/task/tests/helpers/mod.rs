use std::{path::PathBuf, str::FromStr};

use nikjin_user::CreateUserInput;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<nikjin_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    nikjin_db::migrate(&pool).await?;

    Ok(nikjin_shared::State {
        read_db: pool.clone(),
        write_db: pool,
    })
}

#[allow(dead_code)]
pub async fn create_user(
    state: &nikjin_shared::State,
    name: impl Into<String>,
) -> anyhow::Result<String> {
    let name = name.into();

    Ok(nikjin_user::Command(state.clone())
        .create(CreateUserInput {
            email: format!("{name}@nikjin.localhost"),
            username: name,
            first_name: "".to_owned(),
            last_name: "".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?)
}

#[allow(dead_code)]
pub async fn add_member(
    state: &nikjin_shared::State,
    manager_id: &str,
    member_ids: &[&str],
) -> anyhow::Result<String> {
    let project_id = ulid::Ulid::new().to_string();

    sqlx::query(
        "INSERT INTO project (id, name, description, manager_id, is_active, created_at, updated_at) VALUES (?, 'Website', '', ?, 1, 0, 0)",
    )
    .bind(&project_id)
    .bind(manager_id)
    .execute(&state.write_db)
    .await?;

    for member_id in member_ids {
        sqlx::query("INSERT INTO project_member (project_id, user_id) VALUES (?, ?)")
            .bind(&project_id)
            .bind(member_id)
            .execute(&state.write_db)
            .await?;
    }

    Ok(project_id)
}
