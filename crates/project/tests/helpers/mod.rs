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

pub async fn create_users(
    state: &nikjin_shared::State,
    names: impl IntoIterator<Item = impl Into<String>>,
) -> anyhow::Result<Vec<String>> {
    let cmd = nikjin_user::Command(state.clone());

    let mut ids = vec![];
    for name in names.into_iter() {
        let name = name.into();
        let id = cmd
            .create(CreateUserInput {
                email: format!("{name}@nikjin.localhost"),
                username: name,
                first_name: "".to_owned(),
                last_name: "".to_owned(),
                password: "my_password".to_owned(),
            })
            .await?;
        ids.push(id);
    }

    Ok(ids)
}
