use nikjin_user::LoginInput;
use temp_dir::TempDir;

mod helpers;

const INVALID: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[tokio::test]
async fn test_login() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());

    let resp = cmd
        .login(LoginInput {
            username: "john.doe".to_owned(),
            password: "my_password".to_owned(),
        })
        .await;
    assert_eq!(resp.unwrap_err().to_string(), INVALID);

    let user = helpers::create_user(&cmd, "john.doe").await?;

    let resp = cmd
        .login(LoginInput {
            username: "john.doe".to_owned(),
            password: "my_password3".to_owned(),
        })
        .await;
    assert_eq!(resp.unwrap_err().to_string(), INVALID);

    let resp = cmd
        .login(LoginInput {
            username: "John.Doe".to_owned(),
            password: "my_password".to_owned(),
        })
        .await;
    assert_eq!(resp.unwrap_err().to_string(), INVALID);

    let id = cmd
        .login(LoginInput {
            username: "john.doe".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?;
    assert_eq!(id, user);

    let user = nikjin_user::Query(state.read_db.clone())
        .find(&id)
        .await?
        .unwrap();
    assert!(user.last_login.is_some());

    Ok(())
}
