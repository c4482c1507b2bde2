use nikjin_user::{CreateUserInput, RegisterInput};
use temp_dir::TempDir;

mod helpers;

fn input(username: &str, password: &str, password_confirm: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_owned(),
        first_name: "John".to_owned(),
        last_name: "Doe".to_owned(),
        email: format!("{username}@nikjin.localhost"),
        password: password.to_owned(),
        password_confirm: password_confirm.to_owned(),
    }
}

fn field_messages(err: nikjin_shared::Error, field: &str) -> Vec<String> {
    let nikjin_shared::Error::Validate(errors) = err else {
        panic!("expected validation errors, got {err}");
    };

    errors
        .field_errors()
        .get(field)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_register() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());
    let query = nikjin_user::Query(state.read_db.clone());

    let id = cmd
        .register(input("john.doe", "s3cure-passphrase", "s3cure-passphrase"))
        .await?;

    let user = query.find(&id).await?.unwrap();
    assert_eq!(user.username, "john.doe");
    assert_eq!(user.display_name(), "John Doe");
    assert_eq!(user.last_login, None);

    let profile = query.find_profile(&id).await?.unwrap();
    assert_eq!(profile.phone, "");
    assert_eq!(profile.profile_picture, None);

    Ok(())
}

#[tokio::test]
async fn test_register_duplicate_username() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());

    helpers::create_user(&cmd, "john.doe").await?;

    let err = cmd
        .register(input("john.doe", "s3cure-passphrase", "s3cure-passphrase"))
        .await
        .unwrap_err();

    assert_eq!(
        field_messages(err, "username"),
        vec!["A user with that username already exists."]
    );

    Ok(())
}

#[tokio::test]
async fn test_register_trims_text_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());
    let query = nikjin_user::Query(state.read_db.clone());

    let id = cmd
        .register(RegisterInput {
            username: " john.doe ".to_owned(),
            first_name: " John".to_owned(),
            last_name: "Doe ".to_owned(),
            email: " john@example.com ".to_owned(),
            password: "s3cure-passphrase".to_owned(),
            password_confirm: "s3cure-passphrase".to_owned(),
        })
        .await?;

    let user = query.find(&id).await?.unwrap();
    assert_eq!(user.username, "john.doe");
    assert_eq!(user.email, "john@example.com");
    assert_eq!(user.display_name(), "John Doe");

    Ok(())
}

#[tokio::test]
async fn test_create_taken_username() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());

    helpers::create_user(&cmd, "john.doe").await?;

    let err = cmd
        .create(CreateUserInput {
            username: "john.doe".to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            email: "john@example.com".to_owned(),
            password: "s3cure-passphrase".to_owned(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        field_messages(err, "username"),
        vec!["A user with that username already exists."]
    );
    assert_eq!(nikjin_user::Query(state.read_db.clone()).count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_register_password_similar_to_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());

    let err = cmd
        .register(input("john_smith", "johnsmith1", "johnsmith1"))
        .await
        .unwrap_err();
    assert_eq!(
        field_messages(err, "password_confirm"),
        vec!["The password is too similar to the username."]
    );

    Ok(())
}

#[tokio::test]
async fn test_register_password_rules() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());

    let err = cmd
        .register(input("jane", "s3cure-passphrase", "s3cure-passphras"))
        .await
        .unwrap_err();
    assert_eq!(
        field_messages(err, "password_confirm"),
        vec!["The two password fields didn’t match."]
    );

    let err = cmd
        .register(input("jane", "12345", "12345"))
        .await
        .unwrap_err();
    let messages = field_messages(err, "password_confirm");
    assert!(messages.contains(
        &"This password is too short. It must contain at least 8 characters.".to_owned()
    ));
    assert!(messages.contains(&"This password is entirely numeric.".to_owned()));

    let err = cmd
        .register(input("jane", "password123", "password123"))
        .await
        .unwrap_err();
    assert_eq!(
        field_messages(err, "password_confirm"),
        vec!["This password is too common."]
    );

    assert_eq!(nikjin_user::Query(state.read_db.clone()).count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_register_required_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());

    let err = cmd
        .register(RegisterInput {
            username: "john doe".to_owned(),
            first_name: "".to_owned(),
            last_name: "Doe".to_owned(),
            email: "not-an-email".to_owned(),
            password: "s3cure-passphrase".to_owned(),
            password_confirm: "s3cure-passphrase".to_owned(),
        })
        .await
        .unwrap_err();

    let nikjin_shared::Error::Validate(errors) = err else {
        panic!("expected validation errors");
    };
    let fields = errors.field_errors();
    assert!(fields.contains_key("username"));
    assert!(fields.contains_key("first_name"));
    assert!(fields.contains_key("email"));
    assert!(!fields.contains_key("last_name"));

    Ok(())
}
