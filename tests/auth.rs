mod common;

use axum::http::StatusCode;
use common::{body_string, cookie, location, setup_test_app};

#[tokio::test]
async fn test_home_page() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let response = app.get("/", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await?.contains("Welcome to NikJin"));

    app.create_user("john").await?;
    let auth = app.login("john").await?;

    let response = app.get("/", Some(&auth)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));

    Ok(())
}

#[tokio::test]
async fn test_anonymous_is_sent_to_login() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    for uri in ["/dashboard", "/tasks?page=2", "/projects/create", "/users", "/profile"] {
        let response = app.get(uri, None).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            location(&response),
            Some(format!("/login?next={}", urlencoding::encode(uri)).as_str())
        );
    }

    let response = app
        .post_form("/tasks/create", &[("title", "Sneaky")], None)
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.state.task_query.count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_register_then_login() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let response = app
        .post_form(
            "/register",
            &[
                ("username", "jane"),
                ("first_name", "Jane"),
                ("last_name", "Smith"),
                ("email", "jane@example.com"),
                ("password", "a-much-better-pass"),
                ("password_confirm", "a-much-better-pass"),
            ],
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(cookie(&response, "auth_token").is_none());

    let flash = cookie(&response, "flash").expect("flash cookie");
    let response = app.get("/login", Some(&flash)).await?;
    assert_eq!(cookie(&response, "flash").as_deref(), Some("flash="));
    assert!(
        body_string(response)
            .await?
            .contains("Registration successful! Please login with your new account.")
    );

    let response = app
        .post_form(
            "/login",
            &[
                ("username", "jane"),
                ("password", "a-much-better-pass"),
                ("next", "/tasks"),
            ],
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/tasks"));
    assert!(cookie(&response, "auth_token").is_some());

    let user = app.state.user_query.find_by_username("jane").await?;
    assert!(user.and_then(|u| u.last_login).is_some());

    Ok(())
}

#[tokio::test]
async fn test_register_errors() -> anyhow::Result<()> {
    let app = setup_test_app().await?;
    app.create_user("john").await?;

    let response = app
        .post_form(
            "/register",
            &[
                ("username", "john"),
                ("first_name", "John"),
                ("last_name", "Again"),
                ("email", "not-an-email"),
                ("password", "a-much-better-pass"),
                ("password_confirm", "something-else"),
            ],
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await?;
    assert!(body.contains("Please correct the errors below."));
    assert!(body.contains("A user with that username already exists."));
    assert!(body.contains("Enter a valid email address."));
    assert!(body.contains("The two password fields didn’t match."));
    assert!(!body.contains("a-much-better-pass"));

    assert_eq!(app.state.user_query.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_and_unsafe_next() -> anyhow::Result<()> {
    let app = setup_test_app().await?;
    app.create_user("john").await?;

    let response = app
        .post_form(
            "/login",
            &[("username", "john"), ("password", "wrong-password")],
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie(&response, "auth_token").is_none());
    assert!(
        body_string(response)
            .await?
            .contains("Please enter a correct username and password.")
    );

    let response = app
        .post_form(
            "/login",
            &[
                ("username", "john"),
                ("password", common::PASSWORD),
                ("next", "//evil.example.com"),
            ],
            None,
        )
        .await?;
    assert_eq!(location(&response), Some("/dashboard"));

    let response = app
        .post_form(
            "/login",
            &[
                ("username", "john"),
                ("password", common::PASSWORD),
                ("next", "/\t/evil.example"),
            ],
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));

    Ok(())
}

#[tokio::test]
async fn test_logout() -> anyhow::Result<()> {
    let app = setup_test_app().await?;
    app.create_user("john").await?;
    let auth = app.login("john").await?;

    let response = app.get("/logout", Some(&auth)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    assert_eq!(cookie(&response, "auth_token").as_deref(), Some("auth_token="));

    let flash = cookie(&response, "flash").expect("flash cookie");
    let response = app.get("/", Some(&flash)).await?;
    assert!(
        body_string(response)
            .await?
            .contains("You have been successfully logged out.")
    );

    Ok(())
}

#[tokio::test]
async fn test_tampered_token_is_anonymous() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let response = app
        .get("/dashboard", Some("auth_token=not.a.token"))
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?next=%2Fdashboard"));

    Ok(())
}
