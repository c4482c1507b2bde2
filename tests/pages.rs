mod common;

use axum::http::{StatusCode, header};
use common::{body_string, setup_test_app};

#[tokio::test]
async fn test_dashboard_counts() -> anyhow::Result<()> {
    let app = setup_test_app().await?;
    let john = app.create_user("john").await?;
    app.create_user("jane").await?;
    let auth = app.login("john").await?;

    for (title, assigned_to) in [("Mine", john.as_str()), ("Unassigned", "")] {
        app.post_form(
            "/tasks/create",
            &[
                ("title", title),
                ("priority", "medium"),
                ("status", "pending"),
                ("assigned_to", assigned_to),
            ],
            Some(&auth),
        )
        .await?;
    }
    app.post_form("/projects/create", &[("name", "Managed by john")], Some(&auth))
        .await?;

    let response = app.get("/dashboard", Some(&auth)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await?;
    assert!(body.contains("id=\"total-users\">2<"));
    assert!(body.contains("id=\"total-tasks\">2<"));
    assert!(body.contains("id=\"total-projects\">1<"));
    assert!(body.contains("id=\"my-tasks\">1<"));
    assert!(body.contains("Mine"));
    assert!(body.contains("Managed by john"));

    Ok(())
}

#[tokio::test]
async fn test_users_pages() -> anyhow::Result<()> {
    let app = setup_test_app().await?;
    app.create_user("john").await?;
    let jane = app.create_user("jane").await?;
    let auth = app.login("john").await?;

    let body = body_string(app.get("/users?search=JAN", Some(&auth)).await?).await?;
    assert!(body.contains(&format!("/users/{jane}")));
    assert!(!body.contains("john@nikjin.localhost"));

    let response = app.get(&format!("/users/{jane}"), Some(&auth)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await?;
    assert!(body.contains("jane@nikjin.localhost"));
    assert!(body.contains("Never"));

    let response = app.get("/users/unknown", Some(&auth)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_not_found_and_probes() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let response = app.get("/does-not-exist", None).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await?.contains("404"));

    let response = app.get("/health", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await?, r#"{"status":"ok"}"#);

    let response = app.get("/ready", None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/static/css/style.css", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(&b"text/css"[..])
    );

    Ok(())
}
