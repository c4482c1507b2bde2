use nikjin_project::ProjectInput;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_create() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john", "jane", "bob"]).await?;
    let cmd = nikjin_project::Command(state.clone());
    let query = nikjin_project::Query(state.read_db.clone());

    let id = cmd
        .create(
            ProjectInput {
                name: "Website Redesign".to_owned(),
                description: "New landing page".to_owned(),
                members: vec![users[2].to_owned(), users[1].to_owned(), users[1].to_owned()],
                deadline: Some(1_900_000_000),
                ..Default::default()
            },
            &users[0],
        )
        .await?;

    let detail = query.find(&id).await?.unwrap();
    assert_eq!(detail.project.name, "Website Redesign");
    assert_eq!(detail.project.manager_username, "john");
    assert!(detail.project.is_active);
    assert_eq!(
        detail.members.iter().map(|m| m.username.as_str()).collect::<Vec<_>>(),
        vec!["bob", "jane"]
    );

    Ok(())
}

#[tokio::test]
async fn test_create_invalid() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let cmd = nikjin_project::Command(state.clone());

    let err = cmd
        .create(
            ProjectInput {
                name: "".to_owned(),
                members: vec!["01JAAAAAAAAAAAAAAAAAAAAAAA".to_owned()],
                ..Default::default()
            },
            &users[0],
        )
        .await
        .unwrap_err();

    let nikjin_shared::Error::Validate(errors) = err else {
        panic!("expected validation errors");
    };
    let fields = errors.field_errors();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("members"));

    assert_eq!(nikjin_project::Query(state.read_db.clone()).count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_members() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john", "jane", "bob"]).await?;
    let cmd = nikjin_project::Command(state.clone());
    let query = nikjin_project::Query(state.read_db.clone());

    let id = cmd
        .create(
            ProjectInput {
                name: "Mobile App".to_owned(),
                members: vec![users[1].to_owned()],
                ..Default::default()
            },
            &users[0],
        )
        .await?;

    cmd.update(
        &id,
        ProjectInput {
            name: "Mobile App v2".to_owned(),
            description: "".to_owned(),
            members: vec![users[2].to_owned()],
            deadline: None,
            is_active: false,
        },
    )
    .await?;

    let detail = query.find(&id).await?.unwrap();
    assert_eq!(detail.project.name, "Mobile App v2");
    assert!(!detail.project.is_active);
    assert_eq!(detail.project.manager_id, users[0]);
    assert_eq!(detail.member_ids(), vec![users[2].to_owned()]);

    let err = cmd
        .update(
            "01JAAAAAAAAAAAAAAAAAAAAAAA",
            ProjectInput {
                name: "Ghost".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, nikjin_shared::Error::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_delete_cascades_members() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john", "jane"]).await?;
    let cmd = nikjin_project::Command(state.clone());

    let id = cmd
        .create(
            ProjectInput {
                name: "Database Migration".to_owned(),
                members: vec![users[1].to_owned()],
                ..Default::default()
            },
            &users[0],
        )
        .await?;

    cmd.delete(&id).await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_member")
        .fetch_one(&state.read_db)
        .await?;
    assert_eq!(count, 0);

    let err = cmd.delete(&id).await.unwrap_err();
    assert!(matches!(err, nikjin_shared::Error::NotFound));

    Ok(())
}
