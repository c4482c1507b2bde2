use nikjin_task::{Priority, Status, TaskInput};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_update() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;
    let cmd = nikjin_task::Command(state.clone());
    let query = nikjin_task::Query(state.read_db.clone());

    let id = cmd
        .create(
            TaskInput {
                title: "Deploy".to_owned(),
                assigned_to: Some(jane.to_owned()),
                ..Default::default()
            },
            &john,
        )
        .await?;

    cmd.update(
        &id,
        TaskInput {
            title: "Deploy to production".to_owned(),
            description: "".to_owned(),
            priority: Priority::Low,
            status: Status::Completed,
            assigned_to: None,
            due_date: Some(1_000),
        },
    )
    .await?;

    let task = query.find(&id).await?.unwrap();
    assert_eq!(task.title, "Deploy to production");
    assert_eq!(task.status.0, Status::Completed);
    assert_eq!(task.assigned_to, None);
    assert_eq!(task.created_by, john);
    assert!(!task.is_overdue());

    let err = cmd
        .update(
            "01JAAAAAAAAAAAAAAAAAAAAAAA",
            TaskInput {
                title: "Ghost".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, nikjin_shared::Error::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_delete() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let cmd = nikjin_task::Command(state.clone());
    let query = nikjin_task::Query(state.read_db.clone());

    let id = cmd
        .create(
            TaskInput {
                title: "Deploy".to_owned(),
                ..Default::default()
            },
            &john,
        )
        .await?;

    cmd.delete(&id).await?;
    assert!(query.find(&id).await?.is_none());

    let err = cmd.delete(&id).await.unwrap_err();
    assert!(matches!(err, nikjin_shared::Error::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_unassigned_when_assignee_deleted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;
    let cmd = nikjin_task::Command(state.clone());

    let id = cmd
        .create(
            TaskInput {
                title: "Deploy".to_owned(),
                assigned_to: Some(jane.to_owned()),
                ..Default::default()
            },
            &john,
        )
        .await?;

    sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(&jane)
        .execute(&state.write_db)
        .await?;

    let task = nikjin_task::Query(state.read_db.clone())
        .find(&id)
        .await?
        .unwrap();
    assert_eq!(task.assigned_to, None);

    Ok(())
}
