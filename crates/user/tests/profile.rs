use nikjin_user::{ProfilePicture, UpdateProfileInput};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_profile_get_or_create() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());
    let user = helpers::create_user(&cmd, "john.doe").await?;

    sqlx::query("DELETE FROM user_profile WHERE user_id = ?")
        .bind(&user)
        .execute(&state.write_db)
        .await?;

    let profile = cmd.profile(&user).await?;
    assert_eq!(profile.user_id, user);
    assert_eq!(profile.address, "");

    let err = cmd.profile("01JAAAAAAAAAAAAAAAAAAAAAAA").await.unwrap_err();
    assert!(matches!(err, nikjin_shared::Error::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_update_profile() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = nikjin_user::Command(state.clone());
    let user = helpers::create_user(&cmd, "john.doe").await?;

    cmd.update_profile(
        &user,
        UpdateProfileInput {
            phone: " +33 6 12 34 56 78 ".to_owned(),
            address: "1 rue de la Paix".to_owned(),
            profile_picture: ProfilePicture::Replace("profile_pics/john.png".to_owned()),
        },
    )
    .await?;

    let profile = cmd.profile(&user).await?;
    assert_eq!(profile.phone, "+33 6 12 34 56 78");
    assert_eq!(profile.profile_picture.as_deref(), Some("profile_pics/john.png"));

    cmd.update_profile(
        &user,
        UpdateProfileInput {
            phone: "".to_owned(),
            address: "".to_owned(),
            profile_picture: ProfilePicture::Keep,
        },
    )
    .await?;
    let profile = cmd.profile(&user).await?;
    assert_eq!(profile.profile_picture.as_deref(), Some("profile_pics/john.png"));

    cmd.update_profile(
        &user,
        UpdateProfileInput {
            phone: "".to_owned(),
            address: "".to_owned(),
            profile_picture: ProfilePicture::Clear,
        },
    )
    .await?;
    let profile = cmd.profile(&user).await?;
    assert_eq!(profile.profile_picture, None);

    let err = cmd
        .update_profile(
            &user,
            UpdateProfileInput {
                phone: "0".repeat(21),
                address: "".to_owned(),
                profile_picture: ProfilePicture::Keep,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, nikjin_shared::Error::Validate(_)));

    Ok(())
}
