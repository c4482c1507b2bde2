use validator::Validate;

use crate::{Profile, repository};

/// What to do with the stored profile picture on update.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProfilePicture {
    #[default]
    Keep,
    Replace(String),
    Clear,
}

#[derive(Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 20, message = "Ensure this value has at most 20 characters."))]
    pub phone: String,
    pub address: String,
    pub profile_picture: ProfilePicture,
}

impl super::Command {
    /// Returns the profile of `user_id`, creating an empty one when missing.
    pub async fn profile(&self, user_id: impl Into<String>) -> nikjin_shared::Result<Profile> {
        let user_id = user_id.into();

        if repository::find(&self.read_db, repository::FindType::Id(user_id.to_owned()))
            .await?
            .is_none()
        {
            nikjin_shared::not_found!("user {user_id}");
        }

        let mut conn = self.write_db.acquire().await?;
        repository::create_profile(&mut conn, user_id.to_owned(), nikjin_shared::now()).await?;
        drop(conn);

        let Some(profile) = crate::Query(self.read_db.clone())
            .find_profile(&user_id)
            .await?
        else {
            nikjin_shared::server!("profile of {user_id} missing after insert");
        };

        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        user_id: impl Into<String>,
        input: UpdateProfileInput,
    ) -> nikjin_shared::Result<()> {
        input.validate()?;

        let user_id = user_id.into();

        // makes sure the row exists before updating it
        self.profile(&user_id).await?;

        let profile_picture = match input.profile_picture {
            ProfilePicture::Keep => None,
            ProfilePicture::Replace(path) => Some(Some(path)),
            ProfilePicture::Clear => Some(None),
        };

        repository::update_profile(
            &self.write_db,
            repository::UpdateProfileInput {
                user_id: user_id.to_owned(),
                phone: input.phone.trim().to_owned(),
                address: input.address.trim().to_owned(),
                profile_picture,
                updated_at: nikjin_shared::now(),
            },
        )
        .await?;

        tracing::info!(user_id = %user_id, "profile updated");

        Ok(())
    }
}
