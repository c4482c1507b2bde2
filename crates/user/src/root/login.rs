use crate::{password, repository};

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

const INVALID_LOGIN: &str = "Please enter a correct username and password. Note that both fields may be case-sensitive.";

impl super::Command {
    /// Checks the credentials and returns the user id.
    pub async fn login(&self, input: LoginInput) -> nikjin_shared::Result<String> {
        let Some(user) = repository::find(
            &self.read_db,
            repository::FindType::Username(input.username.trim().to_owned()),
        )
        .await?
        else {
            nikjin_shared::user!("{INVALID_LOGIN}");
        };

        if !password::verify(&input.password, &user.password)? {
            tracing::debug!(user_id = %user.id, "login rejected");

            nikjin_shared::user!("{INVALID_LOGIN}");
        }

        repository::update_last_login(&self.write_db, user.id.to_owned(), nikjin_shared::now())
            .await?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(user.id)
    }
}
