use std::sync::LazyLock;

use regex::Regex;
use ulid::Ulid;
use validator::{Validate, ValidateEmail, ValidationErrors};

use crate::{password, repository};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]*$").expect("valid username regex"));

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(
        length(max = 150, message = "Ensure this value has at most 150 characters."),
        regex(
            path = *USERNAME_REGEX,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,
    #[validate(length(max = 30, message = "Ensure this value has at most 30 characters."))]
    pub first_name: String,
    #[validate(length(max = 30, message = "Ensure this value has at most 30 characters."))]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterInput {
    /// Surrounding whitespace is dropped from the text fields, passwords stay as typed.
    fn trimmed(self) -> Self {
        Self {
            username: self.username.trim().to_owned(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password,
            password_confirm: self.password_confirm,
        }
    }

    fn check(&self) -> ValidationErrors {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        for (field, value) in [
            ("username", &self.username),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
            ("password_confirm", &self.password_confirm),
        ] {
            if value.trim().is_empty() {
                nikjin_shared::add_field_error(
                    &mut errors,
                    field,
                    "required",
                    "This field is required.",
                );
            }
        }

        if !self.email.is_empty() && !self.email.as_str().validate_email() {
            nikjin_shared::add_field_error(
                &mut errors,
                "email",
                "email",
                "Enter a valid email address.",
            );
        }

        if self.password.is_empty() || self.password_confirm.is_empty() {
            return errors;
        }

        if self.password != self.password_confirm {
            nikjin_shared::add_field_error(
                &mut errors,
                "password_confirm",
                "password_mismatch",
                "The two password fields didn’t match.",
            );

            return errors;
        }

        password::check_strength(
            &mut errors,
            "password_confirm",
            &self.password,
            &password::UserAttributes {
                username: &self.username,
                first_name: &self.first_name,
                last_name: &self.last_name,
                email: &self.email,
            },
        );

        errors
    }
}

/// Account creation without the registration form rules, used by tooling.
pub struct CreateUserInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl super::Command {
    /// Creates an account from the sign-up form. The user still has to log in.
    pub async fn register(&self, input: RegisterInput) -> nikjin_shared::Result<String> {
        let input = input.trimmed();
        let mut errors = input.check();

        if !input.username.is_empty()
            && repository::is_username_exists(&self.read_db, &input.username).await?
        {
            nikjin_shared::add_field_error(&mut errors, "username", "unique", USERNAME_TAKEN);
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        self.create(CreateUserInput {
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password: input.password,
        })
        .await
    }

    /// Inserts the user together with its empty profile. A username taken in
    /// the meantime is reported as a `username` field error.
    pub async fn create(&self, input: CreateUserInput) -> nikjin_shared::Result<String> {
        let password_hash = password::hash(&input.password)?;
        let id = Ulid::new().to_string();
        let now = nikjin_shared::now();

        let mut tx = self.write_db.begin().await?;

        let created = repository::create(
            &mut tx,
            repository::CreateInput {
                id: id.to_owned(),
                username: input.username.to_owned(),
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                password: password_hash,
                created_at: now,
            },
        )
        .await?;

        if !created {
            return Err(nikjin_shared::field_error("username", "unique", USERNAME_TAKEN).into());
        }

        repository::create_profile(&mut tx, id.to_owned(), now).await?;

        tx.commit().await?;

        tracing::info!(user_id = %id, username = %input.username, "user created");

        Ok(id)
    }
}
