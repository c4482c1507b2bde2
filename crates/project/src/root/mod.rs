use std::ops::Deref;

use ulid::Ulid;
use validator::{Validate, ValidationErrors};

use crate::repository;

#[derive(Validate, Clone)]
pub struct ProjectInput {
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
    pub deadline: Option<i64>,
    pub is_active: bool,
}

impl Default for ProjectInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            members: vec![],
            deadline: None,
            is_active: true,
        }
    }
}

#[derive(Clone)]
pub struct Command(pub nikjin_shared::State);

impl Deref for Command {
    type Target = nikjin_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Member ids without blanks or repeats, in submitted order.
fn member_ids(input: &ProjectInput) -> Vec<String> {
    let mut members: Vec<String> = vec![];
    for id in input.members.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !members.iter().any(|m| m == id) {
            members.push(id.to_owned());
        }
    }

    members
}

impl Command {
    /// Every field error of `input`, empty when it can be stored.
    pub async fn field_errors(&self, input: &ProjectInput) -> nikjin_shared::Result<ValidationErrors> {
        let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);

        if input.name.trim().is_empty() {
            nikjin_shared::add_field_error(&mut errors, "name", "required", "This field is required.");
        }

        if let Some(id) = repository::unknown_users(&self.read_db, &member_ids(input)).await?.first() {
            nikjin_shared::add_field_error(
                &mut errors,
                "members",
                "invalid_choice",
                format!("Select a valid choice. {id} is not one of the available choices."),
            );
        }

        Ok(errors)
    }

    async fn check(&self, input: ProjectInput) -> nikjin_shared::Result<repository::ProjectRecord> {
        let errors = self.field_errors(&input).await?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(repository::ProjectRecord {
            name: input.name.trim().to_owned(),
            description: input.description.trim().to_owned(),
            members: member_ids(&input),
            deadline: input.deadline,
            is_active: input.is_active,
        })
    }

    /// Creates the project managed by `manager_id` together with its members.
    pub async fn create(
        &self,
        input: ProjectInput,
        manager_id: impl Into<String>,
    ) -> nikjin_shared::Result<String> {
        let record = self.check(input).await?;
        let manager_id = manager_id.into();
        let id = Ulid::new().to_string();

        let mut tx = self.write_db.begin().await?;
        repository::create(
            &mut tx,
            id.to_owned(),
            &record,
            manager_id.to_owned(),
            nikjin_shared::now(),
        )
        .await?;
        repository::replace_members(&mut tx, id.to_owned(), &record.members).await?;
        tx.commit().await?;

        tracing::info!(
            project_id = %id,
            manager_id = %manager_id,
            members = record.members.len(),
            "project created"
        );

        Ok(id)
    }

    /// Updates the project fields and replaces its member list. The manager never changes.
    pub async fn update(
        &self,
        id: impl Into<String>,
        input: ProjectInput,
    ) -> nikjin_shared::Result<()> {
        let id = id.into();
        let record = self.check(input).await?;

        let mut tx = self.write_db.begin().await?;
        if !repository::update(&mut tx, id.to_owned(), &record, nikjin_shared::now()).await? {
            nikjin_shared::not_found!("project {id}");
        }
        repository::replace_members(&mut tx, id.to_owned(), &record.members).await?;
        tx.commit().await?;

        tracing::info!(project_id = %id, members = record.members.len(), "project updated");

        Ok(())
    }

    pub async fn delete(&self, id: impl Into<String>) -> nikjin_shared::Result<()> {
        let id = id.into();

        if !repository::delete(&self.write_db, id.to_owned()).await? {
            nikjin_shared::not_found!("project {id}");
        }

        tracing::info!(project_id = %id, "project deleted");

        Ok(())
    }
}
