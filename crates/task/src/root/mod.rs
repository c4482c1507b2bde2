use std::ops::Deref;

use ulid::Ulid;
use validator::{Validate, ValidationErrors};

use crate::{Priority, Status, repository};

#[derive(Validate, Default, Clone)]
pub struct TaskInput {
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub assigned_to: Option<String>,
    pub due_date: Option<i64>,
}

#[derive(Clone)]
pub struct Command(pub nikjin_shared::State);

impl Deref for Command {
    type Target = nikjin_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn assignee(input: &TaskInput) -> Option<String> {
    input
        .assigned_to
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

impl Command {
    /// Every field error of `input`, empty when it can be stored.
    pub async fn field_errors(&self, input: &TaskInput) -> nikjin_shared::Result<ValidationErrors> {
        let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);

        if input.title.trim().is_empty() {
            nikjin_shared::add_field_error(&mut errors, "title", "required", "This field is required.");
        }

        if let Some(id) = assignee(input) {
            if !repository::is_user_exists(&self.read_db, id).await? {
                nikjin_shared::add_field_error(
                    &mut errors,
                    "assigned_to",
                    "invalid_choice",
                    "Select a valid choice. That choice is not one of the available choices.",
                );
            }
        }

        Ok(errors)
    }

    async fn check(&self, input: TaskInput) -> nikjin_shared::Result<repository::TaskRecord> {
        let errors = self.field_errors(&input).await?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(repository::TaskRecord {
            title: input.title.trim().to_owned(),
            description: input.description.trim().to_owned(),
            assigned_to: assignee(&input),
            priority: input.priority,
            status: input.status,
            due_date: input.due_date,
        })
    }

    pub async fn create(
        &self,
        input: TaskInput,
        created_by: impl Into<String>,
    ) -> nikjin_shared::Result<String> {
        let record = self.check(input).await?;
        let created_by = created_by.into();
        let id = Ulid::new().to_string();

        repository::create(
            &self.write_db,
            id.to_owned(),
            record,
            created_by.to_owned(),
            nikjin_shared::now(),
        )
        .await?;

        tracing::info!(task_id = %id, created_by = %created_by, "task created");

        Ok(id)
    }

    pub async fn update(&self, id: impl Into<String>, input: TaskInput) -> nikjin_shared::Result<()> {
        let id = id.into();
        let record = self.check(input).await?;

        if !repository::update(&self.write_db, id.to_owned(), record, nikjin_shared::now()).await? {
            nikjin_shared::not_found!("task {id}");
        }

        tracing::info!(task_id = %id, "task updated");

        Ok(())
    }

    pub async fn delete(&self, id: impl Into<String>) -> nikjin_shared::Result<()> {
        let id = id.into();

        if !repository::delete(&self.write_db, id.to_owned()).await? {
            nikjin_shared::not_found!("task {id}");
        }

        tracing::info!(task_id = %id, "task deleted");

        Ok(())
    }
}
