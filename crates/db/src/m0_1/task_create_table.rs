use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Task, User};

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(Task::Table)
        .col(
            ColumnDef::new(Task::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Task::Title)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(
            ColumnDef::new(Task::Description)
                .text()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Task::Priority)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(Task::Status)
                .string()
                .not_null()
                .string_len(20),
        )
        .col(
            ColumnDef::new(Task::AssignedTo)
                .string()
                .null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Task::CreatedBy)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(Task::DueDate).big_integer().null())
        .col(ColumnDef::new(Task::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Task::UpdatedAt).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_task_assigned_to")
                .from(Task::Table, Task::AssignedTo)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_task_created_by")
                .from(Task::Table, Task::CreatedBy)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(Task::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
