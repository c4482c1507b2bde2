use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Project, User};

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(Project::Table)
        .col(
            ColumnDef::new(Project::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Project::Name)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(
            ColumnDef::new(Project::Description)
                .text()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Project::ManagerId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(Project::Deadline).big_integer().null())
        .col(
            ColumnDef::new(Project::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(ColumnDef::new(Project::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Project::UpdatedAt).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_project_manager")
                .from(Project::Table, Project::ManagerId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(Project::Table).to_owned()
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
