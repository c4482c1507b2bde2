use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::{Project, ProjectMember, User};

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(ProjectMember::Table)
        .col(
            ColumnDef::new(ProjectMember::ProjectId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(ProjectMember::UserId)
                .string()
                .not_null()
                .string_len(26),
        )
        .primary_key(
            Index::create()
                .col(ProjectMember::ProjectId)
                .col(ProjectMember::UserId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_project_member_project")
                .from(ProjectMember::Table, ProjectMember::ProjectId)
                .to(Project::Table, Project::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_project_member_user")
                .from(ProjectMember::Table, ProjectMember::UserId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(ProjectMember::Table).to_owned()
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
