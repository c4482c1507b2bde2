use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{User, UserProfile};

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(UserProfile::Table)
        .col(
            ColumnDef::new(UserProfile::UserId)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(UserProfile::Phone)
                .string()
                .not_null()
                .string_len(20)
                .default(""),
        )
        .col(
            ColumnDef::new(UserProfile::Address)
                .text()
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(UserProfile::ProfilePicture).string().null())
        .col(
            ColumnDef::new(UserProfile::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(UserProfile::UpdatedAt)
                .big_integer()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_user_profile_user")
                .from(UserProfile::Table, UserProfile::UserId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(UserProfile::Table).to_owned()
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
