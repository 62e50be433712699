use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteQueryResult, FromRow, SqliteConnection};

use crate::{
    error::Result,
    traits::*,
    types::{date::Date, text::Text, uuid::Uuid},
};
use derives::*;

#[derive(Default, Debug, Clone, PartialEq, Eq, FromRow, Id, Names, Serialize, Deserialize)]
pub struct Author {
    pub id:                Uuid,
    pub name:              Text,
    pub bio:               Option<String>,
    pub date_of_birth:     Option<Date>,
    pub country_of_origin: Option<String>,
}

/// Fields a client supplies when creating or replacing an [Author].
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInput {
    pub name:              Text,
    pub bio:               Option<String>,
    pub date_of_birth:     Option<Date>,
    pub country_of_origin: Option<String>,
}

impl AuthorInput {
    pub fn into_author(self, id: Uuid) -> Result<Author> {
        Ok(Author {
            id,
            name: self.name.require("name")?,
            bio: self.bio,
            date_of_birth: self.date_of_birth,
            country_of_origin: self.country_of_origin,
        })
    }
}

impl Queryable for Author {
    const ORDER_BY: &'static str = "name";
}

impl Removeable for Author {}

impl CreateTable for Author {
    async fn create_table(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                bio TEXT,
                date_of_birth TEXT,
                country_of_origin TEXT
            );"#,
            Self::TABLE_NAME
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Author {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!(
            r#"
            INSERT INTO {} ( id, name, bio, date_of_birth, country_of_origin )
            VALUES ( ?1, ?2, ?3, ?4, ?5 )
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&self.name)
        .bind(&self.bio)
        .bind(&self.date_of_birth)
        .bind(&self.country_of_origin)
        .execute(conn)
        .await?)
    }
}

impl Updateable for Author {
    async fn update(&self, conn: &mut SqliteConnection, new: &Self) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!(
            r#"
            UPDATE {}
            SET 
                name = ?2,
                bio = ?3,
                date_of_birth = ?4,
                country_of_origin = ?5
            WHERE
                id = ?1;
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&new.name)
        .bind(&new.bio)
        .bind(&new.date_of_birth)
        .bind(&new.country_of_origin)
        .execute(conn)
        .await?)
    }
}
