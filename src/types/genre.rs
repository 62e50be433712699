use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteQueryResult, FromRow, SqliteConnection};

use crate::{
    error::Result,
    traits::*,
    types::{text::Text, uuid::Uuid},
};
use derives::*;

/// Genres offered by `tunr seed-genres`.
pub const DEFAULT_GENRES: &[&str] = &[
    "Fantasy",
    "Science Fiction",
    "Dystopian",
    "Action & Adventure",
    "Mystery",
    "Horror",
    "Thriller",
    "Historical Fiction",
    "Romance",
    "Graphic Novel",
    "Short Story",
    "Young Adult",
    "Children",
    "Autobiography",
    "Biography",
    "Food & Drink",
    "Art & Photography",
    "Self-help",
    "History",
    "Travel",
    "True Crime",
    "Humor",
    "Essays",
    "Religion & Spirituality",
];

#[derive(Default, Debug, Clone, PartialEq, Eq, FromRow, Id, Names, Serialize, Deserialize)]
pub struct Genre {
    pub id:          Uuid,
    pub name:        Text,
    pub description: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreInput {
    pub name:        Text,
    pub description: Option<String>,
}

impl GenreInput {
    pub fn into_genre(self, id: Uuid) -> Result<Genre> {
        Ok(Genre {
            id,
            name: self.name.require("name")?,
            description: self.description,
        })
    }
}

impl Genre {
    pub async fn name_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE name = ?1",
            Self::TABLE_NAME
        ))
        .bind(name)
        .fetch_one(conn)
        .await?;
        Ok(count > 0)
    }

    /// Inserts every entry of [DEFAULT_GENRES] that has no genre of the same name yet.
    /// Returns the number of genres created.
    pub async fn seed_defaults(conn: &mut SqliteConnection) -> Result<usize> {
        let mut created = 0;
        for name in DEFAULT_GENRES {
            if Self::name_exists(&mut *conn, name).await? {
                continue;
            }
            Self {
                id:          Uuid::new(),
                name:        Text::from(*name),
                description: None,
            }
            .insert(&mut *conn)
            .await?;
            created += 1;
        }
        Ok(created)
    }
}

impl Queryable for Genre {
    const ORDER_BY: &'static str = "name";
}

impl Removeable for Genre {}

impl CreateTable for Genre {
    async fn create_table(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT
            );
            "#,
            Self::TABLE_NAME
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Genre {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!(
            r#"
            INSERT INTO {} ( id, name, description )
            VALUES ( ?1, ?2, ?3 )
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&self.name)
        .bind(&self.description)
        .execute(conn)
        .await?)
    }
}

impl Updateable for Genre {
    async fn update(&self, conn: &mut SqliteConnection, new: &Self) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!(
            r#"
            UPDATE {}
            SET 
                name = ?2,
                description = ?3
            WHERE
                id = ?1;
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&new.name)
        .bind(&new.description)
        .execute(conn)
        .await?)
    }
}
