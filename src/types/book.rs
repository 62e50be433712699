use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteQueryResult, SqliteRow},
    FromRow, Row, SqliteConnection,
};

use crate::{
    error::{CatalogError, Result},
    traits::*,
    types::{author::Author, book_genre::BookGenre, date::Date, genre::Genre, text::Text, uuid::Uuid},
};
use derives::*;

/// A book as stored, referencing its author by id.
#[derive(Default, Debug, Clone, PartialEq, Eq, Id, Names, Serialize, Deserialize)]
pub struct Book {
    pub id:               Uuid,
    pub title:            Text,
    pub isbn:             Text,
    pub publisher:        Option<String>,
    pub publication_date: Option<Date>,
    pub description:      Option<String>,
    pub cover_image:      Option<String>,
    pub author:           Uuid,
}

/// A book with its author and genres resolved to full records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id:               Uuid,
    pub title:            Text,
    pub isbn:             Text,
    pub publisher:        Option<String>,
    pub publication_date: Option<Date>,
    pub description:      Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image:      Option<String>,
    pub author:           Author,
    pub genres:           Vec<Genre>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInput {
    pub title:            Text,
    pub isbn:             Text,
    pub publisher:        Option<String>,
    pub publication_date: Option<Date>,
    pub description:      Option<String>,
    pub cover_image:      Option<String>,
    pub author:           Uuid,
    #[serde(default)]
    pub genres:           Vec<Uuid>,
}

impl BookInput {
    /// Validates required fields and splits the input into the stored book and
    /// its genre ids, with duplicates removed.
    pub fn into_book(self, id: Uuid) -> Result<(Book, Vec<Uuid>)> {
        let book = Book {
            id,
            title: self.title.require("title")?,
            isbn: self.isbn.require("isbn")?,
            publisher: self.publisher,
            publication_date: self.publication_date,
            description: self.description,
            cover_image: self.cover_image,
            author: self.author,
        };
        let mut genres = self.genres;
        genres.sort();
        genres.dedup();
        Ok((book, genres))
    }
}

impl Book {
    /// Resolves the author and genre references.
    pub async fn hydrate(self, conn: &mut SqliteConnection) -> Result<BookDetail> {
        let author = Author::get_by_id(&mut *conn, &self.author)
            .await?
            .ok_or(CatalogError::UnknownAuthor(self.author))?;
        let genres = BookGenre::get_all_for_a(&mut *conn, &self.id).await?;
        Ok(BookDetail {
            id: self.id,
            title: self.title,
            isbn: self.isbn,
            publisher: self.publisher,
            publication_date: self.publication_date,
            description: self.description,
            cover_image: self.cover_image,
            author,
            genres,
        })
    }

    /// Whether a book other than `except` already uses `isbn`.
    pub async fn isbn_taken(conn: &mut SqliteConnection, isbn: &Text, except: &Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE isbn = ?1 AND id != ?2",
            Self::TABLE_NAME
        ))
        .bind(isbn)
        .bind(except)
        .fetch_one(conn)
        .await?;
        Ok(count > 0)
    }

    pub async fn count_by_author(conn: &mut SqliteConnection, author: &Uuid) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE author_id = ?1",
            Self::TABLE_NAME
        ))
        .bind(author)
        .fetch_one(conn)
        .await?)
    }
}

impl Queryable for Book {
    const ORDER_BY: &'static str = "title";
}

impl Removeable for Book {}

impl CreateTable for Book {
    async fn create_table(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                isbn TEXT NOT NULL UNIQUE,
                publisher TEXT,
                publication_date TEXT,
                description TEXT,
                cover_image TEXT,
                author_id TEXT NOT NULL,
                FOREIGN KEY (author_id) REFERENCES {} (id) ON DELETE RESTRICT
            );"#,
            Self::TABLE_NAME,
            Author::TABLE_NAME,
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Book {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<SqliteQueryResult> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} ( id, title, isbn, publisher, publication_date, description, cover_image, author_id )
            VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8 )
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&self.title)
        .bind(&self.isbn)
        .bind(&self.publisher)
        .bind(&self.publication_date)
        .bind(&self.description)
        .bind(&self.cover_image)
        .bind(&self.author)
        .execute(conn)
        .await
        .map_err(|e| CatalogError::from_isbn_write(e, &self.isbn.0))
    }
}

impl Updateable for Book {
    async fn update(&self, conn: &mut SqliteConnection, new: &Self) -> Result<SqliteQueryResult> {
        sqlx::query(&format!(
            r#"
            UPDATE {}
            SET 
                title = ?2,
                isbn = ?3,
                publisher = ?4,
                publication_date = ?5,
                description = ?6,
                cover_image = ?7,
                author_id = ?8
            WHERE
                id = ?1;
            "#,
            Self::TABLE_NAME
        ))
        .bind(&self.id)
        .bind(&new.title)
        .bind(&new.isbn)
        .bind(&new.publisher)
        .bind(&new.publication_date)
        .bind(&new.description)
        .bind(&new.cover_image)
        .bind(&new.author)
        .execute(conn)
        .await
        .map_err(|e| CatalogError::from_isbn_write(e, &new.isbn.0))
    }
}

impl FromRow<'_, SqliteRow> for Book {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id:               row.try_get("id")?,
            title:            row.try_get("title")?,
            isbn:             row.try_get("isbn")?,
            publisher:        row.try_get("publisher")?,
            publication_date: row.try_get("publication_date")?,
            description:      row.try_get("description")?,
            cover_image:      row.try_get("cover_image")?,
            author:           row.try_get("author_id")?,
        })
    }
}
