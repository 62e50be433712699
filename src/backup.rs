use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    traits::*,
    types::{author::Author, book::Book, book_genre::BookGenre, genre::Genre},
};

/// Contains the entire state of the database
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub authors:     Vec<Author>,
    pub genres:      Vec<Genre>,
    pub books:       Vec<Book>,
    pub book_genres: Vec<BookGenre>,
}

impl State {
    /// Generate [State] struct from database
    pub async fn load(conn: &SqlitePool) -> Result<Self> {
        let mut conn = conn.acquire().await?;
        let mut state = Self {
            authors:     Author::get_all(&mut conn).await?,
            genres:      Genre::get_all(&mut conn).await?,
            books:       Book::get_all(&mut conn).await?,
            book_genres: BookGenre::get_all(&mut conn).await?,
        };
        state.sort();
        Ok(state)
    }

    /// Sort all fields on [State]
    pub fn sort(&mut self) {
        self.authors.sort_by_key(|x| x.id);
        self.genres.sort_by_key(|x| x.id);
        self.books.sort_by_key(|x| x.id);
        self.book_genres
            .sort_by_key(|x| (x.book_id, x.genre_id));
    }

    /// Serialize the state to a string
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a string to state, reporting the path of a failing field
    pub fn deserialize(s: &str) -> Result<State> {
        let de = &mut serde_json::Deserializer::from_str(s);
        Ok(serde_path_to_error::deserialize(de)?)
    }

    /// Replace the contents of the database with this state. Nothing is
    /// changed if any row is rejected.
    pub async fn rebuild(&self, conn: &SqlitePool) -> Result<()> {
        let mut tx = conn.begin().await?;
        BookGenre::clear(&mut tx).await?;
        Book::clear(&mut tx).await?;
        Genre::clear(&mut tx).await?;
        Author::clear(&mut tx).await?;
        for author in &self.authors {
            author.insert(&mut tx).await?;
        }
        for genre in &self.genres {
            genre.insert(&mut tx).await?;
        }
        for book in &self.books {
            book.insert(&mut tx).await?;
        }
        for link in &self.book_genres {
            BookGenre::attach(&mut tx, link.get_id_a(), link.get_id_b()).await?;
        }
        tx.commit().await?;
        info!(
            authors = self.authors.len(),
            genres = self.genres.len(),
            books = self.books.len(),
            "Rebuilt database from backup"
        );
        Ok(())
    }
}
