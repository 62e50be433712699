use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    error::{CatalogError, Result},
    traits::*,
    types::{
        author::{Author, AuthorInput},
        book::{Book, BookDetail, BookInput},
        book_genre::BookGenre,
        genre::{Genre, GenreInput},
        uuid::Uuid,
    },
};

/// CRUD operations over authors, genres and books.
///
/// Every write runs inside one transaction, so the checks it performs and the
/// rows it writes can't be interleaved with another writer. Write transactions
/// are taken one at a time through `write`: a deferred SQLite transaction that
/// reads before it writes can't be upgraded once another writer committed.
#[derive(Debug, Clone)]
pub struct Catalog {
    conn:  SqlitePool,
    write: Arc<Mutex<()>>,
}

fn not_found<T: Names>(id: Uuid) -> CatalogError {
    CatalogError::NotFound {
        entity: T::NAME_SINGULAR,
        id,
    }
}

/// Checks a book about to be written against the rest of the catalog.
async fn check_book(conn: &mut SqliteConnection, book: &Book, genres: &[Uuid]) -> Result<()> {
    if Book::isbn_taken(&mut *conn, &book.isbn, &book.id).await? {
        debug!(isbn = %book.isbn, "Rejected duplicate isbn");
        return Err(CatalogError::DuplicateIsbn(book.isbn.0.clone()));
    }
    if !Author::exists(&mut *conn, &book.author).await? {
        return Err(CatalogError::UnknownAuthor(book.author));
    }
    for genre in genres {
        if !Genre::exists(&mut *conn, genre).await? {
            return Err(CatalogError::UnknownGenre(*genre));
        }
    }
    Ok(())
}

impl Catalog {
    pub fn new(conn: SqlitePool) -> Self {
        Self {
            conn,
            write: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.conn
    }

    pub async fn create_author(&self, input: AuthorInput) -> Result<Author> {
        let author = input.into_author(Uuid::new())?;
        let mut conn = self.conn.acquire().await?;
        author.insert(&mut conn).await?;
        info!(id = %author.id, name = %author.name, "Created author");
        Ok(author)
    }

    pub async fn get_author(&self, id: Uuid) -> Result<Author> {
        let mut conn = self.conn.acquire().await?;
        Author::get_by_id(&mut conn, &id)
            .await?
            .ok_or_else(|| not_found::<Author>(id))
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        let mut conn = self.conn.acquire().await?;
        Author::get_all(&mut conn).await
    }

    pub async fn update_author(&self, id: Uuid, input: AuthorInput) -> Result<Author> {
        let new = input.into_author(id)?;
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        let old = Author::get_by_id(&mut tx, &id)
            .await?
            .ok_or_else(|| not_found::<Author>(id))?;
        old.update(&mut tx, &new).await?;
        tx.commit().await?;
        info!(%id, "Updated author");
        Ok(new)
    }

    /// Fails with [CatalogError::Referenced] while any book is written by the author.
    pub async fn delete_author(&self, id: Uuid) -> Result<()> {
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        if !Author::exists(&mut tx, &id).await? {
            return Err(not_found::<Author>(id));
        }
        let books = Book::count_by_author(&mut tx, &id).await?;
        if books > 0 {
            return Err(CatalogError::Referenced {
                entity: Author::NAME_SINGULAR,
                id,
                books,
            });
        }
        Author::remove(&mut tx, &id).await?;
        tx.commit().await?;
        info!(%id, "Deleted author");
        Ok(())
    }

    pub async fn create_genre(&self, input: GenreInput) -> Result<Genre> {
        let genre = input.into_genre(Uuid::new())?;
        let mut conn = self.conn.acquire().await?;
        genre.insert(&mut conn).await?;
        info!(id = %genre.id, name = %genre.name, "Created genre");
        Ok(genre)
    }

    pub async fn get_genre(&self, id: Uuid) -> Result<Genre> {
        let mut conn = self.conn.acquire().await?;
        Genre::get_by_id(&mut conn, &id)
            .await?
            .ok_or_else(|| not_found::<Genre>(id))
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let mut conn = self.conn.acquire().await?;
        Genre::get_all(&mut conn).await
    }

    pub async fn update_genre(&self, id: Uuid, input: GenreInput) -> Result<Genre> {
        let new = input.into_genre(id)?;
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        let old = Genre::get_by_id(&mut tx, &id)
            .await?
            .ok_or_else(|| not_found::<Genre>(id))?;
        old.update(&mut tx, &new).await?;
        tx.commit().await?;
        info!(%id, "Updated genre");
        Ok(new)
    }

    /// Fails with [CatalogError::Referenced] while any book carries the genre.
    pub async fn delete_genre(&self, id: Uuid) -> Result<()> {
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        if !Genre::exists(&mut tx, &id).await? {
            return Err(not_found::<Genre>(id));
        }
        let books = BookGenre::count_for_b(&mut tx, &id).await?;
        if books > 0 {
            return Err(CatalogError::Referenced {
                entity: Genre::NAME_SINGULAR,
                id,
                books,
            });
        }
        Genre::remove(&mut tx, &id).await?;
        tx.commit().await?;
        info!(%id, "Deleted genre");
        Ok(())
    }

    pub async fn seed_genres(&self) -> Result<usize> {
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        let created = Genre::seed_defaults(&mut tx).await?;
        tx.commit().await?;
        info!(created, "Seeded default genres");
        Ok(created)
    }

    pub async fn create_book(&self, input: BookInput) -> Result<BookDetail> {
        let (book, genres) = input.into_book(Uuid::new())?;
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        check_book(&mut tx, &book, &genres).await?;
        book.insert(&mut tx).await?;
        BookGenre::set_for_a(&mut tx, &book.id, &genres).await?;
        let detail = book.hydrate(&mut tx).await?;
        tx.commit().await?;
        info!(id = %detail.id, isbn = %detail.isbn, "Created book");
        Ok(detail)
    }

    pub async fn get_book(&self, id: Uuid) -> Result<BookDetail> {
        let mut conn = self.conn.acquire().await?;
        let book = Book::get_by_id(&mut conn, &id)
            .await?
            .ok_or_else(|| not_found::<Book>(id))?;
        book.hydrate(&mut conn).await
    }

    pub async fn list_books(&self) -> Result<Vec<BookDetail>> {
        let mut conn = self.conn.acquire().await?;
        let books = Book::get_all(&mut conn).await?;
        let mut result = Vec::with_capacity(books.len());
        for book in books {
            result.push(book.hydrate(&mut conn).await?);
        }
        Ok(result)
    }

    /// Replaces every field of the book. Keeping the book's own isbn is not a collision.
    pub async fn update_book(&self, id: Uuid, input: BookInput) -> Result<BookDetail> {
        let (new, genres) = input.into_book(id)?;
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        let old = Book::get_by_id(&mut tx, &id)
            .await?
            .ok_or_else(|| not_found::<Book>(id))?;
        check_book(&mut tx, &new, &genres).await?;
        old.update(&mut tx, &new).await?;
        BookGenre::set_for_a(&mut tx, &id, &genres).await?;
        let detail = new.hydrate(&mut tx).await?;
        tx.commit().await?;
        info!(%id, "Updated book");
        Ok(detail)
    }

    /// Removes the book and its genre links. The genres themselves stay.
    pub async fn delete_book(&self, id: Uuid) -> Result<()> {
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        if !Book::exists(&mut tx, &id).await? {
            return Err(not_found::<Book>(id));
        }
        BookGenre::set_for_a(&mut tx, &id, &[]).await?;
        Book::remove(&mut tx, &id).await?;
        tx.commit().await?;
        info!(%id, "Deleted book");
        Ok(())
    }

    pub async fn attach_genre(&self, id: Uuid, genre: Uuid) -> Result<BookDetail> {
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        let book = Book::get_by_id(&mut tx, &id)
            .await?
            .ok_or_else(|| not_found::<Book>(id))?;
        if !Genre::exists(&mut tx, &genre).await? {
            return Err(CatalogError::UnknownGenre(genre));
        }
        BookGenre::attach(&mut tx, &id, &genre).await?;
        let detail = book.hydrate(&mut tx).await?;
        tx.commit().await?;
        debug!(%id, %genre, "Attached genre");
        Ok(detail)
    }

    /// Detaching a genre the book doesn't carry leaves it unchanged.
    pub async fn detach_genre(&self, id: Uuid, genre: Uuid) -> Result<BookDetail> {
        let _write = self.write.lock().await;
        let mut tx = self.conn.begin().await?;
        let book = Book::get_by_id(&mut tx, &id)
            .await?
            .ok_or_else(|| not_found::<Book>(id))?;
        BookGenre::detach(&mut tx, &id, &genre).await?;
        let detail = book.hydrate(&mut tx).await?;
        tx.commit().await?;
        debug!(%id, %genre, "Detached genre");
        Ok(detail)
    }
}
