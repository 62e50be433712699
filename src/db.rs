use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, SqlitePool,
};
use tracing::info;

use crate::{
    error::Result,
    traits::*,
    types::{author::Author, book::Book, book_genre::BookGenre, genre::Genre},
};

/// Opens (and creates if missing) the database file at `location`.
pub async fn connect(location: &Path) -> Result<SqlitePool> {
    info!("Opening database at {}.", location.display());
    Ok(Pool::connect_with(
        SqliteConnectOptions::new()
            .filename(location)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5)),
    )
    .await?)
}

/// Private in-memory database. Limited to a single connection that is never
/// recycled, since every connection would otherwise see its own empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    Ok(SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true))
        .await?)
}

pub async fn create_tables(conn: &SqlitePool) -> Result<()> {
    let mut conn = conn.acquire().await?;
    Author::create_table(&mut conn).await?;
    Genre::create_table(&mut conn).await?;
    Book::create_table(&mut conn).await?;
    BookGenre::create_table(&mut conn).await?;
    Ok(())
}
