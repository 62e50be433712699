use std::path::PathBuf;

use tunr::{
    catalog::Catalog,
    db,
    types::{
        author::{Author, AuthorInput},
        book::BookInput,
        date::Date,
        genre::{Genre, GenreInput},
        text::Text,
        uuid::Uuid,
    },
};

pub async fn catalog() -> Catalog {
    let conn = db::connect_in_memory().await.unwrap();
    db::create_tables(&conn).await.unwrap();
    Catalog::new(conn)
}

/// Database file in the temp dir, removed together with its WAL files on drop.
pub struct ScratchDb {
    pub path: PathBuf,
}

impl Drop for ScratchDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// Catalog on a file database, so writers get a connection each.
pub async fn file_catalog() -> (Catalog, ScratchDb) {
    let scratch = ScratchDb {
        path: std::env::temp_dir().join(format!("tunr-{}.db", uuid::Uuid::new_v4())),
    };
    let conn = db::connect(&scratch.path).await.unwrap();
    db::create_tables(&conn).await.unwrap();
    (Catalog::new(conn), scratch)
}

pub fn jane_doe() -> AuthorInput {
    AuthorInput {
        name:              Text::from("Jane Doe"),
        bio:               None,
        date_of_birth:     Date::from_ymd(1970, 1, 1),
        country_of_origin: Some("UK".into()),
    }
}

pub async fn create_author(catalog: &Catalog) -> Author {
    catalog.create_author(jane_doe()).await.unwrap()
}

pub async fn create_genre(catalog: &Catalog, name: &str) -> Genre {
    catalog
        .create_genre(GenreInput {
            name:        Text::from(name),
            description: Some(format!("All about {name}")),
        })
        .await
        .unwrap()
}

pub fn book(title: &str, isbn: &str, author: Uuid) -> BookInput {
    BookInput {
        title: Text::from(title),
        isbn: Text::from(isbn),
        author,
        ..BookInput::default()
    }
}
