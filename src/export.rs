use anyhow::Result;
use serde::Serialize;

use crate::{catalog::Catalog, types::book::BookDetail};

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Export {
    #[serde(rename = "Book Id")]
    book_id:          String,
    #[serde(rename = "Title")]
    title:            String,
    #[serde(rename = "ISBN")]
    isbn:             String,
    #[serde(rename = "Author")]
    author:           String,
    #[serde(rename = "Publisher")]
    publisher:        Option<String>,
    #[serde(rename = "Publication Date")]
    publication_date: Option<String>,
    #[serde(rename = "Genres")]
    genres:           String,
}

impl From<BookDetail> for Export {
    fn from(book: BookDetail) -> Self {
        Self {
            book_id:          book.id.to_string(),
            title:            book.title.0,
            isbn:             book.isbn.0,
            author:           book.author.name.0,
            publisher:        book.publisher,
            publication_date: book.publication_date.map(|x| x.to_string()),
            genres:           book
                .genres
                .into_iter()
                .map(|x| x.name.0)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl Export {
    pub async fn new(catalog: &Catalog) -> Result<Vec<Self>> {
        Ok(catalog
            .list_books()
            .await?
            .into_iter()
            .map(Self::from)
            .collect())
    }

    pub fn export(data: Vec<Self>, writer: impl std::io::Write) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in data {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
