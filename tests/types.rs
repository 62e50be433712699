use pretty_assertions::assert_eq;
use serde_json::json;

use tunr::{
    error::CatalogError,
    types::{
        author::AuthorInput,
        book::{BookDetail, BookInput},
        date::Date,
        text::Text,
        uuid::Uuid,
    },
};

#[test]
fn book_input_from_json() {
    let author = Uuid::new();
    let input: BookInput = serde_json::from_value(json!({
        "title": "Dracula",
        "isbn": "978-0-14-143984-6",
        "publication_date": "1897-05-26",
        "author": author,
    }))
    .unwrap();
    assert_eq!(
        input,
        BookInput {
            title: Text::from("Dracula"),
            isbn: Text::from("978-0-14-143984-6"),
            publisher: None,
            publication_date: Date::from_ymd(1897, 5, 26),
            description: None,
            cover_image: None,
            author,
            genres: vec![],
        }
    );
}

#[test]
fn into_book_validates_and_dedups() {
    let author = Uuid::new();
    let genre = Uuid::new();
    let id = Uuid::new();
    let (book, genres) = BookInput {
        title: Text::from("Dracula"),
        isbn: Text::from("978-0-14-143984-6"),
        author,
        genres: vec![genre, genre],
        ..BookInput::default()
    }
    .into_book(id)
    .unwrap();
    assert_eq!(book.id, id);
    assert_eq!(book.author, author);
    assert_eq!(genres, vec![genre]);

    let err = AuthorInput {
        name: Text::from(" \t"),
        ..AuthorInput::default()
    }
    .into_author(id)
    .unwrap_err();
    assert!(matches!(err, CatalogError::MissingField("name")));
}

#[test]
fn cover_image_is_omitted_when_absent() {
    let book: BookDetail = serde_json::from_value(json!({
        "id": Uuid::new(),
        "title": "Dracula",
        "isbn": "1",
        "publisher": null,
        "publication_date": null,
        "description": null,
        "author": {
            "id": Uuid::new(),
            "name": "Bram Stoker",
            "bio": null,
            "date_of_birth": "1847-11-08",
            "country_of_origin": "IE"
        },
        "genres": []
    }))
    .unwrap();
    let value = serde_json::to_value(&book).unwrap();
    assert!(value.get("cover_image").is_none());
    assert_eq!(value["author"]["date_of_birth"], "1847-11-08");
}
