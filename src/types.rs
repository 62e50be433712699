pub mod date;
pub mod text;
pub mod uuid;

pub mod author;
pub mod book;
pub mod book_genre;
pub mod genre;
