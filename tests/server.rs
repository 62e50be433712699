mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use tunr::server;

async fn app() -> Router {
    server::router(common::catalog().await)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_jane(app: &Router) -> Value {
    let (status, author) = send(
        app,
        Method::POST,
        "/api/authors",
        Some(json!({
            "name": "Jane Doe",
            "date_of_birth": "1970-01-01",
            "country_of_origin": "UK"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    author
}

#[tokio::test]
async fn book_json_embeds_author_and_genres() {
    let app = app().await;
    let jane = create_jane(&app).await;
    assert_eq!(jane["name"], "Jane Doe");
    assert_eq!(jane["bio"], Value::Null);
    assert_eq!(jane["date_of_birth"], "1970-01-01");

    let (status, genre) = send(
        &app,
        Method::POST,
        "/api/genres",
        Some(json!({ "name": "Mystery", "description": "Whodunits" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, book) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({
            "title": "Example",
            "isbn": "978-0-00-000000-0",
            "author": jane["id"],
            "genres": [genre["id"]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, read) = send(&app, Method::GET, &format!("/api/books/{}", book["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        read,
        json!({
            "id": book["id"],
            "title": "Example",
            "isbn": "978-0-00-000000-0",
            "publisher": null,
            "publication_date": null,
            "description": null,
            "author": jane,
            "genres": [genre]
        })
    );
}

#[tokio::test]
async fn duplicate_isbn_is_a_bad_request() {
    let app = app().await;
    let jane = create_jane(&app).await;
    let body = json!({ "title": "Example", "isbn": "978-0-00-000000-0", "author": jane["id"] });

    let (status, _) = send(&app, Method::POST, "/api/books", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, error) = send(&app, Method::POST, "/api/books", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "duplicate_isbn");
}

#[tokio::test]
async fn update_book_keeps_own_isbn() {
    let app = app().await;
    let jane = create_jane(&app).await;
    let (_, book) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Example", "isbn": "111", "author": jane["id"] })),
    )
    .await;
    let uri = format!("/api/books/{}", book["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "title": "Example",
            "isbn": "111",
            "publisher": "Examples Ltd",
            "cover_image": "covers/example.jpg",
            "author": jane["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["publisher"], "Examples Ltd");
    assert_eq!(updated["cover_image"], "covers/example.jpg");
}

#[tokio::test]
async fn unknown_author_and_missing_records() {
    let app = app().await;
    let missing = uuid::Uuid::new_v4();

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Orphan", "isbn": "1", "author": missing })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "unknown_author");

    let (status, error) = send(&app, Method::GET, &format!("/api/authors/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "not_found");

    let (status, error) = send(&app, Method::GET, "/api/books/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "invalid_path");

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "isbn": "1", "author": missing })),
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(error["error"], "invalid_body");
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app().await;

    let uri = format!("/api/books/{}/genres/nope", uuid::Uuid::new_v4());
    let (status, error) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "invalid_path");
    assert!(error["message"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/authors")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["error"], "invalid_body");

    let (status, error) = send(&app, Method::POST, "/api/genres", None).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error["error"], "invalid_body");
}

#[tokio::test]
async fn delete_author_conflicts_until_books_are_gone() {
    let app = app().await;
    let jane = create_jane(&app).await;
    let author_uri = format!("/api/authors/{}", jane["id"].as_str().unwrap());
    let (_, book) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Example", "isbn": "1", "author": jane["id"] })),
    )
    .await;

    let (status, error) = send(&app, Method::DELETE, &author_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "referenced");

    let book_uri = format!("/api/books/{}", book["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &book_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &author_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, authors) = send(&app, Method::GET, "/api/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(authors, json!([]));
}

#[tokio::test]
async fn attach_and_detach_genre_routes() {
    let app = app().await;
    let jane = create_jane(&app).await;
    let (_, genre) = send(&app, Method::POST, "/api/genres", Some(json!({ "name": "Travel" }))).await;
    let (_, book) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "Example", "isbn": "1", "author": jane["id"], "genres": [] })),
    )
    .await;
    assert_eq!(book["genres"], json!([]));
    let uri = format!(
        "/api/books/{}/genres/{}",
        book["id"].as_str().unwrap(),
        genre["id"].as_str().unwrap()
    );

    let (status, attached) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attached["genres"], json!([genre]));

    let (status, detached) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detached["genres"], json!([]));

    let (status, genres) = send(&app, Method::GET, "/api/genres", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(genres, json!([genre]));
}
