use std::{net::SocketAddr, sync::Arc};

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, State},
    http::{request::Parts, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    catalog::Catalog,
    error::CatalogError,
    types::{
        author::{Author, AuthorInput},
        book::{BookDetail, BookInput},
        genre::{Genre, GenreInput},
        uuid::Uuid,
    },
};

pub struct AppState {
    catalog: Catalog,
}

type ApiResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::DuplicateIsbn(_)
            | CatalogError::UnknownAuthor(_)
            | CatalogError::UnknownGenre(_)
            | CatalogError::MissingField(_) => StatusCode::BAD_REQUEST,
            CatalogError::Referenced { .. } => StatusCode::CONFLICT,
            CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("{}", self);
            "internal server error".to_string()
        } else {
            warn!("{}", self);
            self.to_string()
        };
        error_body(status, self.code(), message)
    }
}

/// [Path] whose rejection is reported in the same shape as [CatalogError].
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected path: {}", rejection.body_text());
                Err(error_body(
                    rejection.status(),
                    "invalid_path",
                    rejection.body_text(),
                ))
            }
        }
    }
}

/// [Json] body whose rejection is reported in the same shape as [CatalogError].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJson<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    T: Send,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected body: {}", rejection.body_text());
                Err(error_body(
                    rejection.status(),
                    "invalid_body",
                    rejection.body_text(),
                ))
            }
        }
    }
}

pub fn router(catalog: Catalog) -> Router {
    let state = Arc::new(AppState { catalog });

    Router::new()
        .route("/api/authors", get(list_authors).post(create_author))
        .route(
            "/api/authors/:id",
            get(get_author).put(update_author).delete(delete_author),
        )
        .route("/api/genres", get(list_genres).post(create_genre))
        .route(
            "/api/genres/:id",
            get(get_genre).put(update_genre).delete(delete_genre),
        )
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route(
            "/api/books/:id/genres/:genre_id",
            put(attach_genre).delete(detach_genre),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the catalog until ctrl-c is received.
pub async fn start(catalog: Catalog, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(catalog);
    info!("Listening on {addr}.");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {e}");
    }
    info!("Shutting down.");
}

async fn list_authors(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Author>>> {
    Ok(Json(state.catalog.list_authors().await?))
}

async fn create_author(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<AuthorInput>,
) -> ApiResult<(StatusCode, Json<Author>)> {
    let author = state.catalog.create_author(input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

async fn get_author(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Author>> {
    Ok(Json(state.catalog.get_author(Uuid(id)).await?))
}

async fn update_author(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<AuthorInput>,
) -> ApiResult<Json<Author>> {
    Ok(Json(state.catalog.update_author(Uuid(id), input).await?))
}

async fn delete_author(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_author(Uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_genres(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Genre>>> {
    Ok(Json(state.catalog.list_genres().await?))
}

async fn create_genre(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<GenreInput>,
) -> ApiResult<(StatusCode, Json<Genre>)> {
    let genre = state.catalog.create_genre(input).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

async fn get_genre(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Genre>> {
    Ok(Json(state.catalog.get_genre(Uuid(id)).await?))
}

async fn update_genre(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<GenreInput>,
) -> ApiResult<Json<Genre>> {
    Ok(Json(state.catalog.update_genre(Uuid(id), input).await?))
}

async fn delete_genre(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_genre(Uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_books(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<BookDetail>>> {
    Ok(Json(state.catalog.list_books().await?))
}

async fn create_book(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<BookInput>,
) -> ApiResult<(StatusCode, Json<BookDetail>)> {
    let book = state.catalog.create_book(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BookDetail>> {
    Ok(Json(state.catalog.get_book(Uuid(id)).await?))
}

async fn update_book(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<BookInput>,
) -> ApiResult<Json<BookDetail>> {
    Ok(Json(state.catalog.update_book(Uuid(id), input).await?))
}

async fn delete_book(
    ApiPath(id): ApiPath<uuid::Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_book(Uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn attach_genre(
    ApiPath((id, genre_id)): ApiPath<(uuid::Uuid, uuid::Uuid)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BookDetail>> {
    Ok(Json(
        state.catalog.attach_genre(Uuid(id), Uuid(genre_id)).await?,
    ))
}

async fn detach_genre(
    ApiPath((id, genre_id)): ApiPath<(uuid::Uuid, uuid::Uuid)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BookDetail>> {
    Ok(Json(
        state.catalog.detach_genre(Uuid(id), Uuid(genre_id)).await?,
    ))
}
