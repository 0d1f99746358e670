//! HTTP server for bookshelf
//!
//! axum Router <-> application::BookService / RenderService
//!
//! Routes: GET/POST /books, GET/PUT/DELETE /books/{isbn}, GET /books/{isbn}/cover

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;

use crate::application::error::AppError;
use crate::application::render::RenderService;
use crate::application::service::BookService;
use crate::config::Config;
use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::isbn::Isbn;
use crate::domain::repository::BookRepository;
use crate::infra::json_store::JsonBookRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// HTTPサーバを起動し、Ctrl-Cまで待つ。
pub async fn run(config: Config) -> anyhow::Result<()> {
    let repo = JsonBookRepository::new(&config.storage.data_file);
    let service = Arc::new(BookService::new(repo));

    let state = service.load().state;
    if state.is_degraded() {
        tracing::warn!(
            path = %service.repository().path().display(),
            ?state,
            "book store unreadable at startup; serving an empty collection"
        );
    }

    let app = router(service);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        %addr,
        data_file = %config.storage.data_file.display(),
        "bookshelf listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("bookshelf stopped");
    Ok(())
}

/// ルーティング。テストからはRepositoryを差し替えて使う。
pub fn router<R>(service: Arc<BookService<R>>) -> Router
where
    R: BookRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/books", get(list_books::<R>).post(create_book::<R>))
        .route(
            "/books/{isbn}",
            get(get_book::<R>)
                .put(replace_book::<R>)
                .delete(delete_book::<R>),
        )
        .route("/books/{isbn}/cover", get(book_cover::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: Book,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// ハンドラのエラー。本体は常に `{"detail": ...}` で返す。
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    /// ボディがJSONとして読めない・Bookの形をしていない
    Body(JsonRejection),
    /// blocking taskがpanicした・キャンセルされた
    Task(JoinError),
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::App(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Body(e)
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        Self::Task(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::App(AppError::Domain(DomainError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, "Book not found".to_string())
            }
            Self::App(AppError::Domain(DomainError::Conflict(_))) => (
                StatusCode::BAD_REQUEST,
                "Book with this ISBN already exists".to_string(),
            ),
            Self::App(AppError::Storage(e)) => {
                tracing::error!(error = %e, "failed to persist book store");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to write book store".to_string(),
                )
            }
            Self::Body(rejection) => (rejection.status(), rejection.body_text()),
            Self::Task(e) => {
                tracing::error!(error = %e, "book store task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// ファイルI/Oとロック待ちをblockingスレッドで実行する。
async fn blocking<R, T, F>(svc: Arc<BookService<R>>, f: F) -> Result<T, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&BookService<R>) -> T + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || f(&svc)).await?)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_books<R>(
    State(svc): State<Arc<BookService<R>>>,
) -> Result<Json<Vec<Book>>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    Ok(Json(blocking(svc, |svc| svc.list()).await?))
}

async fn get_book<R>(
    State(svc): State<Arc<BookService<R>>>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let isbn = Isbn::from(isbn);
    Ok(Json(blocking(svc, move |svc| svc.get(&isbn)).await??))
}

async fn create_book<R>(
    State(svc): State<Arc<BookService<R>>>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let Json(book) = payload?;
    Ok(Json(blocking(svc, move |svc| svc.create(book)).await??))
}

async fn replace_book<R>(
    State(svc): State<Arc<BookService<R>>>,
    Path(isbn): Path<String>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let Json(book) = payload?;
    let isbn = Isbn::from(isbn);
    Ok(Json(
        blocking(svc, move |svc| svc.replace(&isbn, book)).await??,
    ))
}

async fn delete_book<R>(
    State(svc): State<Arc<BookService<R>>>,
    Path(isbn): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let isbn = Isbn::from(isbn);
    let deleted = blocking(svc, move |svc| svc.delete(&isbn)).await??;
    Ok(Json(DeletedResponse { deleted }))
}

async fn book_cover<R>(
    State(svc): State<Arc<BookService<R>>>,
    Path(isbn): Path<String>,
) -> Result<Html<String>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let isbn = Isbn::from(isbn);
    let book = blocking(svc, move |svc| svc.get(&isbn)).await??;
    Ok(Html(RenderService::render_cover_html(&book)))
}
