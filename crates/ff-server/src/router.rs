//! Axum router construction.
//!
//! Builds the application router with the HTML pages, the JSON API, the
//! OpenAPI document and the middleware layers.

use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::{pages, routes};

#[derive(OpenApi)]
#[openapi(
    info(title = "fastfiction", description = "Read-only book catalog API"),
    paths(
        routes::health::health_check,
        routes::books::list_books,
        routes::books::list_unreviewed,
        routes::books::list_book_reviews,
        routes::books::get_book_text,
        routes::tables::dump_table,
    ),
    components(schemas(
        routes::books::BookSummaryResponse,
        routes::books::UnreviewedBookResponse,
        routes::books::ReviewResponse,
        routes::books::BookReviewsResponse,
        routes::books::BookTextResponse,
        routes::tables::TableDumpResponse,
    ))
)]
pub struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/books", get(routes::books::list_books))
        .route("/books/unreviewed", get(routes::books::list_unreviewed))
        .route("/books/{id}/reviews", get(routes::books::list_book_reviews))
        .route("/books/{id}/text", get(routes::books::get_book_text))
        .route("/tables/{table}", get(routes::tables::dump_table));

    Router::new()
        .route("/", get(pages::index))
        .route("/reviews", get(pages::book_reviews))
        .route("/books/{id}/text", get(pages::book_text))
        .route("/tables", get(pages::tables))
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
