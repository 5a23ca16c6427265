//! Book listing, review and full-text route handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use ff_core::BookId;
use ff_db::models::{BookReview, BookSummary, BookText, UnreviewedBook};

use super::parse_book_id;
use crate::context::AppContext;
use crate::error::AppError;

/// A catalog entry: book, author and rating.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BookSummaryResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub image_url: Option<String>,
    /// Mean review rating; null when the book has no reviews.
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

impl BookSummaryResponse {
    fn from_model(b: &BookSummary) -> Self {
        Self {
            id: b.id.get(),
            title: b.title.clone(),
            author: b.author.clone(),
            image_url: b.image_url.clone(),
            average_rating: b.average_rating,
            review_count: b.review_count,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UnreviewedBookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub image_url: Option<String>,
}

impl UnreviewedBookResponse {
    fn from_model(b: &UnreviewedBook) -> Self {
        Self {
            id: b.id.get(),
            title: b.title.clone(),
            author: b.author.clone(),
            image_url: b.image_url.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub username: String,
    pub rating: i64,
    pub review_text: String,
}

impl ReviewResponse {
    fn from_model(r: &BookReview) -> Self {
        Self {
            id: r.id.get(),
            username: r.username.clone(),
            rating: r.rating,
            review_text: r.review_text.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BookReviewsResponse {
    pub book_id: i64,
    pub title: String,
    pub reviews: Vec<ReviewResponse>,
}

/// Full text of a book. `text` is null when the book stores no content.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BookTextResponse {
    pub id: i64,
    pub title: String,
    pub has_text: bool,
    pub text: Option<String>,
}

impl BookTextResponse {
    fn from_model(t: BookText) -> Self {
        Self {
            id: t.id.get(),
            title: t.title,
            has_text: t.text.is_some(),
            text: t.text,
        }
    }
}

/// GET /api/books
#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "Every book with author and average rating", body = Vec<BookSummaryResponse>)
    )
)]
pub async fn list_books(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<BookSummaryResponse>>, AppError> {
    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let books = ff_db::queries::books::list_with_ratings(&conn)?;
    Ok(Json(books.iter().map(BookSummaryResponse::from_model).collect()))
}

/// GET /api/books/unreviewed
#[utoipa::path(
    get,
    path = "/api/books/unreviewed",
    responses(
        (status = 200, description = "Books with no reviews", body = Vec<UnreviewedBookResponse>)
    )
)]
pub async fn list_unreviewed(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<UnreviewedBookResponse>>, AppError> {
    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let books = ff_db::queries::books::list_without_reviews(&conn)?;
    Ok(Json(books.iter().map(UnreviewedBookResponse::from_model).collect()))
}

/// GET /api/books/{id}/reviews
#[utoipa::path(
    get,
    path = "/api/books/{id}/reviews",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reviews of the book, possibly empty", body = BookReviewsResponse),
        (status = 400, description = "Malformed book ID"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_reviews(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<BookReviewsResponse>, AppError> {
    let book_id = parse_book_id(&id)?;

    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let book = ff_db::queries::books::get_book(&conn, book_id)?
        .ok_or_else(|| ff_core::Error::not_found("book", book_id))?;
    let reviews = ff_db::queries::reviews::list_for_book(&conn, book_id)?;

    Ok(Json(BookReviewsResponse {
        book_id: book.id.get(),
        title: book.title,
        reviews: reviews.iter().map(ReviewResponse::from_model).collect(),
    }))
}

/// GET /api/books/{id}/text
#[utoipa::path(
    get,
    path = "/api/books/{id}/text",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Full text, null when none is stored", body = BookTextResponse),
        (status = 400, description = "Malformed book ID"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_text(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<BookTextResponse>, AppError> {
    let book_id: BookId = parse_book_id(&id)?;

    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let text = ff_db::queries::books::get_book_text(&conn, book_id)?
        .ok_or_else(|| ff_core::Error::not_found("book", book_id))?;

    Ok(Json(BookTextResponse::from_model(text)))
}
