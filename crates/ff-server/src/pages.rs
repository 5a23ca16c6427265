//! Server-rendered HTML pages.
//!
//! The catalog front page, the per-book reviews page, the full-text viewer
//! and the raw table dumps. Markup is built with maud and returned as
//! [`Html`]; failures render an error page with the matching status.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup, DOCTYPE};
use serde::Deserialize;

use ff_db::models::{BookReview, BookSummary, Table, UnreviewedBook};
use ff_db::queries::{self, books, reviews};

use crate::context::AppContext;
use crate::middleware::request_id;
use crate::routes::parse_book_id;

const SITE_TITLE: &str = "AI Fast Fiction Database";

const STYLE: &str = "
body { font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }
.card { display: flex; gap: 1rem; border-bottom: 1px solid #ddd; padding: 1rem 0; }
.card img { width: 120px; height: auto; }
.review .user { font-weight: bold; }
table { border-collapse: collapse; margin-bottom: 2rem; }
td, th { border: 1px solid #ccc; padding: 0.25rem 0.5rem; text-align: left; }
pre { white-space: pre-wrap; }
";

/// Error page wrapper so page handlers can use `?`.
pub struct PageError(ff_core::Error);

impl From<ff_core::Error> for PageError {
    fn from(e: ff_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in page handler");
        }

        let request_id = request_id::current();
        let body = layout(
            status.canonical_reason().unwrap_or("Error"),
            html! {
                p { (self.0) }
                @if let Some(id) = request_id {
                    p { small { "Request ID: " code { (id) } } }
                }
                p { a href="/" { "Back to the catalog" } }
            },
        );
        (status, Html(body.into_string())).into_response()
    }
}

type PageResult = Result<Html<String>, PageError>;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " | " (SITE_TITLE) }
                style { (STYLE) }
            }
            body {
                header {
                    h1 { a href="/" { (SITE_TITLE) } }
                    nav { a href="/" { "Catalog" } " | " a href="/tables" { "Tables" } }
                }
                main {
                    h2 { (title) }
                    (content)
                }
            }
        }
    }
}

fn render(title: &str, content: Markup) -> Html<String> {
    Html(layout(title, content).into_string())
}

/// "4.50", or "No ratings yet" when there are no reviews.
pub fn format_rating(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{avg:.2}"),
        None => "No ratings yet".to_string(),
    }
}

fn review_list(reviews: &[BookReview]) -> Markup {
    html! {
        @if reviews.is_empty() {
            p.empty { "No reviews for this book yet." }
        } @else {
            @for r in reviews {
                div.review {
                    p.user { (r.username) " (" (r.rating) "/5)" }
                    p { (r.review_text) }
                }
            }
        }
    }
}

fn cover(image_url: Option<&str>, title: &str) -> Markup {
    html! {
        @if let Some(url) = image_url {
            img src=(url) alt=(title);
        }
    }
}

fn book_card(book: &BookSummary, reviews: &[BookReview]) -> Markup {
    html! {
        div.card id={ "book-" (book.id) } {
            (cover(book.image_url.as_deref(), &book.title))
            div {
                h3 { (book.title) }
                p { "Author: " (book.author) }
                p { "Average Rating: " (format_rating(book.average_rating)) }
                details {
                    summary { "Show Reviews (" (book.review_count) ")" }
                    (review_list(reviews))
                }
                p { a href={ "/books/" (book.id) "/text" } { "Read full text" } }
            }
        }
    }
}

fn unreviewed_panel(books: &[UnreviewedBook]) -> Markup {
    html! {
        section #unreviewed {
            h2 { "Books Without Reviews" }
            @if books.is_empty() {
                p { "Every book has at least one review." }
            }
            @for b in books {
                div.card {
                    (cover(b.image_url.as_deref(), &b.title))
                    div {
                        h3 { (b.title) }
                        p { "Author: " (b.author) }
                    }
                }
            }
        }
    }
}

/// GET /
pub async fn index(State(ctx): State<AppContext>) -> PageResult {
    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let summaries = books::list_with_ratings(&conn)?;
    let mut cards = Vec::with_capacity(summaries.len());
    for book in &summaries {
        let reviews = reviews::list_for_book(&conn, book.id)?;
        cards.push(book_card(book, &reviews));
    }
    let unreviewed = books::list_without_reviews(&conn)?;

    Ok(render(
        "Current Fiction",
        html! {
            @if cards.is_empty() {
                p { "The catalog is empty." }
            }
            @for card in cards {
                (card)
            }
            section #lookup {
                h2 { "Reviews by Book ID" }
                form action="/reviews" method="get" {
                    label for="book_id" { "Book ID " }
                    input type="number" id="book_id" name="book_id" min="1" required;
                    " "
                    button type="submit" { "Show Reviews" }
                }
            }
            (unreviewed_panel(&unreviewed))
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub book_id: Option<String>,
}

/// GET /reviews?book_id=N
pub async fn book_reviews(
    State(ctx): State<AppContext>,
    query: Result<Query<ReviewsQuery>, QueryRejection>,
) -> PageResult {
    let Query(query) = query.map_err(|e| ff_core::Error::Validation(e.body_text()))?;
    let raw = query
        .book_id
        .ok_or_else(|| ff_core::Error::Validation("book_id is required".into()))?;
    let book_id = parse_book_id(&raw)?;

    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let book = books::get_book(&conn, book_id)?
        .ok_or_else(|| ff_core::Error::not_found("book", book_id))?;
    let reviews = reviews::list_for_book(&conn, book_id)?;

    Ok(render(
        &format!("Reviews of {}", book.title),
        html! {
            (review_list(&reviews))
            p { a href={ "/books/" (book.id) "/text" } { "Read full text" } }
        },
    ))
}

/// GET /books/{id}/text
pub async fn book_text(State(ctx): State<AppContext>, Path(id): Path<String>) -> PageResult {
    let book_id = parse_book_id(&id)?;

    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let book = books::get_book_text(&conn, book_id)?
        .ok_or_else(|| ff_core::Error::not_found("book", book_id))?;

    Ok(render(
        &book.title,
        html! {
            @match &book.text {
                Some(text) => {
                    pre.fulltext { (text) }
                }
                None => {
                    p.empty { "This book has no full text yet." }
                }
            }
        },
    ))
}

/// GET /tables
pub async fn tables(State(ctx): State<AppContext>) -> PageResult {
    let conn = ff_db::pool::get_conn(&ctx.db)?;
    let mut sections = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        let rows = queries::dump_table(&conn, table)?;
        sections.push(table_section(table, &rows));
    }

    Ok(render(
        "Tables",
        html! {
            @for s in sections {
                (s)
            }
        },
    ))
}

fn table_section(table: Table, rows: &[serde_json::Value]) -> Markup {
    let columns: Vec<&str> = rows
        .first()
        .and_then(|r| r.as_object())
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default();

    html! {
        section id={ "table-" (table) } {
            h3 { (table) " (" (rows.len()) ")" }
            @if rows.is_empty() {
                p.empty { "No rows." }
            } @else {
                table {
                    thead { tr { @for c in &columns { th { (c) } } } }
                    tbody {
                        @for row in rows {
                            tr {
                                @for c in &columns {
                                    td { (cell(&row[*c])) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
