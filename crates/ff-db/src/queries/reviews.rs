//! Review operations.

use ff_core::{BookId, Error, Result, ReviewId, UserId};
use rusqlite::Connection;

use super::map_write_error;
use crate::models::{BookReview, Review};

/// Insert a review. The rating range is enforced by the schema; a rating
/// outside 1..=5 comes back as `Error::Validation`.
pub fn create_review(
    conn: &Connection,
    book_id: BookId,
    user_id: UserId,
    rating: i64,
    review_text: &str,
) -> Result<Review> {
    conn.execute(
        "INSERT INTO reviews (book_id, user_id, rating, review_text) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![book_id.get(), user_id.get(), rating, review_text],
    )
    .map_err(|e| map_write_error(e, "create review"))?;

    Ok(Review {
        id: ReviewId::new(conn.last_insert_rowid()),
        book_id,
        user_id,
        rating,
        review_text: review_text.to_string(),
    })
}

/// Reviews of one book with reviewer usernames, ordered by review id.
///
/// An unknown book and a book without reviews both yield an empty list.
pub fn list_for_book(conn: &Connection, book_id: BookId) -> Result<Vec<BookReview>> {
    let mut stmt = conn
        .prepare(
            "SELECT r.id, u.username, r.rating, r.review_text
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.book_id = ?1
             ORDER BY r.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([book_id.get()], BookReview::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// List all reviews ordered by id.
pub fn list_reviews(conn: &Connection) -> Result<Vec<Review>> {
    let mut stmt = conn
        .prepare("SELECT id, book_id, user_id, rating, review_text FROM reviews ORDER BY id")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Review::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
