//! Rust structs mapping to database tables and join results.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Column order in the queries must match.

use std::fmt;
use std::str::FromStr;

use ff_core::{AuthorId, BookId, Error, ReviewId, UserId};
use rusqlite::types::ValueRef;
use serde::Serialize;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Read an integer row id into a typed ID.
fn get_id<T: From<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    row.get::<_, i64>(idx).map(T::from)
}

/// Decode a text-or-blob column lossily. Stores written by other tools may
/// hold the body as TEXT rather than BLOB, and neither is guaranteed UTF-8.
fn get_lossy_text(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

impl Author {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            name: row.get(1)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Book
// ---------------------------------------------------------------------------

/// A row of `books` without the content blob.
///
/// `content_bytes` is the stored length; `None` when no text is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    pub image_url: Option<String>,
    pub has_content: bool,
    pub content_bytes: Option<i64>,
}

impl Book {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let content_bytes: Option<i64> = row.get(4)?;
        Ok(Self {
            id: get_id(row, 0)?,
            title: row.get(1)?,
            author_id: get_id(row, 2)?,
            image_url: row.get(3)?,
            has_content: content_bytes.is_some(),
            content_bytes,
        })
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A row of `users`. The credential hash is never loaded into this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub has_password: bool,
}

impl User {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            username: row.get(1)?,
            has_password: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub rating: i64,
    pub review_text: String,
}

impl Review {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            book_id: get_id(row, 1)?,
            user_id: get_id(row, 2)?,
            rating: row.get(3)?,
            review_text: row.get(4)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Join results
// ---------------------------------------------------------------------------

/// One entry of the catalog listing: a book with its author and rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub image_url: Option<String>,
    /// Mean rating; `None` when the book has no reviews.
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

impl BookSummary {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            image_url: row.get(3)?,
            average_rating: row.get(4)?,
            review_count: row.get(5)?,
        })
    }
}

/// A review joined with its reviewer's username.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookReview {
    pub id: ReviewId,
    pub username: String,
    pub rating: i64,
    pub review_text: String,
}

impl BookReview {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            username: row.get(1)?,
            rating: row.get(2)?,
            review_text: row.get(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreviewedBook {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub image_url: Option<String>,
}

impl UnreviewedBook {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            image_url: row.get(3)?,
        })
    }
}

/// Full text of a book. `text` is `None` when the book stores no content,
/// which is distinct from the book not existing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookText {
    pub id: BookId,
    pub title: String,
    pub text: Option<String>,
}

impl BookText {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: get_id(row, 0)?,
            title: row.get(1)?,
            text: get_lossy_text(row, 2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The four catalog tables, as named in dumps and row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Authors,
    Books,
    Users,
    Reviews,
}

impl Table {
    /// All tables in seeding (dependency) order.
    pub const ALL: [Table; 4] = [Table::Authors, Table::Books, Table::Users, Table::Reviews];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Authors => "authors",
            Table::Books => "books",
            Table::Users => "users",
            Table::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authors" => Ok(Table::Authors),
            "books" => Ok(Table::Books),
            "users" => Ok(Table::Users),
            "reviews" => Ok(Table::Reviews),
            other => Err(Error::Validation(format!(
                "unknown table '{other}' (expected authors, books, users or reviews)"
            ))),
        }
    }
}
