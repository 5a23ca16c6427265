//! Book operations and the catalog read views.

use ff_core::{AuthorId, BookId, Error, Result};
use rusqlite::{Connection, OptionalExtension};

use super::map_write_error;
use crate::models::{Book, BookSummary, BookText, UnreviewedBook};

const BOOK_COLUMNS: &str =
    "id, title, author_id, image_url, length(CAST(content AS BLOB))";

/// Insert a book and return its dump row.
pub fn create_book(
    conn: &Connection,
    title: &str,
    author_id: AuthorId,
    image_url: Option<&str>,
    content: Option<&[u8]>,
) -> Result<Book> {
    conn.execute(
        "INSERT INTO books (title, author_id, image_url, content) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![title, author_id.get(), image_url, content],
    )
    .map_err(|e| map_write_error(e, &format!("create book '{title}'")))?;

    let content_bytes = content.map(|c| c.len() as i64);
    Ok(Book {
        id: BookId::new(conn.last_insert_rowid()),
        title: title.to_string(),
        author_id,
        image_url: image_url.map(str::to_string),
        has_content: content_bytes.is_some(),
        content_bytes,
    })
}

/// Get a book by primary key.
pub fn get_book(conn: &Connection, id: BookId) -> Result<Option<Book>> {
    conn.query_row(
        &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
        [id.get()],
        Book::from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Look up a book id by title (first match by id).
pub fn find_book_id_by_title(conn: &Connection, title: &str) -> Result<Option<BookId>> {
    conn.query_row(
        "SELECT id FROM books WHERE title = ?1 ORDER BY id LIMIT 1",
        [title],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|id| id.map(BookId::new))
    .map_err(|e| Error::database(e.to_string()))
}

/// List all books ordered by id, reporting content size instead of the blob.
pub fn list_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Book::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// One row per book with its author's name, mean rating and review count.
///
/// Books without reviews have `average_rating == None` and a count of zero.
pub fn list_with_ratings(conn: &Connection) -> Result<Vec<BookSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT b.id, b.title, a.name, b.image_url, AVG(r.rating), COUNT(r.id)
             FROM books b
             JOIN authors a ON a.id = b.author_id
             LEFT JOIN reviews r ON r.book_id = b.id
             GROUP BY b.id
             ORDER BY b.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], BookSummary::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Books that have no reviews at all, found by anti-join.
pub fn list_without_reviews(conn: &Connection) -> Result<Vec<UnreviewedBook>> {
    let mut stmt = conn
        .prepare(
            "SELECT b.id, b.title, a.name, b.image_url
             FROM books b
             JOIN authors a ON a.id = b.author_id
             LEFT JOIN reviews r ON r.book_id = b.id
             WHERE r.id IS NULL
             ORDER BY b.id",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], UnreviewedBook::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Full text of a book, decoded lossily.
///
/// `Ok(None)` means the book does not exist; a found book with no stored
/// content has `text == None`.
pub fn get_book_text(conn: &Connection, id: BookId) -> Result<Option<BookText>> {
    conn.query_row(
        "SELECT id, title, content FROM books WHERE id = ?1",
        [id.get()],
        BookText::from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{authors, reviews, users};

    #[test]
    fn test_single_unreviewed_book() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = authors::create_author(&conn, "A").unwrap();
        let x = create_book(&conn, "X", a.id, None, None).unwrap();

        let unreviewed = list_without_reviews(&conn).unwrap();
        assert_eq!(unreviewed.len(), 1);
        assert_eq!(unreviewed[0].title, "X");

        let summaries = list_with_ratings(&conn).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, x.id);
        assert_eq!(summaries[0].title, "X");
        assert_eq!(summaries[0].author, "A");
        assert_eq!(summaries[0].average_rating, None);
        assert_eq!(summaries[0].review_count, 0);
    }

    #[test]
    fn test_average_and_anti_join_after_reviews() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = authors::create_author(&conn, "A").unwrap();
        let x = create_book(&conn, "X", a.id, None, None).unwrap();
        let y = create_book(&conn, "Y", a.id, None, None).unwrap();
        let u1 = users::create_user(&conn, "u1", None).unwrap();
        let u2 = users::create_user(&conn, "u2", None).unwrap();
        reviews::create_review(&conn, x.id, u1.id, 4, "good").unwrap();
        reviews::create_review(&conn, x.id, u2.id, 5, "great").unwrap();

        let summaries = list_with_ratings(&conn).unwrap();
        assert_eq!(summaries.len(), 2, "one row per book");
        assert_eq!(summaries[0].average_rating, Some(4.5));
        assert_eq!(summaries[0].review_count, 2);
        assert_eq!(summaries[1].average_rating, None);

        let unreviewed: Vec<_> = list_without_reviews(&conn)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(unreviewed, vec![y.id]);
    }

    #[test]
    fn test_create_book_requires_existing_author() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let err = create_book(&conn, "Orphan", AuthorId::new(99), None, None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_get_book_and_dump() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = authors::create_author(&conn, "Luna Nightshade").unwrap();
        let b = create_book(
            &conn,
            "The Hidden Underworld",
            a.id,
            Some("https://example.test/4.png"),
            Some(b"Once upon a time".as_slice()),
        )
        .unwrap();

        let got = get_book(&conn, b.id).unwrap().unwrap();
        assert_eq!(got, b);
        assert!(got.has_content);
        assert_eq!(got.content_bytes, Some(16));

        assert!(get_book(&conn, BookId::new(999)).unwrap().is_none());
        assert_eq!(list_books(&conn).unwrap(), vec![b]);
    }

    #[test]
    fn test_get_book_text_distinguishes_missing_and_empty() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = authors::create_author(&conn, "A").unwrap();
        let with_text = create_book(&conn, "T", a.id, None, Some("Chapter 1".as_bytes())).unwrap();
        let without = create_book(&conn, "N", a.id, None, None).unwrap();

        let t = get_book_text(&conn, with_text.id).unwrap().unwrap();
        assert_eq!(t.text.as_deref(), Some("Chapter 1"));

        let n = get_book_text(&conn, without.id).unwrap().unwrap();
        assert_eq!(n.title, "N");
        assert!(n.text.is_none());

        assert!(get_book_text(&conn, BookId::new(42)).unwrap().is_none());
    }

    #[test]
    fn test_get_book_text_replaces_invalid_utf8() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = authors::create_author(&conn, "A").unwrap();
        let b = create_book(&conn, "Bytes", a.id, None, Some(&[0x61u8, 0xFF, 0x62][..])).unwrap();

        let t = get_book_text(&conn, b.id).unwrap().unwrap();
        assert_eq!(t.text.as_deref(), Some("a\u{FFFD}b"));
    }

    #[test]
    fn test_find_by_title() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = authors::create_author(&conn, "A").unwrap();
        let b = create_book(&conn, "The Clockwork Quest", a.id, None, None).unwrap();
        assert_eq!(find_book_id_by_title(&conn, "The Clockwork Quest").unwrap(), Some(b.id));
        assert_eq!(find_book_id_by_title(&conn, "Missing").unwrap(), None);
    }
}
