//! Author operations.

use ff_core::{AuthorId, Error, Result};
use rusqlite::{Connection, OptionalExtension};

use super::map_write_error;
use crate::models::Author;

/// Insert an author and return it.
pub fn create_author(conn: &Connection, name: &str) -> Result<Author> {
    conn.execute("INSERT INTO authors (name) VALUES (?1)", [name])
        .map_err(|e| map_write_error(e, "create author"))?;

    Ok(Author {
        id: AuthorId::new(conn.last_insert_rowid()),
        name: name.to_string(),
    })
}

/// Look up an author id by display name (first match by id).
pub fn find_author_id_by_name(conn: &Connection, name: &str) -> Result<Option<AuthorId>> {
    conn.query_row(
        "SELECT id FROM authors WHERE name = ?1 ORDER BY id LIMIT 1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|id| id.map(AuthorId::new))
    .map_err(|e| Error::database(e.to_string()))
}

/// List all authors ordered by id.
pub fn list_authors(conn: &Connection) -> Result<Vec<Author>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM authors ORDER BY id")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Author::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
