//! Database query modules.

pub mod authors;
pub mod books;
pub mod reviews;
pub mod users;

use ff_core::{Error, Result};
use rusqlite::{ffi, Connection, ErrorCode};

use crate::models::Table;

/// Map a failed INSERT to the catalog error kinds.
///
/// CHECK and FOREIGN KEY violations are rejected writes (`Validation`),
/// UNIQUE violations are `Conflict`. `what` names the write for messages.
pub(crate) fn map_write_error(e: rusqlite::Error, what: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(ref err, _) = e {
        if err.code == ErrorCode::ConstraintViolation {
            return match err.extended_code {
                ffi::SQLITE_CONSTRAINT_CHECK => {
                    Error::Validation("rating must be between 1 and 5".into())
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    Error::Validation(format!("{what}: referenced row does not exist"))
                }
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Error::Conflict(format!("{what}: row already exists"))
                }
                ffi::SQLITE_CONSTRAINT_NOTNULL => {
                    Error::Validation(format!("{what}: required value missing"))
                }
                _ => Error::Validation(format!("{what}: {e}")),
            };
        }
    }
    Error::database(e.to_string())
}

/// Count the rows currently stored in `table`.
pub fn count_rows(conn: &Connection, table: Table) -> Result<i64> {
    // The table name comes from the closed `Table` enum, never from input.
    let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Every row of `table` as JSON objects, ordered by id.
///
/// Book rows carry the content size rather than the blob and user rows
/// never include the credential.
pub fn dump_table(conn: &Connection, table: Table) -> Result<Vec<serde_json::Value>> {
    fn to_values<T: serde::Serialize>(rows: Vec<T>) -> Result<Vec<serde_json::Value>> {
        rows.into_iter()
            .map(|r| {
                serde_json::to_value(r)
                    .map_err(|e| Error::Internal(format!("failed to serialize row: {e}")))
            })
            .collect()
    }

    match table {
        Table::Authors => to_values(authors::list_authors(conn)?),
        Table::Books => to_values(books::list_books(conn)?),
        Table::Users => to_values(users::list_users(conn)?),
        Table::Reviews => to_values(reviews::list_reviews(conn)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn test_count_rows_empty() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        for t in Table::ALL {
            assert_eq!(count_rows(&conn, t).unwrap(), 0);
        }
    }

    #[test]
    fn test_count_rows_after_insert() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        authors::create_author(&conn, "Aria Starwind").unwrap();
        authors::create_author(&conn, "Ryker Blackwood").unwrap();
        assert_eq!(count_rows(&conn, Table::Authors).unwrap(), 2);
        assert_eq!(count_rows(&conn, Table::Books).unwrap(), 0);
    }

    #[test]
    fn test_dump_table_hides_blob_and_credential() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let a = authors::create_author(&conn, "Thorne Brightblade").unwrap();
        books::create_book(&conn, "The Quest for the Crystal", a.id, None, Some(b"abc".as_slice()))
            .unwrap();
        users::create_user(&conn, "KnightOfLore", Some("$2b$04$hash")).unwrap();

        let books = dump_table(&conn, Table::Books).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0]["title"], "The Quest for the Crystal");
        assert_eq!(books[0]["content_bytes"], 3);
        assert!(books[0].get("content").is_none());

        let users = dump_table(&conn, Table::Users).unwrap();
        assert_eq!(users[0]["username"], "KnightOfLore");
        assert_eq!(users[0]["has_password"], true);
        assert!(!users[0].to_string().contains("hash"));

        assert!(dump_table(&conn, Table::Reviews).unwrap().is_empty());
    }

    #[test]
    fn test_non_constraint_error_is_database() {
        let err = map_write_error(rusqlite::Error::QueryReturnedNoRows, "insert");
        assert!(matches!(err, Error::Database { .. }));
    }
}
