//! User operations. Credentials go in as bcrypt hashes and never come back
//! out.

use ff_core::{Error, Result, UserId};
use rusqlite::{Connection, OptionalExtension};

use super::map_write_error;
use crate::models::User;

/// Create a user with an optional, already hashed credential.
pub fn create_user(
    conn: &Connection,
    username: &str,
    password_hash: Option<&str>,
) -> Result<User> {
    conn.execute(
        "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
        rusqlite::params![username, password_hash],
    )
    .map_err(|e| match map_write_error(e, "create user") {
        Error::Conflict(_) => Error::Conflict(format!("Username '{username}' already exists")),
        other => other,
    })?;

    Ok(User {
        id: UserId::new(conn.last_insert_rowid()),
        username: username.to_string(),
        has_password: password_hash.is_some(),
    })
}

/// Look up a user id by username.
pub fn find_user_id_by_username(conn: &Connection, username: &str) -> Result<Option<UserId>> {
    conn.query_row(
        "SELECT id FROM users WHERE username = ?1",
        [username],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|id| id.map(UserId::new))
    .map_err(|e| Error::database(e.to_string()))
}

/// Check a plaintext password against the stored hash.
///
/// Returns `false` for unknown users and users without a credential.
#[cfg(test)]
pub(crate) fn verify_password(conn: &Connection, username: &str, password: &str) -> Result<bool> {
    let hash: Option<Option<String>> = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username = ?1",
            [username],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;

    match hash.flatten() {
        Some(h) => bcrypt::verify(password, &h)
            .map_err(|e| Error::Internal(format!("stored hash for '{username}' is invalid: {e}"))),
        None => Ok(false),
    }
}

/// List all users ordered by id (excluding password hashes).
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare("SELECT id, username, password_hash IS NOT NULL FROM users ORDER BY id")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn test_create_and_list() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let hash = bcrypt::hash("pass1", 4).unwrap();
        create_user(&conn, "GalacticGeek", Some(&hash)).unwrap();
        create_user(&conn, "SpaceCadet99", None).unwrap();

        let users = list_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "GalacticGeek");
        assert!(users[0].has_password);
        assert!(!users[1].has_password);
    }

    #[test]
    fn test_duplicate_username_conflicts() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_user(&conn, "CyberPunk42", None).unwrap();
        let err = create_user(&conn, "CyberPunk42", None).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(err.to_string().contains("CyberPunk42"));
    }

    #[test]
    fn test_verify_password() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let hash = bcrypt::hash("pass4", 4).unwrap();
        create_user(&conn, "MatrixMaster", Some(&hash)).unwrap();
        create_user(&conn, "NoCredential", None).unwrap();

        assert!(verify_password(&conn, "MatrixMaster", "pass4").unwrap());
        assert!(!verify_password(&conn, "MatrixMaster", "wrong").unwrap());
        assert!(!verify_password(&conn, "NoCredential", "").unwrap());
        assert!(!verify_password(&conn, "Ghost", "pass4").unwrap());
    }

    #[test]
    fn test_find_by_username() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let u = create_user(&conn, "MagicMaven", None).unwrap();
        assert_eq!(find_user_id_by_username(&conn, "MagicMaven").unwrap(), Some(u.id));
        assert_eq!(find_user_id_by_username(&conn, "magicmaven").unwrap(), None);
    }
}
