//! JSON route handlers.

pub mod books;
pub mod health;
pub mod tables;

use ff_core::BookId;

/// Parse a book id taken from a path or query string.
pub(crate) fn parse_book_id(raw: &str) -> ff_core::Result<BookId> {
    raw.parse()
        .map_err(|_| ff_core::Error::Validation(format!("Invalid book ID '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_book_id_accepts_integers() {
        assert_eq!(parse_book_id("3").unwrap(), BookId::new(3));
        assert_eq!(parse_book_id(" 12 ").unwrap(), BookId::new(12));
    }

    #[test]
    fn parse_book_id_rejects_garbage() {
        let err = parse_book_id("abc").unwrap_err();
        assert!(matches!(err, ff_core::Error::Validation(_)));
        assert!(err.to_string().contains("abc"));
        assert!(parse_book_id("").is_err());
    }
}
