//! Typed ID wrappers providing compile-time safety for row identifiers.
//!
//! Each ID type is a newtype over the SQLite `INTEGER PRIMARY KEY` value,
//! preventing accidental misuse (e.g., passing a `UserId` where a `BookId`
//! is expected).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Generate a newtype ID wrapper over `i64`.
///
/// The macro produces a struct with:
/// - `new(i64)` and `get()` to wrap and unwrap the raw row id
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` delegating to the inner integer
/// - `From<i64>` and `Into<i64>` conversions
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Wrap a raw row id.
                #[must_use]
                pub const fn new(id: i64) -> Self {
                    Self(id)
                }

                /// Return the raw row id.
                #[must_use]
                pub const fn get(&self) -> i64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.trim().parse::<i64>().map(Self)
                }
            }

            impl From<i64> for $name {
                fn from(id: i64) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for i64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Identifier of a row in `authors`.
    AuthorId,
    /// Identifier of a row in `books`.
    BookId,
    /// Identifier of a row in `users`.
    UserId,
    /// Identifier of a row in `reviews`.
    ReviewId,
}
