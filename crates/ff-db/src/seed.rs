//! Fixture seeding.
//!
//! [`seed_if_empty`] fills each catalog table with sample rows, but only
//! when that table is empty, so it is safe to call on every start. Tables
//! are visited in dependency order and each one is filled inside its own
//! transaction. Fixtures name their parents by natural key (author name,
//! book title, username) and are resolved against whatever rows exist.

use ff_core::{Error, Result};
use rusqlite::Connection;
use serde::Serialize;

use crate::models::Table;
use crate::queries::{self, authors, books, reviews, users};

const IMAGE_BASE: &str = "https://mk-ultron.github.io/ebook-reader";

const AUTHORS: &[&str] = &[
    "Aria Starwind",
    "Ryker Blackwood",
    "Ivy Gearheart",
    "Luna Nightshade",
    "Thorne Brightblade",
];

/// (title, author name, cover image number)
const BOOKS: &[(&str, &str, u32)] = &[
    ("The Unlikely Hero", "Aria Starwind", 1),
    ("Echoes of the Future", "Ryker Blackwood", 2),
    ("The Clockwork Quest", "Ivy Gearheart", 3),
    ("The Hidden Underworld", "Luna Nightshade", 4),
    ("The Quest for the Crystal", "Thorne Brightblade", 5),
];

/// (username, fixture password)
const USERS: &[(&str, &str)] = &[
    ("GalacticGeek", "pass1"),
    ("SpaceCadet99", "pass2"),
    ("CyberPunk42", "pass3"),
    ("MatrixMaster", "pass4"),
    ("SteampunkSally", "pass5"),
    ("AirshipAdventurer", "pass6"),
    ("MagicMaven", "pass7"),
    ("DetectiveDynamo", "pass8"),
    ("FantasyFanatic", "pass9"),
    ("KnightOfLore", "pass10"),
];

/// (book title, username, rating, text)
const REVIEWS: &[(&str, &str, i64, &str)] = &[
    (
        "The Unlikely Hero",
        "GalacticGeek",
        5,
        "Kira’s journey from a humble mechanic to a galactic savior is nothing short of inspirational. The plot twists kept me on the edge of my seat!",
    ),
    (
        "The Unlikely Hero",
        "SpaceCadet99",
        4,
        "A thrilling space opera that combines heart and heroism. Kira is the hero we all need!",
    ),
    (
        "Echoes of the Future",
        "CyberPunk42",
        5,
        "Jax’s battle against megacorporations is a gripping cyber adventure. The neon-lit streets of Neo-Tokyo are vividly portrayed!",
    ),
    (
        "Echoes of the Future",
        "MatrixMaster",
        4,
        "An exhilarating dive into a digital dystopia. Jax is the perfect rogue hacker hero for this thrilling tale.",
    ),
    (
        "The Clockwork Quest",
        "SteampunkSally",
        5,
        "Elara and Gideon’s quest is filled with clockwork marvels and daring escapades. Gearford is a city that sparks the imagination!",
    ),
    (
        "The Clockwork Quest",
        "AirshipAdventurer",
        4,
        "A captivating steampunk adventure with brilliant inventions and a race against time. Elara is a fantastic protagonist.",
    ),
    (
        "The Quest for the Crystal",
        "FantasyFanatic",
        5,
        "An epic quest filled with danger, magic, and camaraderie. The team’s journey to find the Crystal of Light is legendary!",
    ),
    (
        "The Quest for the Crystal",
        "KnightOfLore",
        4,
        "A fantastic fantasy adventure that will transport you to the realm of Eldoria. The characters and plot are truly enchanting.",
    ),
];

/// Rows inserted per table by one seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub authors: usize,
    pub books: usize,
    pub users: usize,
    pub reviews: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.authors + self.books + self.users + self.reviews
    }
}

/// Populate every empty catalog table with the sample fixtures.
///
/// Tables that already hold rows are left untouched. `bcrypt_cost` is the
/// work factor for hashing fixture credentials.
pub fn seed_if_empty(conn: &Connection, bcrypt_cost: u32) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if is_empty(conn, Table::Authors)? {
        report.authors = in_transaction(conn, |tx| {
            for name in AUTHORS {
                authors::create_author(tx, name)?;
            }
            Ok(AUTHORS.len())
        })?;
    }

    if is_empty(conn, Table::Books)? {
        report.books = in_transaction(conn, |tx| {
            let mut inserted = 0;
            for &(title, author, image) in BOOKS {
                let Some(author_id) = authors::find_author_id_by_name(tx, author)? else {
                    tracing::warn!("Skipping fixture book '{title}': author '{author}' not found");
                    continue;
                };
                let image_url = format!("{IMAGE_BASE}/story-image{image}.png");
                books::create_book(tx, title, author_id, Some(&image_url), None)?;
                inserted += 1;
            }
            Ok(inserted)
        })?;
    }

    if is_empty(conn, Table::Users)? {
        report.users = in_transaction(conn, |tx| {
            for &(username, password) in USERS {
                let hash = bcrypt::hash(password, bcrypt_cost)
                    .map_err(|e| Error::Internal(format!("failed to hash credential: {e}")))?;
                users::create_user(tx, username, Some(&hash))?;
            }
            Ok(USERS.len())
        })?;
    }

    if is_empty(conn, Table::Reviews)? {
        report.reviews = in_transaction(conn, |tx| {
            let mut inserted = 0;
            for &(title, username, rating, text) in REVIEWS {
                let book = books::find_book_id_by_title(tx, title)?;
                let user = users::find_user_id_by_username(tx, username)?;
                let (Some(book_id), Some(user_id)) = (book, user) else {
                    tracing::warn!(
                        "Skipping fixture review of '{title}' by '{username}': parent row not found"
                    );
                    continue;
                };
                reviews::create_review(tx, book_id, user_id, rating, text)?;
                inserted += 1;
            }
            Ok(inserted)
        })?;
    }

    if report.total() > 0 {
        tracing::info!(
            authors = report.authors,
            books = report.books,
            users = report.users,
            reviews = report.reviews,
            "Seeded catalog fixtures"
        );
    } else {
        tracing::debug!("Catalog already seeded");
    }

    Ok(report)
}

fn is_empty(conn: &Connection, table: Table) -> Result<bool> {
    Ok(queries::count_rows(conn, table)? == 0)
}

/// Run `f` inside a transaction, committing on success. Dropping the
/// transaction on error rolls it back.
fn in_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    let out = f(&*tx)?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    Ok(out)
}
