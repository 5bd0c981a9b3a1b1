//! Seeder
//!
//! Replaces the contents of the collection with a fixed record set. Runs
//! against any [`BookStore`], so the same code seeds MongoDB and the
//! in-memory mirror.

use crate::query::BookStore;
use crate::storage::book::Book;
use crate::Result;
use serde::Serialize;

/// One line of the post-seed listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeededBook {
    /// 1-based position in the listing
    pub index: usize,
    pub title: String,
    pub author: String,
    pub published_year: i32,
}

/// What a seeding run did
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    /// Records found (and dropped) before inserting
    pub dropped: u64,
    pub inserted: u64,
    /// The collection as read back after inserting
    pub contents: Vec<SeededBook>,
}

/// Drop any existing records, insert `books`, and read the result back
///
/// Any store fault aborts the run; nothing is retried or rolled back.
pub async fn seed<S: BookStore>(store: &mut S, books: &[Book]) -> Result<SeedReport> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!(existing, "collection is not empty, dropping it");
        store.clear().await?;
    }

    let inserted = store.insert_many(books).await?;
    tracing::info!(inserted, mode = %store.mode(), "books inserted");

    let contents = store
        .find_all()
        .await?
        .into_iter()
        .enumerate()
        .map(|(i, book)| SeededBook {
            index: i + 1,
            title: book.title,
            author: book.author,
            published_year: book.published_year,
        })
        .collect();

    Ok(SeedReport {
        dropped: existing,
        inserted,
        contents,
    })
}
