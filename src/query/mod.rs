//! Query execution for the books collection
//!
//! [`BookStore`] is the capability set every store mode provides. The
//! named catalog operations are default methods written once on top of a
//! handful of primitives, so online and offline can only differ in how a
//! primitive reaches the data, never in what an operation asks for.

pub mod aggregate;
pub mod filter;
pub mod index;
mod offline;
mod online;

pub use aggregate::{AuthorBookCount, DecadeCount, GenrePriceStats};
pub use filter::{BookFilter, PriceOrder};
pub use index::{ExplainReport, IndexAck, IndexSpec, AUTHOR_YEAR_INDEX, EXPLAIN_TITLE, TITLE_INDEX};
pub use offline::OfflineStore;
pub use online::MongoStore;

use crate::config::Mode;
use crate::storage::book::{Book, BookSummary};
use crate::validation::{validate_page, validate_price};
use crate::Result;
use serde::Serialize;

/// Outcome of a single-record price update
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

/// The operations available against the books collection
#[allow(async_fn_in_trait)]
pub trait BookStore {
    /// Which mode this store runs in
    fn mode(&self) -> Mode;

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Number of books in the collection
    async fn count(&self) -> Result<u64>;

    /// Books matching `filter`, in natural order
    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>>;

    /// All books ordered by price, skipping `skip` and taking at most `limit`
    async fn find_sorted(&self, order: PriceOrder, skip: u64, limit: Option<u64>) -> Result<Vec<Book>>;

    /// Every book reduced to `{title, author, price}`
    async fn projection(&self) -> Result<Vec<BookSummary>>;

    /// Remove every book
    async fn clear(&mut self) -> Result<()>;

    /// Append books, returning how many were inserted
    async fn insert_many(&mut self, books: &[Book]) -> Result<u64>;

    /// Set the price of the first book with `title`
    async fn set_price(&mut self, title: &str, price: f64) -> Result<UpdateOutcome>;

    /// Remove every book with `title`
    async fn delete_by_title(&mut self, title: &str) -> Result<DeleteOutcome>;

    async fn average_price_by_genre(&self) -> Result<Vec<GenrePriceStats>>;

    /// `None` only when the collection is empty
    async fn author_with_most_books(&self) -> Result<Option<AuthorBookCount>>;

    async fn group_by_decade(&self) -> Result<Vec<DecadeCount>>;

    async fn create_index(&mut self, spec: IndexSpec) -> Result<IndexAck>;

    /// Execution plan for the lookup of [`EXPLAIN_TITLE`]
    async fn explain_title_query(&self) -> Result<ExplainReport>;

    // =========================================================================
    // Catalog operations
    // =========================================================================

    async fn find_all(&self) -> Result<Vec<Book>> {
        self.find(&BookFilter::All).await
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        self.find(&BookFilter::genre(genre)).await
    }

    async fn find_after_year(&self, year: i32) -> Result<Vec<Book>> {
        self.find(&BookFilter::PublishedAfter(year)).await
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>> {
        self.find(&BookFilter::author(author)).await
    }

    /// Update the price of the first book titled `title`; a missing title is a no-op
    async fn update_price(&mut self, title: &str, price: f64) -> Result<UpdateOutcome> {
        validate_price(price)?;
        self.set_price(title, price).await
    }

    async fn in_stock_after_2010(&self) -> Result<Vec<Book>> {
        self.find(&BookFilter::And(vec![
            BookFilter::InStock(true),
            BookFilter::PublishedAfter(2010),
        ]))
        .await
    }

    async fn sort_by_price(&self, order: PriceOrder) -> Result<Vec<Book>> {
        self.find_sorted(order, 0, None).await
    }

    /// One page of the price-ascending order; `page` starts at 1
    async fn paginate(&self, page: u64, page_size: u64) -> Result<Vec<Book>> {
        validate_page(page, page_size)?;
        let skip = (page - 1) * page_size;
        self.find_sorted(PriceOrder::Ascending, skip, Some(page_size)).await
    }

    async fn create_title_index(&mut self) -> Result<IndexAck> {
        self.create_index(TITLE_INDEX).await
    }

    async fn create_author_year_index(&mut self) -> Result<IndexAck> {
        self.create_index(AUTHOR_YEAR_INDEX).await
    }
}
