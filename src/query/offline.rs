//! Offline store: the catalog over an in-memory mirror

use super::aggregate;
use super::{
    AuthorBookCount, BookFilter, BookStore, DecadeCount, DeleteOutcome, ExplainReport,
    GenrePriceStats, IndexAck, IndexSpec, PriceOrder, UpdateOutcome, EXPLAIN_TITLE,
};
use crate::config::{Config, Mode};
use crate::storage::book::{Book, BookSummary};
use crate::storage::collection::Collection;
use crate::storage::dataset;
use crate::Result;
use mongodb::bson::Bson;

/// Runs every operation against an owned copy of the records
#[derive(Debug, Clone, Default)]
pub struct OfflineStore {
    collection: Collection,
    /// Names of indexes "created"; they never affect execution
    indexes: Vec<String>,
}

impl OfflineStore {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            indexes: Vec::new(),
        }
    }

    /// Mirror the dataset named by `config`
    pub async fn load(config: &Config) -> Result<Self> {
        let books = dataset::load(&config.dataset).await?;
        tracing::info!(count = books.len(), "offline mode: mirroring dataset in memory");
        Ok(Self::new(Collection::with_books(config.collection.clone(), books)))
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Index names acknowledged so far
    pub fn indexes(&self) -> &[String] {
        &self.indexes
    }
}

impl BookStore for OfflineStore {
    fn mode(&self) -> Mode {
        Mode::Offline
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count() as u64)
    }

    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        Ok(self.collection.find(|book| filter.matches(book)))
    }

    async fn find_sorted(&self, order: PriceOrder, skip: u64, limit: Option<u64>) -> Result<Vec<Book>> {
        let mut books = self.collection.list().to_vec();
        books.sort_by(|a, b| order.compare(a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(books.into_iter().skip(skip).take(limit).collect())
    }

    async fn projection(&self) -> Result<Vec<BookSummary>> {
        Ok(self.collection.list().iter().map(BookSummary::from).collect())
    }

    async fn clear(&mut self) -> Result<()> {
        let removed = self.collection.clear();
        self.indexes.clear();
        tracing::debug!(removed, "cleared in-memory collection");
        Ok(())
    }

    async fn insert_many(&mut self, books: &[Book]) -> Result<u64> {
        Ok(self.collection.insert_many(books.iter().cloned()) as u64)
    }

    async fn set_price(&mut self, title: &str, price: f64) -> Result<UpdateOutcome> {
        let changed = self.collection.update_first(
            |book| book.title == title,
            |book| {
                let changed = book.price != price;
                book.price = price;
                changed
            },
        );

        Ok(match changed {
            Some(changed) => UpdateOutcome {
                matched: 1,
                modified: u64::from(changed),
            },
            None => UpdateOutcome::default(),
        })
    }

    async fn delete_by_title(&mut self, title: &str) -> Result<DeleteOutcome> {
        let deleted = self.collection.delete_where(|book| book.title == title);
        Ok(DeleteOutcome {
            deleted: deleted as u64,
        })
    }

    async fn average_price_by_genre(&self) -> Result<Vec<GenrePriceStats>> {
        Ok(aggregate::average_price_by_genre(self.collection.list()))
    }

    async fn author_with_most_books(&self) -> Result<Option<AuthorBookCount>> {
        Ok(aggregate::author_with_most_books(self.collection.list()))
    }

    async fn group_by_decade(&self) -> Result<Vec<DecadeCount>> {
        Ok(aggregate::group_by_decade(self.collection.list()))
    }

    async fn create_index(&mut self, spec: IndexSpec) -> Result<IndexAck> {
        if !self.indexes.iter().any(|name| name == spec.name) {
            self.indexes.push(spec.name.to_string());
        }
        Ok(IndexAck {
            name: spec.name.to_string(),
            simulated: true,
        })
    }

    async fn explain_title_query(&self) -> Result<ExplainReport> {
        let filter = Bson::Document(BookFilter::title(EXPLAIN_TITLE).to_document()).into_relaxed_extjson();
        Ok(ExplainReport {
            simulated: true,
            plan: serde_json::json!({
                "ok": 1,
                "filter": filter,
                "note": "Simulated explain plan. Run against MongoDB for executionStats.",
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> OfflineStore {
        OfflineStore::new(Collection::with_books(
            "books",
            vec![
                Book::new("1984", "George Orwell", "Fiction", 1949, 10.99),
                Book::new("Dune", "Frank Herbert", "Science Fiction", 1965, 9.99),
                Book::new("Circe", "Madeline Miller", "Fantasy", 2018, 15.0).with_stock(false),
                Book::new("Project Hail Mary", "Andy Weir", "Science Fiction", 2021, 18.5),
            ],
        ))
    }

    #[tokio::test]
    async fn test_update_reports_match_and_modification() {
        let mut store = store();

        let outcome = store.update_price("1984", 12.49).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let again = store.update_price("1984", 12.49).await.unwrap();
        assert_eq!(again, UpdateOutcome { matched: 1, modified: 0 });

        let missing = store.update_price("Missing", 1.0).await.unwrap();
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_price() {
        let mut store = store();
        assert!(store.update_price("1984", -2.0).await.is_err());
        assert_eq!(store.collection().get("1984").unwrap().price, 10.99);
    }

    #[tokio::test]
    async fn test_in_stock_after_2010() {
        let titles: Vec<String> = store()
            .in_stock_after_2010()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["Project Hail Mary"]);
    }

    #[tokio::test]
    async fn test_paginate_uses_price_order() {
        let store = store();

        let first = store.paginate(1, 3).await.unwrap();
        let titles: Vec<&str> = first.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Dune", "1984", "Circe"]);

        let second = store.paginate(2, 3).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].title, "Project Hail Mary");

        assert!(store.paginate(3, 3).await.unwrap().is_empty());
        assert!(store.paginate(0, 3).await.is_err());
    }

    #[tokio::test]
    async fn test_indexes_are_simulated() {
        let mut store = store();

        let ack = store.create_title_index().await.unwrap();
        assert!(ack.simulated);
        store.create_title_index().await.unwrap();
        store.create_author_year_index().await.unwrap();
        assert_eq!(store.indexes(), ["idx_title_asc", "idx_author_year"]);

        let explain = store.explain_title_query().await.unwrap();
        assert!(explain.simulated);
        assert_eq!(explain.plan["filter"]["title"], "1984");
    }
}
