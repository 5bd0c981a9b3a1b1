//! Online store: the catalog against a live MongoDB collection

use super::aggregate::{
    author_with_most_books_pipeline, average_price_by_genre_pipeline, group_by_decade_pipeline,
};
use super::{
    AuthorBookCount, BookFilter, BookStore, DecadeCount, DeleteOutcome, ExplainReport,
    GenrePriceStats, IndexAck, IndexSpec, PriceOrder, UpdateOutcome, EXPLAIN_TITLE,
};
use crate::config::{Config, Mode};
use crate::storage::book::{Book, BookSummary};
use crate::{Error, Result};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::DeserializeOwned;

/// Runs every operation against MongoDB
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    books: Collection<Book>,
}

impl MongoStore {
    /// Connect and ping the deployment so an unreachable server fails here
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        let connect_error = |source: mongodb::error::Error| {
            tracing::error!(error = %source, "could not reach MongoDB");
            Error::Connect {
                uri: config.uri.clone(),
                source,
            }
        };

        let client = Client::with_uri_str(&config.uri).await.map_err(connect_error)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connect_error)?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "connected to MongoDB"
        );

        let database = client.database(&config.database);
        let books = database.collection::<Book>(&config.collection);
        Ok(Self {
            client,
            database,
            books,
        })
    }

    /// Release the connection pool
    pub async fn close(self) {
        self.client.shutdown().await;
        tracing::debug!("connection closed");
    }

    async fn aggregate<T: DeserializeOwned>(
        &self,
        shape: &'static str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>> {
        let docs: Vec<Document> = self
            .books
            .aggregate(pipeline)
            .await
            .map_err(Error::store("aggregate"))?
            .try_collect()
            .await
            .map_err(Error::store("aggregate"))?;

        docs.into_iter()
            .map(|doc| {
                mongodb::bson::from_document(doc).map_err(|e| Error::Decode {
                    shape,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

impl BookStore for MongoStore {
    fn mode(&self) -> Mode {
        Mode::Online
    }

    async fn count(&self) -> Result<u64> {
        self.books
            .count_documents(doc! {})
            .await
            .map_err(Error::store("count"))
    }

    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let filter = filter.to_document();
        tracing::debug!(%filter, "find");

        self.books
            .find(filter)
            .await
            .map_err(Error::store("find"))?
            .try_collect()
            .await
            .map_err(Error::store("find"))
    }

    async fn find_sorted(&self, order: PriceOrder, skip: u64, limit: Option<u64>) -> Result<Vec<Book>> {
        let mut find = self.books.find(doc! {}).sort(order.to_document()).skip(skip);
        if let Some(limit) = limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        find.await
            .map_err(Error::store("find sorted"))?
            .try_collect()
            .await
            .map_err(Error::store("find sorted"))
    }

    async fn projection(&self) -> Result<Vec<BookSummary>> {
        self.books
            .clone_with_type::<BookSummary>()
            .find(doc! {})
            .projection(doc! { "_id": 0, "title": 1, "author": 1, "price": 1 })
            .await
            .map_err(Error::store("projection"))?
            .try_collect()
            .await
            .map_err(Error::store("projection"))
    }

    async fn clear(&mut self) -> Result<()> {
        self.books.drop().await.map_err(Error::store("drop"))?;
        tracing::debug!(collection = %self.books.name(), "collection dropped");
        Ok(())
    }

    async fn insert_many(&mut self, books: &[Book]) -> Result<u64> {
        // insertMany rejects an empty batch
        if books.is_empty() {
            return Ok(0);
        }

        let result = self
            .books
            .insert_many(books)
            .await
            .map_err(Error::store("insert many"))?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn set_price(&mut self, title: &str, price: f64) -> Result<UpdateOutcome> {
        let result = self
            .books
            .update_one(BookFilter::title(title).to_document(), doc! { "$set": { "price": price } })
            .await
            .map_err(Error::store("update price"))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_title(&mut self, title: &str) -> Result<DeleteOutcome> {
        let result = self
            .books
            .delete_many(BookFilter::title(title).to_document())
            .await
            .map_err(Error::store("delete by title"))?;

        Ok(DeleteOutcome {
            deleted: result.deleted_count,
        })
    }

    async fn average_price_by_genre(&self) -> Result<Vec<GenrePriceStats>> {
        self.aggregate("genre price stats", average_price_by_genre_pipeline())
            .await
    }

    async fn author_with_most_books(&self) -> Result<Option<AuthorBookCount>> {
        let mut top: Vec<AuthorBookCount> = self
            .aggregate("author book count", author_with_most_books_pipeline())
            .await?;
        Ok(top.pop())
    }

    async fn group_by_decade(&self) -> Result<Vec<DecadeCount>> {
        self.aggregate("decade count", group_by_decade_pipeline()).await
    }

    async fn create_index(&mut self, spec: IndexSpec) -> Result<IndexAck> {
        let model = IndexModel::builder()
            .keys(spec.keys_document())
            .options(IndexOptions::builder().name(spec.name.to_string()).build())
            .build();

        let result = self
            .books
            .create_index(model)
            .await
            .map_err(Error::store("create index"))?;

        tracing::info!(index = %result.index_name, "index created");
        Ok(IndexAck {
            name: result.index_name,
            simulated: false,
        })
    }

    async fn explain_title_query(&self) -> Result<ExplainReport> {
        let command = doc! {
            "explain": {
                "find": self.books.name(),
                "filter": BookFilter::title(EXPLAIN_TITLE).to_document()
            },
            "verbosity": "executionStats"
        };

        let plan = self
            .database
            .run_command(command)
            .await
            .map_err(Error::store("explain"))?;
        Ok(ExplainReport::from_server(plan))
    }
}
