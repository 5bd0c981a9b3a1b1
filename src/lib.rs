//! bookstore - a book collection in MongoDB, with an offline twin
//!
//! Seeds a document collection with sample books and runs a fixed catalog
//! of finds, updates, aggregations and index operations against it. Every
//! operation also runs against an in-memory mirror of the same records, so
//! the catalog works on machines without a database.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          bookstore                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────────────────────────────────┐   │
//! │  │   Seeder    │  │             Query Catalog               │   │
//! │  │ drop+insert │  │  CRUD, advanced, aggregations, indexes  │   │
//! │  └──────┬──────┘  └────────────────────┬────────────────────┘   │
//! │         │                              │                        │
//! │         ▼                              ▼                        │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │                  BookStore capability set                   ││
//! │  │   filters, price ordering, aggregations defined once        ││
//! │  └──────────────┬───────────────────────────────┬──────────────┘│
//! │                 │                               │               │
//! │                 ▼                               ▼               │
//! │  ┌─────────────────────────────┐  ┌─────────────────────────┐   │
//! │  │        MongoStore           │  │      OfflineStore       │   │
//! │  │  (driver, pipelines)        │  │  (owned Vec<Book>)      │   │
//! │  └──────────────┬──────────────┘  └────────────┬────────────┘   │
//! │                 │                              │                │
//! │                 ▼                              ▼                │
//! │        MongoDB plp_bookstore.books      data/books.json         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod seed;
pub mod storage;
pub mod validation;

pub use error::{Error, Result};

pub use config::{Config, Mode};
pub use query::{BookStore, MongoStore, OfflineStore};
pub use storage::book::{Book, BookSummary};
pub use storage::collection::Collection;
