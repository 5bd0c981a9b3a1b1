//! Run configuration
//!
//! The binary fills a [`Config`] from flags and environment variables; the
//! library only ever sees the resolved values.

use crate::validation::{validate_collection_name, validate_database_name};
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Endpoint used when `MONGODB_URI` is not set
pub const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// Namespace shared by the seeder and the query catalog
pub const DEFAULT_DATABASE: &str = "plp_bookstore";
pub const DEFAULT_COLLECTION: &str = "books";

/// Sample record set, relative to the working directory
pub const DEFAULT_DATASET: &str = "data/books.json";

/// Where operations are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Against a live MongoDB deployment
    #[default]
    Online,
    /// Against an in-memory mirror of the dataset
    Offline,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Online => f.write_str("online"),
            Mode::Offline => f.write_str("offline"),
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub dataset: PathBuf,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            dataset: PathBuf::from(DEFAULT_DATASET),
            mode: Mode::Online,
        }
    }
}

impl Config {
    /// Check the namespace before any client is built
    pub fn validate(&self) -> Result<()> {
        validate_database_name(&self.database)?;
        validate_collection_name(&self.database, &self.collection)?;
        Ok(())
    }

    /// `database.collection`
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}
