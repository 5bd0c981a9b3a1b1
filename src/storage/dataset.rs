//! Dataset loading
//!
//! The sample record set is a top-level array of book objects, stored as
//! JSON or YAML. Every record must carry all six book fields; the first
//! record that does not aborts the load, so no partially-typed book ever
//! reaches a store.
//!
//! ```text
//! [
//!   { "title": "1984", "author": "George Orwell", "genre": "Fiction",
//!     "published_year": 1949, "price": 10.99, "in_stock": true }
//! ]
//! ```

use super::book::Book;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Dataset file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Format::Yaml)
            }
            _ => Err(Error::UnsupportedDataset {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read and validate the dataset at `path`
pub async fn load(path: &Path) -> Result<Vec<Book>> {
    let format = Format::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::DatasetRead {
            path: path.to_path_buf(),
            source,
        })?;

    let books = parse(&content, format).map_err(|err| match err {
        Error::DatasetParse { message, .. } => Error::DatasetParse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    tracing::debug!(path = %path.display(), count = books.len(), "loaded dataset");
    Ok(books)
}

/// Parse dataset content
pub fn parse(content: &str, format: Format) -> Result<Vec<Book>> {
    let raw: Value = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
    };

    let Value::Array(records) = raw else {
        return Err(parse_error("expected a top-level array of records".into()));
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| book_from_record(index, record))
        .collect()
}

fn parse_error(message: String) -> Error {
    Error::DatasetParse {
        path: Default::default(),
        message,
    }
}

fn book_from_record(index: usize, record: &Value) -> Result<Book> {
    let Value::Object(fields) = record else {
        return Err(parse_error(format!("record {} is not an object", index)));
    };

    Ok(Book {
        title: string_field(fields, index, "title")?,
        author: string_field(fields, index, "author")?,
        genre: string_field(fields, index, "genre")?,
        published_year: year_field(fields, index)?,
        price: price_field(fields, index)?,
        in_stock: bool_field(fields, index, "in_stock")?,
    })
}

fn required<'a>(fields: &'a Map<String, Value>, index: usize, field: &'static str) -> Result<&'a Value> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(Error::MissingField { index, field }),
        Some(value) => Ok(value),
    }
}

fn string_field(fields: &Map<String, Value>, index: usize, field: &'static str) -> Result<String> {
    required(fields, index, field)?
        .as_str()
        .map(str::to_string)
        .ok_or(Error::InvalidField {
            index,
            field,
            expected: "a string",
        })
}

fn year_field(fields: &Map<String, Value>, index: usize) -> Result<i32> {
    const FIELD: &str = "published_year";

    required(fields, index, FIELD)?
        .as_i64()
        .and_then(|year| i32::try_from(year).ok())
        .ok_or(Error::InvalidField {
            index,
            field: FIELD,
            expected: "a 32-bit integer",
        })
}

fn price_field(fields: &Map<String, Value>, index: usize) -> Result<f64> {
    const FIELD: &str = "price";

    required(fields, index, FIELD)?
        .as_f64()
        .filter(|price| price.is_finite())
        .ok_or(Error::InvalidField {
            index,
            field: FIELD,
            expected: "a number",
        })
}

fn bool_field(fields: &Map<String, Value>, index: usize, field: &'static str) -> Result<bool> {
    required(fields, index, field)?.as_bool().ok_or(Error::InvalidField {
        index,
        field,
        expected: "a boolean",
    })
}
