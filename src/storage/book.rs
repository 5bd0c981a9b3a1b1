//! Book representation
//!
//! A Book is one record of the collection. The same struct is what the
//! dataset loader produces, what the offline mirror owns and what the
//! MongoDB driver serialises, so both store modes share one schema.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A book in the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Title, used as the lookup key for updates and deletes
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
}

/// A book reduced to the projected fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl Book {
    /// Create a new in-stock book
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        published_year: i32,
        price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_year,
            price,
            in_stock: true,
        }
    }

    /// Set the stock flag
    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Decade bucket label, e.g. `"1940s"` for 1949
    pub fn decade(&self) -> String {
        decade_label(self.published_year)
    }

    /// Reduce to `{title, author, price}`
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            title: self.title.clone(),
            author: self.author.clone(),
            price: self.price,
        }
    }
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        book.summary()
    }
}

/// `floor(year / 10) * 10` suffixed with `s`
pub fn decade_label(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Total order on prices; NaN never reaches the store
pub(crate) fn compare_prices(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_creation() {
        let book = Book::new("1984", "George Orwell", "Fiction", 1949, 10.99).with_stock(false);

        assert_eq!(book.title, "1984");
        assert!(!book.in_stock);
        assert_eq!(book.decade(), "1940s");
    }

    #[test]
    fn test_decade_label() {
        assert_eq!(decade_label(1990), "1990s");
        assert_eq!(decade_label(1999), "1990s");
        assert_eq!(decade_label(2000), "2000s");
        assert_eq!(decade_label(5), "0s");
        assert_eq!(decade_label(-5), "-10s");
    }

    #[test]
    fn test_summary_drops_other_fields() {
        let book = Book::new("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.99);
        let json = serde_json::to_value(book.summary()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"title": "The Hobbit", "author": "J.R.R. Tolkien", "price": 14.99})
        );
    }

    #[test]
    fn test_deserialize_ignores_store_id() {
        let json = serde_json::json!({
            "_id": "65f0c0ffee",
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "published_year": 1965,
            "price": 9.5,
            "in_stock": true
        });
        let book: Book = serde_json::from_value(json).unwrap();
        assert_eq!(book.author, "Frank Herbert");
    }
}
