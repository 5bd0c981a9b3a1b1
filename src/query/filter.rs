//! Filter and ordering definitions
//!
//! Each predicate is written once and has two renderings: a MongoDB filter
//! document for the live store, and `matches` for the in-memory mirror.

use crate::storage::book::{compare_prices, Book};
use mongodb::bson::{doc, Document};
use std::cmp::Ordering;

/// A predicate over books
#[derive(Debug, Clone, PartialEq)]
pub enum BookFilter {
    /// Matches every book
    All,
    Title(String),
    Author(String),
    Genre(String),
    /// `published_year` strictly greater than the given year
    PublishedAfter(i32),
    InStock(bool),
    /// Every inner filter must match; empty matches everything
    And(Vec<BookFilter>),
}

impl BookFilter {
    pub fn title(title: impl Into<String>) -> Self {
        BookFilter::Title(title.into())
    }

    pub fn author(author: impl Into<String>) -> Self {
        BookFilter::Author(author.into())
    }

    pub fn genre(genre: impl Into<String>) -> Self {
        BookFilter::Genre(genre.into())
    }

    /// Evaluate the filter against a book
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Title(title) => book.title == *title,
            BookFilter::Author(author) => book.author == *author,
            BookFilter::Genre(genre) => book.genre == *genre,
            BookFilter::PublishedAfter(year) => book.published_year > *year,
            BookFilter::InStock(in_stock) => book.in_stock == *in_stock,
            BookFilter::And(filters) => filters.iter().all(|f| f.matches(book)),
        }
    }

    /// Render as a MongoDB query filter
    pub fn to_document(&self) -> Document {
        match self {
            BookFilter::All => doc! {},
            BookFilter::Title(title) => doc! { "title": title.as_str() },
            BookFilter::Author(author) => doc! { "author": author.as_str() },
            BookFilter::Genre(genre) => doc! { "genre": genre.as_str() },
            BookFilter::PublishedAfter(year) => doc! { "published_year": { "$gt": *year } },
            BookFilter::InStock(in_stock) => doc! { "in_stock": *in_stock },
            // $and rejects an empty array
            BookFilter::And(filters) if filters.is_empty() => doc! {},
            BookFilter::And(filters) => {
                let clauses: Vec<Document> = filters.iter().map(BookFilter::to_document).collect();
                doc! { "$and": clauses }
            }
        }
    }
}

/// Direction of a price ordering
///
/// Ties on price are broken by title ascending so pages are stable and
/// identical across store modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrder {
    Ascending,
    Descending,
}

impl PriceOrder {
    /// Render as a MongoDB sort document
    pub fn to_document(self) -> Document {
        let direction = match self {
            PriceOrder::Ascending => 1,
            PriceOrder::Descending => -1,
        };
        doc! { "price": direction, "title": 1 }
    }

    /// Compare two books under this ordering
    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        let by_price = match self {
            PriceOrder::Ascending => compare_prices(a.price, b.price),
            PriceOrder::Descending => compare_prices(b.price, a.price),
        };
        by_price.then_with(|| a.title.cmp(&b.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_book() -> Book {
        Book::new("1984", "George Orwell", "Fiction", 1949, 10.99)
    }

    #[test]
    fn test_equality() {
        let book = make_book();
        assert!(BookFilter::genre("Fiction").matches(&book));
        assert!(!BookFilter::genre("fiction").matches(&book));
        assert!(BookFilter::author("George Orwell").matches(&book));
        assert!(BookFilter::title("1984").matches(&book));
    }

    #[test]
    fn test_published_after_is_strict() {
        let book = make_book();
        assert!(BookFilter::PublishedAfter(1948).matches(&book));
        assert!(!BookFilter::PublishedAfter(1949).matches(&book));
    }

    #[test]
    fn test_and() {
        let recent = Book::new("Recent", "A", "Fiction", 2015, 5.0);
        let filter = BookFilter::And(vec![BookFilter::InStock(true), BookFilter::PublishedAfter(2010)]);

        assert!(filter.matches(&recent));
        assert!(!filter.matches(&recent.clone().with_stock(false)));
        assert!(!filter.matches(&make_book()));
        assert!(BookFilter::And(vec![]).matches(&make_book()));
    }

    #[test]
    fn test_to_document() {
        assert_eq!(BookFilter::genre("Fiction").to_document(), doc! { "genre": "Fiction" });
        assert_eq!(
            BookFilter::PublishedAfter(1950).to_document(),
            doc! { "published_year": { "$gt": 1950 } }
        );
        assert_eq!(
            BookFilter::And(vec![BookFilter::InStock(true), BookFilter::PublishedAfter(2010)]).to_document(),
            doc! { "$and": [ { "in_stock": true }, { "published_year": { "$gt": 2010 } } ] }
        );
        assert_eq!(BookFilter::And(vec![]).to_document(), doc! {});
    }

    #[test]
    fn test_price_order() {
        let cheap = Book::new("B", "x", "g", 2000, 5.0);
        let cheap_too = Book::new("A", "x", "g", 2000, 5.0);
        let pricey = Book::new("C", "x", "g", 2000, 20.0);

        let mut books = vec![pricey.clone(), cheap.clone(), cheap_too.clone()];
        books.sort_by(|a, b| PriceOrder::Ascending.compare(a, b));
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);

        books.sort_by(|a, b| PriceOrder::Descending.compare(a, b));
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);

        assert_eq!(PriceOrder::Descending.to_document(), doc! { "price": -1, "title": 1 });
    }
}
