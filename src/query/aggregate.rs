//! Aggregations
//!
//! Each summary exists as a MongoDB pipeline and as a single-pass fold over
//! in-memory books. Pipelines finish with a `$project` stage that renames
//! `_id` so both renderings deserialize into the same structs.

use crate::storage::book::{compare_prices, Book};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Mean price and record count for one genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenrePriceStats {
    pub genre: String,
    pub average_price: f64,
    pub count: u64,
}

/// Number of books written by one author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorBookCount {
    pub author: String,
    pub total_books: u64,
}

/// Number of books published in one decade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecadeCount {
    /// Label such as `"1990s"`
    pub decade: String,
    pub count: u64,
}

// =============================================================================
// Pipelines
// =============================================================================

/// Genres by mean price descending, ties by genre name
pub fn average_price_by_genre_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": "$genre",
            "average_price": { "$avg": "$price" },
            "count": { "$sum": 1 }
        } },
        doc! { "$sort": { "average_price": -1, "_id": 1 } },
        doc! { "$project": { "_id": 0, "genre": "$_id", "average_price": 1, "count": 1 } },
    ]
}

/// The single author with the most books, ties by author name
pub fn author_with_most_books_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$author", "total_books": { "$sum": 1 } } },
        doc! { "$sort": { "total_books": -1, "_id": 1 } },
        doc! { "$limit": 1 },
        doc! { "$project": { "_id": 0, "author": "$_id", "total_books": 1 } },
    ]
}

/// Book counts per decade label, labels ascending
pub fn group_by_decade_pipeline() -> Vec<Document> {
    vec![
        doc! { "$addFields": {
            "decade": { "$concat": [
                { "$toString": { "$multiply": [
                    { "$toInt": { "$floor": { "$divide": ["$published_year", 10] } } },
                    10
                ] } },
                "s"
            ] }
        } },
        doc! { "$group": { "_id": "$decade", "count": { "$sum": 1 } } },
        doc! { "$sort": { "_id": 1 } },
        doc! { "$project": { "_id": 0, "decade": "$_id", "count": 1 } },
    ]
}

// =============================================================================
// In-memory folds
// =============================================================================

/// Neumaier summation, the same compensation the server applies in `$avg`
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    fn value(self) -> f64 {
        self.sum + self.compensation
    }
}

pub fn average_price_by_genre<'a>(books: impl IntoIterator<Item = &'a Book>) -> Vec<GenrePriceStats> {
    // (sum, count) per genre in first-seen order
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, CompensatedSum, u64)> = Vec::new();

    for book in books {
        let slot = *slots.entry(book.genre.as_str()).or_insert_with(|| {
            groups.push((book.genre.as_str(), CompensatedSum::default(), 0));
            groups.len() - 1
        });
        groups[slot].1.add(book.price);
        groups[slot].2 += 1;
    }

    let mut stats: Vec<GenrePriceStats> = groups
        .into_iter()
        .map(|(genre, sum, count)| GenrePriceStats {
            genre: genre.to_string(),
            average_price: sum.value() / count as f64,
            count,
        })
        .collect();

    stats.sort_by(|a, b| {
        compare_prices(b.average_price, a.average_price).then_with(|| a.genre.cmp(&b.genre))
    });
    stats
}

pub fn author_with_most_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> Option<AuthorBookCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for book in books {
        *counts.entry(book.author.as_str()).or_default() += 1;
    }

    // BTreeMap iterates names ascending; keep the first maximum
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, u64)>, (author, total)| match best {
            Some((_, top)) if top >= total => best,
            _ => Some((author, total)),
        })
        .map(|(author, total_books)| AuthorBookCount {
            author: author.to_string(),
            total_books,
        })
}

pub fn group_by_decade<'a>(books: impl IntoIterator<Item = &'a Book>) -> Vec<DecadeCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for book in books {
        *counts.entry(book.decade()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(decade, count)| DecadeCount { decade, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf() -> Vec<Book> {
        vec![
            Book::new("1984", "George Orwell", "Fiction", 1949, 10.0),
            Book::new("Animal Farm", "George Orwell", "Political Satire", 1945, 8.0),
            Book::new("The Great Gatsby", "F. Scott Fitzgerald", "Fiction", 1925, 20.0),
            Book::new("The Alchemist", "Paulo Coelho", "Fiction", 1988, 12.0),
            Book::new("Dune", "Frank Herbert", "Science Fiction", 1965, 14.0),
        ]
    }

    #[test]
    fn test_average_price_by_genre() {
        let stats = average_price_by_genre(&shelf());

        assert_eq!(
            stats,
            vec![
                GenrePriceStats { genre: "Fiction".into(), average_price: 14.0, count: 3 },
                GenrePriceStats { genre: "Science Fiction".into(), average_price: 14.0, count: 1 },
                GenrePriceStats { genre: "Political Satire".into(), average_price: 8.0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_compensated_sum_keeps_low_bits() {
        let mut sum = CompensatedSum::default();
        for value in [1.0, 1e100, 1.0, -1e100] {
            sum.add(value);
        }
        assert_eq!(sum.value(), 2.0);
    }

    #[test]
    fn test_average_price_does_not_lose_small_prices() {
        let books = vec![
            Book::new("Big", "A", "Rare", 2000, 1e16),
            Book::new("Small", "B", "Rare", 2001, 1.0),
            Book::new("Smaller", "C", "Rare", 2002, 1.0),
        ];
        let stats = average_price_by_genre(&books);
        assert_eq!(stats[0].average_price, (1e16 + 2.0) / 3.0);
    }

    #[test]
    fn test_author_with_most_books() {
        let top = author_with_most_books(&shelf()).unwrap();
        assert_eq!(top, AuthorBookCount { author: "George Orwell".into(), total_books: 2 });
        assert!(author_with_most_books(&Vec::<Book>::new()).is_none());
    }

    #[test]
    fn test_author_ties_break_by_name() {
        let books = vec![
            Book::new("B1", "Zadie Smith", "Fiction", 2000, 1.0),
            Book::new("A1", "Anne Tyler", "Fiction", 1990, 1.0),
        ];
        assert_eq!(author_with_most_books(&books).unwrap().author, "Anne Tyler");
    }

    #[test]
    fn test_group_by_decade() {
        let books = shelf();
        let decades = group_by_decade(&books);
        let labels: Vec<&str> = decades.iter().map(|d| d.decade.as_str()).collect();

        assert_eq!(labels, ["1920s", "1940s", "1960s", "1980s"]);
        assert_eq!(decades[1].count, 2);
        assert_eq!(decades.iter().map(|d| d.count).sum::<u64>(), books.len() as u64);
    }

    #[test]
    fn test_pipelines_end_with_projection() {
        for pipeline in [
            average_price_by_genre_pipeline(),
            author_with_most_books_pipeline(),
            group_by_decade_pipeline(),
        ] {
            let last = pipeline.last().unwrap();
            assert_eq!(last.get_document("$project").unwrap().get_i32("_id").unwrap(), 0);
        }
    }

    #[test]
    fn test_stats_decode_from_projected_document() {
        let raw = doc! { "genre": "Fiction", "average_price": 14.0, "count": 3 };
        let stats: GenrePriceStats = mongodb::bson::from_document(raw).unwrap();
        assert_eq!(stats.count, 3);
    }
}
