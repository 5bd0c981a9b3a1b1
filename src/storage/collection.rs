//! Collection - the in-memory mirror of the books collection
//!
//! An owned, insertion-ordered list of books. Lookups are linear scans;
//! updates and deletes locate their targets by predicate rather than by
//! handing out references into the list.

use super::book::Book;

/// An in-memory collection of books
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Name of the collection
    pub name: String,
    books: Vec<Book>,
}

impl Collection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            books: Vec::new(),
        }
    }

    /// Create a collection holding `books` in the given order
    pub fn with_books(name: impl Into<String>, books: Vec<Book>) -> Self {
        Self {
            name: name.into(),
            books,
        }
    }

    /// All books in insertion order
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    /// Clone every book matching `predicate`, in insertion order
    pub fn find(&self, predicate: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.books.iter().filter(|b| predicate(*b)).cloned().collect()
    }

    /// Read the first book with the given title
    pub fn get(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.title == title)
    }

    /// Append books, returning how many were inserted
    pub fn insert_many(&mut self, books: impl IntoIterator<Item = Book>) -> usize {
        let before = self.books.len();
        self.books.extend(books);
        self.books.len() - before
    }

    /// Apply `update` to the first book matching `predicate`
    ///
    /// Returns `None` when nothing matched, otherwise whether `update`
    /// reported a change.
    pub fn update_first(
        &mut self,
        predicate: impl Fn(&Book) -> bool,
        update: impl FnOnce(&mut Book) -> bool,
    ) -> Option<bool> {
        let idx = self.books.iter().position(|b| predicate(b))?;
        Some(update(&mut self.books[idx]))
    }

    /// Remove every book matching `predicate`, returning how many were removed
    pub fn delete_where(&mut self, predicate: impl Fn(&Book) -> bool) -> usize {
        let before = self.books.len();
        self.books.retain(|b| !predicate(b));
        before - self.books.len()
    }

    /// Remove all books
    pub fn clear(&mut self) -> usize {
        let removed = self.books.len();
        self.books.clear();
        removed
    }

    /// Count books in the collection
    pub fn count(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
