// 📚 Book Entity - Append-only catalog
//
// "Position is identity": a book's ISBN is its 1-based insertion order.
// Books are never removed and never edited, so an ISBN handed out once
// points at the same book for the life of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LibraryError, LibraryResult};

// ============================================================================
// BOOK ENTITY
// ============================================================================

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Surrogate ISBN (1-based insertion order, stored as text)
    pub isbn: String,

    pub author: String,

    pub title: String,

    /// Publication year, or a range such as "1954-1955"
    pub year: String,
}

impl Book {
    pub fn new(isbn: String, author: String, title: String, year: String) -> Self {
        Book {
            isbn,
            author,
            title,
            year,
        }
    }
}

/// Renders as `author, title, year`
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.author, self.title, self.year)
    }
}

// ============================================================================
// BOOK CATALOG
// ============================================================================

/// Ordered collection of all known books.
///
/// Index `i` (0-based) always holds the book whose ISBN is `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct BookCatalog {
    books: Vec<Book>,
}

impl BookCatalog {
    pub fn new() -> Self {
        BookCatalog { books: Vec::new() }
    }

    /// Append a book and return its 1-based identifier (the new size)
    pub fn add_book(&mut self, isbn: String, author: String, title: String, year: String) -> usize {
        self.books.push(Book::new(isbn, author, title, year));
        self.books.len()
    }

    /// Append a book whose ISBN is assigned from the next position
    pub fn add_next(&mut self, author: String, title: String, year: String) -> usize {
        let isbn = self.next_isbn();
        self.add_book(isbn, author, title, year)
    }

    /// ISBN the next appended book will receive
    pub fn next_isbn(&self) -> String {
        (self.books.len() + 1).to_string()
    }

    /// Book stored at a 0-based index
    pub fn book(&self, index: usize) -> LibraryResult<&Book> {
        self.books.get(index).ok_or(LibraryError::UnknownBook(index))
    }

    /// Human-readable rendering of the book at `index`: "author, title, year"
    pub fn get_book(&self, index: usize) -> LibraryResult<String> {
        self.book(index).map(|book| book.to_string())
    }

    /// Linear search for the book whose stored ISBN text equals `isbn`.
    ///
    /// Returns its 0-based index, or `None` when absent.
    pub fn find_isbn(&self, isbn: &str) -> Option<usize> {
        self.books.iter().position(|book| book.isbn == isbn)
    }

    pub fn size(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
