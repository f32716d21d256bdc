// 🏛️ Library - the three containers the session works against
//
// BookCatalog owns books, MemberRegistry owns members, RatingMatrix owns
// scores. Member rows in the matrix are kept one-to-one with registry ids.

use tracing::info;

use crate::entities::{BookCatalog, MemberRegistry};
use crate::error::LibraryResult;
use crate::loader::{BookRecord, MemberRecord};
use crate::ratings::{RatingMatrix, LIKED, REALLY_LIKED};

/// Books a similar member rated favorably
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// Id of the most similar member
    pub member_id: usize,
    /// Book indexes that member scored 5
    pub really_liked: Vec<usize>,
    /// Book indexes that member scored 3
    pub liked: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Library {
    books: BookCatalog,
    members: MemberRegistry,
    ratings: RatingMatrix,
}

impl Library {
    /// Empty library whose members can rate up to `max_books` books each
    pub fn new(max_books: usize) -> Self {
        Library {
            books: BookCatalog::new(),
            members: MemberRegistry::new(),
            ratings: RatingMatrix::new(max_books),
        }
    }

    pub fn books(&self) -> &BookCatalog {
        &self.books
    }

    pub fn members(&self) -> &MemberRegistry {
        &self.members
    }

    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    /// Append loaded books; ISBNs continue from the current size
    pub fn import_books(&mut self, records: Vec<BookRecord>) -> usize {
        let count = records.len();
        for record in records {
            self.books.add_next(record.author, record.title, record.year);
        }
        count
    }

    /// Append loaded members together with their score rows.
    ///
    /// All-or-nothing: a row wider than the rating capacity leaves the
    /// library untouched.
    pub fn import_members(&mut self, records: Vec<MemberRecord>) -> LibraryResult<usize> {
        let mut members = self.members.clone();
        let mut ratings = self.ratings.clone();

        for record in &records {
            let id = members.add_member(record.name.clone());
            ratings.add_member();
            for (book_id, score) in record.ratings.iter().enumerate() {
                ratings.add_rating(id, book_id, *score)?;
            }
        }

        self.members = members;
        self.ratings = ratings;
        Ok(records.len())
    }

    /// Register a new member with an empty score row
    pub fn add_member(&mut self, name: String) -> usize {
        let id = self.members.add_member(name);
        self.ratings.add_member();
        info!(member_id = id, "member added");
        id
    }

    /// Add a book with the next ISBN; returns its 0-based index
    pub fn add_book(&mut self, author: String, title: String, year: String) -> usize {
        let isbn = self.books.add_next(author, title, year);
        info!(isbn, "book added");
        isbn - 1
    }

    pub fn login(&mut self, member_id: usize) -> LibraryResult<()> {
        self.members.login(member_id)
    }

    pub fn logout(&mut self, member_id: usize) -> LibraryResult<()> {
        self.members.logout(member_id)
    }

    /// Store a member's score for the book at `book_id`.
    ///
    /// Both ids must already exist: ratings never create members or books.
    pub fn rate(&mut self, member_id: usize, book_id: usize, score: i32) -> LibraryResult<()> {
        self.members.member(member_id)?;
        self.books.book(book_id)?;
        self.ratings.add_rating(member_id, book_id, score)
    }

    /// Most similar member and the books they liked, in catalog order
    pub fn recommend(&self, member_id: usize) -> LibraryResult<Recommendation> {
        let similar = self.ratings.similar(member_id)?;

        let with_score = |score: i32| -> Vec<usize> {
            (0..self.books.size())
                .filter(|book| self.ratings.get_rating(similar, *book) == score)
                .collect()
        };

        Ok(Recommendation {
            member_id: similar,
            really_liked: with_score(REALLY_LIKED),
            liked: with_score(LIKED),
        })
    }
}
