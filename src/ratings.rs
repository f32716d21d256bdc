// ⭐ Rating Matrix - Member × Book scores + similarity
//
// Rows are members (0-based ids), columns are book indexes (ISBN - 1).
// 0 means "unrated". The matrix stores whatever it is given; checking a
// score against the rating scale is the caller's job.

use tracing::debug;

use crate::error::{LibraryError, LibraryResult};

// ============================================================================
// RATING SCALE
// ============================================================================

/// Score meaning "not rated"
pub const UNRATED: i32 = 0;

/// Score given to books a member really liked
pub const REALLY_LIKED: i32 = 5;

/// Score given to books a member liked
pub const LIKED: i32 = 3;

/// Default per-member book capacity
pub const DEFAULT_MAX_BOOKS: usize = 30;

/// Accepted scores and what they mean, worst to best
pub const RATING_SCALE: [(i32, &str); 5] = [
    (-5, "Hated it!"),
    (-3, "Didn't like it"),
    (1, "neither hot nor cold"),
    (3, "Liked it!"),
    (5, "Really liked it!"),
];

/// True for the scores a member may enter interactively
pub fn is_valid_rating(score: i32) -> bool {
    RATING_SCALE.iter().any(|(value, _)| *value == score)
}

// ============================================================================
// RATING MATRIX
// ============================================================================

/// Dense score table, one fixed-width row per member
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    rows: Vec<Vec<i32>>,
    capacity: usize,
}

impl RatingMatrix {
    /// Create an empty matrix holding up to `capacity` books per member
    pub fn new(capacity: usize) -> Self {
        RatingMatrix {
            rows: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of member rows
    pub fn member_count(&self) -> usize {
        self.rows.len()
    }

    /// Append an all-unrated row and return its member id
    pub fn add_member(&mut self) -> usize {
        self.rows.push(vec![UNRATED; self.capacity]);
        self.rows.len() - 1
    }

    /// Store `score` at (member, book), overwriting any previous value.
    ///
    /// Rows only come from `add_member`; an unknown member or a book index
    /// at or beyond the capacity is refused.
    pub fn add_rating(&mut self, member_id: usize, book_id: usize, score: i32) -> LibraryResult<()> {
        let capacity = self.capacity;
        let row = self
            .rows
            .get_mut(member_id)
            .ok_or(LibraryError::UnknownMember(member_id))?;

        let slot = row.get_mut(book_id).ok_or(LibraryError::CapacityExceeded {
            book: book_id,
            capacity,
        })?;

        *slot = score;
        Ok(())
    }

    /// Score at (member, book); 0 if never set
    pub fn get_rating(&self, member_id: usize, book_id: usize) -> i32 {
        self.rows
            .get(member_id)
            .and_then(|row| row.get(book_id))
            .copied()
            .unwrap_or(UNRATED)
    }

    /// Full score row of a member
    pub fn row(&self, member_id: usize) -> LibraryResult<&[i32]> {
        self.rows
            .get(member_id)
            .map(|row| row.as_slice())
            .ok_or(LibraryError::UnknownMember(member_id))
    }

    /// Similarity of two members: sum of score products over all books.
    ///
    /// Books either member left unrated add nothing; matching opinions
    /// add, opposite opinions subtract, stronger opinions weigh more.
    pub fn similarity(&self, a: usize, b: usize) -> LibraryResult<i64> {
        let row_a = self.row(a)?;
        let row_b = self.row(b)?;

        Ok(row_a
            .iter()
            .zip(row_b)
            .map(|(x, y)| i64::from(*x) * i64::from(*y))
            .sum())
    }

    /// Id of the member whose ratings agree most with `member_id`'s.
    ///
    /// Never returns `member_id` itself. On a tie the lowest id wins.
    pub fn similar(&self, member_id: usize) -> LibraryResult<usize> {
        self.row(member_id)?;

        let mut best: Option<(usize, i64)> = None;
        for other in 0..self.rows.len() {
            if other == member_id {
                continue;
            }

            let score = self.similarity(member_id, other)?;
            debug!(member_id, other, score, "similarity");

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((other, score)),
            }
        }

        best.map(|(id, _)| id)
            .ok_or(LibraryError::NoOtherMembers(member_id))
    }
}

impl Default for RatingMatrix {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BOOKS)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_with(rows: &[&[i32]]) -> RatingMatrix {
        let mut matrix = RatingMatrix::new(10);
        for (member, scores) in rows.iter().enumerate() {
            matrix.add_member();
            for (book, score) in scores.iter().enumerate() {
                matrix.add_rating(member, book, *score).unwrap();
            }
        }
        matrix
    }

    #[test]
    fn test_valid_ratings() {
        for score in [-5, -3, 1, 3, 5] {
            assert!(is_valid_rating(score));
        }
        for score in [-4, -1, 0, 2, 4, 6] {
            assert!(!is_valid_rating(score));
        }
    }

    #[test]
    fn test_unset_rating_is_zero() {
        let mut matrix = RatingMatrix::new(5);
        matrix.add_member();

        assert_eq!(matrix.get_rating(0, 3), 0);
        assert_eq!(matrix.get_rating(7, 0), 0); // No such row
        assert_eq!(matrix.get_rating(0, 99), 0); // Beyond capacity
    }

    #[test]
    fn test_write_then_read_overwrites() {
        let mut matrix = RatingMatrix::new(5);
        matrix.add_member();

        matrix.add_rating(0, 2, 3).unwrap();
        assert_eq!(matrix.get_rating(0, 2), 3);

        matrix.add_rating(0, 2, -5).unwrap();
        assert_eq!(matrix.get_rating(0, 2), -5);
    }

    #[test]
    fn test_add_rating_unknown_member() {
        let mut matrix = matrix_with(&[&[5, 5], &[-5, -5]]);

        assert_eq!(matrix.add_rating(7, 0, 3), Err(LibraryError::UnknownMember(7)));
        assert_eq!(
            matrix.add_rating(usize::MAX, 0, 3),
            Err(LibraryError::UnknownMember(usize::MAX))
        );

        // No rows appear, so similarity stays among known members
        assert_eq!(matrix.member_count(), 2);
        assert_eq!(matrix.similar(0).unwrap(), 1);
    }

    #[test]
    fn test_add_member_row_starts_unrated() {
        let mut matrix = RatingMatrix::new(5);
        let id = matrix.add_member();

        assert_eq!(id, 0);
        assert_eq!(matrix.row(id).unwrap(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut matrix = RatingMatrix::new(3);
        matrix.add_member();

        let result = matrix.add_rating(0, 3, 5);
        assert_eq!(
            result,
            Err(LibraryError::CapacityExceeded {
                book: 3,
                capacity: 3
            })
        );
        assert_eq!(matrix.row(0).unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn test_similarity_score() {
        let matrix = matrix_with(&[&[5, 5, 1], &[5, 5, -5], &[-5, -5, -5]]);

        assert_eq!(matrix.similarity(0, 1).unwrap(), 45);
        assert_eq!(matrix.similarity(0, 2).unwrap(), -55);
        assert_eq!(matrix.similarity(1, 2).unwrap(), -25);
    }

    #[test]
    fn test_similar_two_members() {
        let matrix = matrix_with(&[&[5, 5, 1], &[5, 5, -5]]);
        assert_eq!(matrix.similar(0).unwrap(), 1);
        assert_eq!(matrix.similar(1).unwrap(), 0);
    }

    #[test]
    fn test_similar_prefers_agreement() {
        let matrix = matrix_with(&[&[5, 5, 1], &[5, 5, -5], &[-5, -5, -5]]);
        assert_eq!(matrix.similar(0).unwrap(), 1);
    }

    #[test]
    fn test_similar_never_returns_self() {
        let matrix = matrix_with(&[&[5, 5, 5], &[5, 5, 5], &[-3, 1, 0], &[0, 0, 0]]);

        for member in 0..matrix.member_count() {
            assert_ne!(matrix.similar(member).unwrap(), member);
        }
    }

    #[test]
    fn test_similar_tie_keeps_first() {
        // Members 1 and 2 score identically against member 0
        let matrix = matrix_with(&[&[3, 0, 0], &[3, 1, 0], &[3, 0, 5]]);
        assert_eq!(matrix.similar(0).unwrap(), 1);

        // All-zero rows tie at 0: lowest other id wins
        let empty = matrix_with(&[&[0], &[0], &[0]]);
        assert_eq!(empty.similar(2).unwrap(), 0);
        assert_eq!(empty.similar(0).unwrap(), 1);
    }

    #[test]
    fn test_similar_ignores_unrated_books() {
        // Member 2 disagrees only on a book member 0 never rated
        let matrix = matrix_with(&[&[5, 0], &[3, 0], &[5, -5]]);
        assert_eq!(matrix.similar(0).unwrap(), 2);
    }

    #[test]
    fn test_similar_errors() {
        let single = matrix_with(&[&[5]]);
        assert_eq!(single.similar(0), Err(LibraryError::NoOtherMembers(0)));

        let matrix = matrix_with(&[&[5], &[3]]);
        assert_eq!(matrix.similar(4), Err(LibraryError::UnknownMember(4)));
    }
}
