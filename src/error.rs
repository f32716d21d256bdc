// ⚠️ Error types
// Lookups never index blindly: every miss comes back as one of these.

use thiserror::Error;

/// Failures raised by the catalog, the registry and the rating matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// Book index outside `[0, size)`
    #[error("Book not found: index {0}")]
    UnknownBook(usize),

    /// Member id outside `[0, size)`
    #[error("Member not found: id {0}")]
    UnknownMember(usize),

    /// Rating column beyond the configured per-member capacity
    #[error("Book index {book} exceeds rating capacity of {capacity}")]
    CapacityExceeded { book: usize, capacity: usize },

    /// Similarity needs at least one other member to compare against
    #[error("No other members to compare with member {0}")]
    NoOtherMembers(usize),
}

/// Failures raised while driving an interactive session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Input stream reached end of file
    #[error("Input closed")]
    InputClosed,

    #[error(transparent)]
    Library(#[from] LibraryError),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
pub type SessionResult<T> = Result<T, SessionError>;
