// Book Recommender - Core Library
// Exposes all modules for use in the CLI and in tests

pub mod config;
pub mod entities;
pub mod error;
pub mod library;
pub mod loader;
pub mod ratings;
pub mod session;

// Re-export commonly used types
pub use config::Settings;
pub use entities::{Book, BookCatalog, Member, MemberRegistry};
pub use error::{LibraryError, LibraryResult, SessionError, SessionResult};
pub use library::{Library, Recommendation};
pub use loader::{
    load_books, load_member_ratings, parse_member_ratings,
    BookRecord, MemberRecord,
};
pub use ratings::{
    is_valid_rating, RatingMatrix,
    DEFAULT_MAX_BOOKS, LIKED, RATING_SCALE, REALLY_LIKED, UNRATED,
};
pub use session::{SessionController, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
