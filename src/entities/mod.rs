// Entity Models
//
// Both collections are append-only: identifiers are positions and are
// never reused or renumbered.

pub mod book;
pub mod member;

pub use book::{Book, BookCatalog};
pub use member::{Member, MemberRegistry};
