//! Data models for Atheneum

pub mod book;
pub mod borrow;
pub mod enums;
pub mod librarian;
pub mod member;
pub mod payment;

// Re-export commonly used types
pub use book::Book;
pub use borrow::{BorrowState, BorrowedBook, BorrowedBookDetails};
pub use enums::{BookStatus, Category, PaymentMethod};
pub use librarian::{AdminClaims, AdminId, Librarian};
pub use member::{Member, MemberDetails};
pub use payment::{Transaction, TransactionDetails};
