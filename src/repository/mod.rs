//! Repository layer for database operations

pub mod books;
pub mod ledger;
pub mod librarians;
pub mod members;
pub mod payments;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub ledger: ledger::LedgerRepository,
    pub payments: payments::PaymentsRepository,
    pub librarians: librarians::LibrariansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            ledger: ledger::LedgerRepository::new(pool.clone()),
            payments: payments::PaymentsRepository::new(pool.clone()),
            librarians: librarians::LibrariansRepository::new(pool.clone()),
            pool,
        }
    }
}
