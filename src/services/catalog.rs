//! Catalog management service

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook},
        librarian::AdminId,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books, optionally filtered by a title/author search term
    pub async fn list_books(&self, admin: AdminId, search: Option<&str>) -> AppResult<Vec<Book>> {
        self.repository.books.list(admin, search).await
    }

    /// Get book by ID
    pub async fn get_book(&self, admin: AdminId, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(admin, id).await
    }

    /// Create a new book; availability status is derived from the quantity
    pub async fn create_book(&self, admin: AdminId, book: CreateBook) -> AppResult<Book> {
        check_fee(book.borrowing_fee)?;
        let created = self.repository.books.create(admin, &book).await?;
        tracing::info!("New book added: id={} title={:?}", created.id, created.title);
        Ok(created)
    }

    /// Update a book; availability status is re-derived from the quantity
    pub async fn update_book(&self, admin: AdminId, id: i32, book: UpdateBook) -> AppResult<Book> {
        check_fee(book.borrowing_fee)?;
        self.repository.books.update(admin, id, &book).await
    }

    /// Delete a book; refused while it has outstanding borrow records
    pub async fn delete_book(&self, admin: AdminId, id: i32) -> AppResult<()> {
        self.repository.books.delete(admin, id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }
}

fn check_fee(fee: Decimal) -> AppResult<()> {
    if fee.is_sign_negative() {
        return Err(AppError::Validation(
            "Borrowing fee must not be negative".to_string(),
        ));
    }
    Ok(())
}
