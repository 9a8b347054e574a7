use crate::error::RepoError;
use crate::models::{Book, BookPatch, NewBook};
use std::future::Future;

/// Persistence for books.
///
/// Soft-deleted books are invisible to every read and to updates.
/// Ids are never reused, not even after a hard delete.
pub trait BookRepo {
    /// All live books, ordered by ID
    fn list_books(&self) -> impl Future<Output = Result<Vec<Book>, RepoError>> + Send;

    fn get_book(&self, id: i32) -> impl Future<Output = Result<Book, RepoError>> + Send;

    fn insert_book(&self, new_book: NewBook)
        -> impl Future<Output = Result<Book, RepoError>> + Send;

    /// Fails with [`RepoError::NotFound`] unless a live book has this ID
    fn update_book(
        &self,
        id: i32,
        patch: BookPatch,
    ) -> impl Future<Output = Result<Book, RepoError>> + Send;

    /// Returns true if a live book was marked as deleted, false otherwise.
    /// Deleting an already deleted book keeps its original deletion time.
    fn soft_delete_book(&self, id: i32) -> impl Future<Output = Result<bool, RepoError>> + Send;

    /// Returns true if the book existed (live or soft-deleted) and was removed, false otherwise
    fn hard_delete_book(&self, id: i32) -> impl Future<Output = Result<bool, RepoError>> + Send;
}
