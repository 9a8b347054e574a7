//! An in-process [`BookRepo`], with the same lifecycle rules as the Postgres one.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{DatabaseError, RepoError};
use crate::models::{Book, BookPatch, NewBook};
use crate::repo::BookRepo;

#[derive(Clone, Default)]
pub struct InMemoryBookRepo {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    // Last ID handed out. Only ever grows, so removed IDs are never reused.
    last_id: i32,
    books: BTreeMap<i32, Book>,
}

impl InMemoryBookRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookRepo for InMemoryBookRepo {
    #[instrument(skip(self))]
    async fn list_books(&self) -> Result<Vec<Book>, RepoError> {
        let state = self.state.lock().await;
        Ok(state
            .books
            .values()
            .filter(|book| book.deleted_at.is_none())
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_book(&self, id: i32) -> Result<Book, RepoError> {
        let state = self.state.lock().await;
        state
            .books
            .get(&id)
            .filter(|book| book.deleted_at.is_none())
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    #[instrument(skip(self, new_book))]
    async fn insert_book(&self, new_book: NewBook) -> Result<Book, RepoError> {
        new_book.validate()?;
        let mut state = self.state.lock().await;

        let id = state
            .last_id
            .checked_add(1)
            .ok_or(RepoError::Persistence(DatabaseError::IdsExhausted))?;
        state.last_id = id;
        let now = Utc::now();
        let book = Book {
            id,
            name: new_book.name,
            author: new_book.author,
            description: new_book.description,
            price: new_book.price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.books.insert(book.id, book.clone());
        Ok(book)
    }

    #[instrument(skip(self, patch))]
    async fn update_book(&self, id: i32, patch: BookPatch) -> Result<Book, RepoError> {
        patch.validate()?;
        let mut state = self.state.lock().await;

        let book = state
            .books
            .get_mut(&id)
            .filter(|book| book.deleted_at.is_none())
            .ok_or(RepoError::NotFound(id))?;
        patch.apply_to(book);
        book.updated_at = Utc::now().max(book.created_at);
        Ok(book.clone())
    }

    #[instrument(skip(self))]
    async fn soft_delete_book(&self, id: i32) -> Result<bool, RepoError> {
        let mut state = self.state.lock().await;

        match state.books.get_mut(&id) {
            Some(book) if book.deleted_at.is_none() => {
                let now = Utc::now().max(book.created_at);
                book.deleted_at = Some(now);
                book.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn hard_delete_book(&self, id: i32) -> Result<bool, RepoError> {
        let mut state = self.state.lock().await;
        Ok(state.books.remove(&id).is_some())
    }
}
