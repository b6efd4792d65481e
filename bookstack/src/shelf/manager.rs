//! Shelf operations over a [`ShelfStore`].

use std::sync::Arc;

use uuid::Uuid;

use super::errors::ShelfResult;
use crate::catalog::Book;
use crate::db::repository::ShelfStore;

pub struct ShelfManager {
    store: Arc<dyn ShelfStore>,
}

impl ShelfManager {
    pub fn new(store: Arc<dyn ShelfStore>) -> Self {
        Self { store }
    }

    /// Add (or refresh) a batch of books on a user's shelf.
    pub async fn add_books(&self, user_id: Uuid, books: &[Book]) -> ShelfResult<()> {
        if books.is_empty() {
            return Ok(());
        }
        self.store.add_books(user_id, books).await
    }

    /// All books on a user's shelf.
    pub async fn books(&self, user_id: Uuid) -> ShelfResult<Vec<Book>> {
        self.store.books_for_user(user_id).await
    }

    /// Remove a single book; returns whether it was present.
    pub async fn remove_book(&self, user_id: Uuid, book_id: &str) -> ShelfResult<bool> {
        self.store.remove_book(user_id, book_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::mock::MemoryShelfStore;

    fn book(id: &str, title: &str) -> Book {
        Book {
            book_id: id.to_string(),
            title: title.to_string(),
            ..Book::default()
        }
    }

    #[tokio::test]
    async fn add_list_remove() {
        let manager = ShelfManager::new(Arc::new(MemoryShelfStore::new()));
        let user = Uuid::new_v4();

        manager
            .add_books(user, &[book("1", "Dune"), book("2", "Hyperion")])
            .await
            .unwrap();
        assert_eq!(manager.books(user).await.unwrap().len(), 2);

        assert!(manager.remove_book(user, "1").await.unwrap());
        assert!(!manager.remove_book(user, "1").await.unwrap());
        assert_eq!(manager.books(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn re_adding_updates_instead_of_duplicating() {
        let manager = ShelfManager::new(Arc::new(MemoryShelfStore::new()));
        let user = Uuid::new_v4();

        manager.add_books(user, &[book("1", "Dune")]).await.unwrap();
        manager
            .add_books(user, &[book("1", "Dune Messiah")])
            .await
            .unwrap();

        let books = manager.books(user).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune Messiah");
    }

    #[tokio::test]
    async fn shelves_are_per_user() {
        let manager = ShelfManager::new(Arc::new(MemoryShelfStore::new()));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        manager.add_books(alice, &[book("1", "Dune")]).await.unwrap();
        assert!(manager.books(bob).await.unwrap().is_empty());
        assert!(!manager.remove_book(bob, "1").await.unwrap());
        assert_eq!(manager.books(alice).await.unwrap().len(), 1);
    }
}
