//! Storage traits and their PostgreSQL implementations.
//!
//! The managers depend only on the traits, so tests run against the
//! in-memory implementations in [`mock`] without a database. The `mock`
//! module is also exported under the `test-utils` feature for downstream
//! test suites.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::models::{Role, User};
use crate::catalog::Book;
use crate::shelf::errors::ShelfResult;
use crate::tasks::errors::TaskResult;
use crate::tasks::models::{Task, TaskStatus, TaskUpdate};

/// PostgreSQL's SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether an account with this username or email already exists.
    async fn exists(&self, username: &str, email: &str) -> AuthResult<bool>;

    /// Insert a new account. A concurrent duplicate surfaces as
    /// [`AuthError::Conflict`], not a database error.
    async fn create(&self, username: &str, email: &str, password_hash: &str) -> AuthResult<User>;

    /// Look up an account and its password hash by username.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<(User, String)>>;
}

/// Per-user book collection storage.
#[async_trait]
pub trait ShelfStore: Send + Sync {
    /// Upsert a batch of books keyed by `(user_id, book_id)`.
    async fn add_books(&self, user_id: Uuid, books: &[Book]) -> ShelfResult<()>;

    async fn books_for_user(&self, user_id: Uuid) -> ShelfResult<Vec<Book>>;

    /// Returns whether the book was present.
    async fn remove_book(&self, user_id: Uuid, book_id: &str) -> ShelfResult<bool>;
}

/// Per-user task storage.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, task: &Task) -> TaskResult<()>;

    async fn tasks_for_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>>;

    /// Replace a task's fields; `None` if the task does not belong to this
    /// user.
    async fn update(&self, user_id: Uuid, update: &TaskUpdate) -> TaskResult<Option<Task>>;

    /// Returns whether the task was present.
    async fn remove(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<bool>;
}

/// PostgreSQL-backed account storage.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists(&self, username: &str, email: &str) -> AuthResult<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = $1 OR email = $2")
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn create(&self, username: &str, email: &str, password_hash: &str) -> AuthResult<User> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Role::User.as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AuthError::Conflict
            } else {
                AuthError::Database(err)
            }
        })?;

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            role: Role::User,
        })
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<(User, String)>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, role
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let user = User {
                id: row.get("id"),
                username: row.get("username"),
                email: row.get("email"),
                role: Role::from(row.get::<String, _>("role").as_str()),
            };
            (user, row.get("password_hash"))
        }))
    }
}

/// PostgreSQL-backed shelf storage.
pub struct PgShelfStore {
    pool: PgPool,
}

impl PgShelfStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn book_from_row(row: &sqlx::postgres::PgRow) -> Book {
    Book {
        book_id: row.get("book_id"),
        title: row.get("title"),
        authors: row.get("authors"),
        average_rating: row.get("average_rating"),
        isbn: row.get("isbn"),
        isbn13: row.get("isbn13"),
        language_code: row.get("language_code"),
        num_pages: row.get("num_pages"),
        ratings_count: row.get("ratings_count"),
        text_reviews_count: row.get("text_reviews_count"),
        publication_date: row.get("publication_date"),
        publisher: row.get("publisher"),
        price: row.get("price"),
    }
}

#[async_trait]
impl ShelfStore for PgShelfStore {
    async fn add_books(&self, user_id: Uuid, books: &[Book]) -> ShelfResult<()> {
        let mut tx = self.pool.begin().await?;
        for book in books {
            sqlx::query(
                "INSERT INTO user_books (
                    user_id, book_id, title, authors, average_rating, isbn,
                    isbn13, language_code, num_pages, ratings_count,
                    text_reviews_count, publication_date, publisher, price
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                 ON CONFLICT (user_id, book_id) DO UPDATE SET
                    title = EXCLUDED.title,
                    authors = EXCLUDED.authors,
                    average_rating = EXCLUDED.average_rating,
                    isbn = EXCLUDED.isbn,
                    isbn13 = EXCLUDED.isbn13,
                    language_code = EXCLUDED.language_code,
                    num_pages = EXCLUDED.num_pages,
                    ratings_count = EXCLUDED.ratings_count,
                    text_reviews_count = EXCLUDED.text_reviews_count,
                    publication_date = EXCLUDED.publication_date,
                    publisher = EXCLUDED.publisher,
                    price = EXCLUDED.price",
            )
            .bind(user_id)
            .bind(&book.book_id)
            .bind(&book.title)
            .bind(&book.authors)
            .bind(&book.average_rating)
            .bind(&book.isbn)
            .bind(&book.isbn13)
            .bind(&book.language_code)
            .bind(&book.num_pages)
            .bind(&book.ratings_count)
            .bind(&book.text_reviews_count)
            .bind(&book.publication_date)
            .bind(&book.publisher)
            .bind(&book.price)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn books_for_user(&self, user_id: Uuid) -> ShelfResult<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT book_id, title, authors, average_rating, isbn, isbn13,
                    language_code, num_pages, ratings_count, text_reviews_count,
                    publication_date, publisher, price
             FROM user_books WHERE user_id = $1 ORDER BY title",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(book_from_row).collect())
    }

    async fn remove_book(&self, user_id: Uuid, book_id: &str) -> ShelfResult<bool> {
        let result = sqlx::query("DELETE FROM user_books WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// PostgreSQL-backed task storage.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, user_id: Uuid, task: &Task) -> TaskResult<()> {
        sqlx::query(
            "INSERT INTO user_tasks (task_id, user_id, title, description, due_date, status)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(task.task_id)
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(task.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn tasks_for_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT task_id, title, description, due_date, status
             FROM user_tasks WHERE user_id = $1 ORDER BY due_date, task_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Task {
                task_id: row.get("task_id"),
                title: row.get("title"),
                description: row.get("description"),
                due_date: row.get("due_date"),
                status: TaskStatus::parse(row.get::<String, _>("status").as_str())
                    .unwrap_or(TaskStatus::Pending),
            })
            .collect())
    }

    async fn update(&self, user_id: Uuid, update: &TaskUpdate) -> TaskResult<Option<Task>> {
        let result = sqlx::query(
            "UPDATE user_tasks
             SET title = $3, description = $4, due_date = $5, status = $6
             WHERE task_id = $1 AND user_id = $2",
        )
        .bind(update.task_id)
        .bind(user_id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.due_date)
        .bind(update.status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(Task {
            task_id: update.task_id,
            title: update.title.clone(),
            description: update.description.clone(),
            due_date: update.due_date.clone(),
            status: update.status,
        }))
    }

    async fn remove(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<bool> {
        let result = sqlx::query("DELETE FROM user_tasks WHERE user_id = $1 AND task_id = $2")
            .bind(user_id)
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory store implementations for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory [`UserStore`] with the same uniqueness semantics as the
    /// PostgreSQL schema.
    #[derive(Default)]
    pub struct MemoryUserStore {
        users: Mutex<Vec<(User, String)>>,
    }

    impl MemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Change a user's role in place. Lets tests exercise renewal
        /// picking up role changes.
        pub fn set_role(&self, username: &str, role: Role) {
            let mut users = self.users.lock().unwrap();
            if let Some((user, _)) = users.iter_mut().find(|(u, _)| u.username == username) {
                user.role = role;
            }
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn exists(&self, username: &str, email: &str) -> AuthResult<bool> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .any(|(u, _)| u.username == username || u.email == email))
        }

        async fn create(
            &self,
            username: &str,
            email: &str,
            password_hash: &str,
        ) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|(u, _)| u.username == username || u.email == email)
            {
                return Err(AuthError::Conflict);
            }
            let user = User {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                role: Role::User,
            };
            users.push((user.clone(), password_hash.to_string()));
            Ok(user)
        }

        async fn find_by_username(&self, username: &str) -> AuthResult<Option<(User, String)>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|(u, _)| u.username == username)
                .map(|(u, hash)| (u.clone(), hash.clone())))
        }
    }

    /// In-memory [`ShelfStore`].
    #[derive(Default)]
    pub struct MemoryShelfStore {
        shelves: Mutex<HashMap<Uuid, Vec<Book>>>,
    }

    impl MemoryShelfStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ShelfStore for MemoryShelfStore {
        async fn add_books(&self, user_id: Uuid, books: &[Book]) -> ShelfResult<()> {
            let mut shelves = self.shelves.lock().unwrap();
            let shelf = shelves.entry(user_id).or_default();
            for book in books {
                match shelf.iter_mut().find(|b| b.book_id == book.book_id) {
                    Some(existing) => *existing = book.clone(),
                    None => shelf.push(book.clone()),
                }
            }
            Ok(())
        }

        async fn books_for_user(&self, user_id: Uuid) -> ShelfResult<Vec<Book>> {
            let shelves = self.shelves.lock().unwrap();
            Ok(shelves.get(&user_id).cloned().unwrap_or_default())
        }

        async fn remove_book(&self, user_id: Uuid, book_id: &str) -> ShelfResult<bool> {
            let mut shelves = self.shelves.lock().unwrap();
            let Some(shelf) = shelves.get_mut(&user_id) else {
                return Ok(false);
            };
            let before = shelf.len();
            shelf.retain(|b| b.book_id != book_id);
            Ok(shelf.len() < before)
        }
    }

    /// In-memory [`TaskStore`].
    #[derive(Default)]
    pub struct MemoryTaskStore {
        tasks: Mutex<HashMap<Uuid, Vec<Task>>>,
    }

    impl MemoryTaskStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl TaskStore for MemoryTaskStore {
        async fn insert(&self, user_id: Uuid, task: &Task) -> TaskResult<()> {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.entry(user_id).or_default().push(task.clone());
            Ok(())
        }

        async fn tasks_for_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
            let tasks = self.tasks.lock().unwrap();
            Ok(tasks.get(&user_id).cloned().unwrap_or_default())
        }

        async fn update(&self, user_id: Uuid, update: &TaskUpdate) -> TaskResult<Option<Task>> {
            let mut tasks = self.tasks.lock().unwrap();
            let Some(list) = tasks.get_mut(&user_id) else {
                return Ok(None);
            };
            let Some(task) = list.iter_mut().find(|t| t.task_id == update.task_id) else {
                return Ok(None);
            };
            task.title = update.title.clone();
            task.description = update.description.clone();
            task.due_date = update.due_date.clone();
            task.status = update.status;
            Ok(Some(task.clone()))
        }

        async fn remove(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<bool> {
            let mut tasks = self.tasks.lock().unwrap();
            let Some(list) = tasks.get_mut(&user_id) else {
                return Ok(false);
            };
            let before = list.len();
            list.retain(|t| t.task_id != task_id);
            Ok(list.len() < before)
        }
    }

}
