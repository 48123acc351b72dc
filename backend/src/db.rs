use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use thiserror::Error;

use shared::{Book, CreateBookRequest, UpdateBookRequest};

// The database URL used when DATABASE_URL is not set
const DEFAULT_DATABASE_URL: &str = "sqlite:perpustakaan.db";

/// A failed store operation. Carries the underlying driver message verbatim;
/// no database error codes are interpreted at this layer.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(String);

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// DbConnection manages operations on the buku table
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database, honoring DATABASE_URL if set
    pub async fn init() -> Result<Self> {
        let url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create our database table if it doesn't exist
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS buku (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                judul TEXT NOT NULL,
                penulis TEXT NOT NULL,
                tahun INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// List every book, in store order
    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query("SELECT id, judul, penulis, tahun FROM buku")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.iter().map(row_to_book).collect())
    }

    /// Retrieve a single book by its id
    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query("SELECT id, judul, penulis, tahun FROM buku WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_book))
    }

    /// Insert a new book and return the id the store assigned to it
    pub async fn insert_book(&self, book: &CreateBookRequest) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO buku (judul, penulis, tahun) VALUES (?, ?, ?)")
            .bind(&book.judul)
            .bind(&book.penulis)
            .bind(book.tahun)
            .execute(&*self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Overwrite the supplied fields of an existing book, leaving absent
    /// fields untouched. Returns false when no row has the id.
    pub async fn update_book(
        &self,
        id: i64,
        patch: &UpdateBookRequest,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE buku SET judul = COALESCE(?, judul), penulis = COALESCE(?, penulis), \
             tahun = COALESCE(?, tahun) WHERE id = ?",
        )
        .bind(&patch.judul)
        .bind(&patch.penulis)
        .bind(patch.tahun)
        .bind(id)
        .execute(&*self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a book by its id. Returns false when no row has the id.
    pub async fn delete_book(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM buku WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_book(row: &sqlx::sqlite::SqliteRow) -> Book {
    Book {
        id: row.get("id"),
        judul: row.get("judul"),
        penulis: row.get("penulis"),
        tahun: row.get("tahun"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Setup a new test database for each test
    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn dune() -> CreateBookRequest {
        CreateBookRequest {
            judul: "Dune".to_string(),
            penulis: "Frank Herbert".to_string(),
            tahun: 1965,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_book() {
        let db = setup_test().await;

        let id = db.insert_book(&dune()).await.expect("Failed to insert book");

        // The first row in a fresh table gets id 1
        assert_eq!(id, 1);

        let book = db
            .get_book(id)
            .await
            .expect("Failed to get book")
            .expect("Book should exist");
        assert_eq!(book.judul, "Dune");
        assert_eq!(book.penulis, "Frank Herbert");
        assert_eq!(book.tahun, 1965);
    }

    #[tokio::test]
    async fn test_get_nonexistent_book() {
        let db = setup_test().await;

        let result = db.get_book(42).await.expect("Query failed");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_books() {
        let db = setup_test().await;

        // Initially empty
        let books = db.list_books().await.expect("Failed to list books");
        assert!(books.is_empty(), "Table should be empty at test start");

        db.insert_book(&dune()).await.expect("Failed to insert book");
        db.insert_book(&CreateBookRequest {
            judul: "Laskar Pelangi".to_string(),
            penulis: "Andrea Hirata".to_string(),
            tahun: 2005,
        })
        .await
        .expect("Failed to insert book");

        let books = db.list_books().await.expect("Failed to list books");
        assert_eq!(books.len(), 2);
        assert!(books.iter().any(|b| b.judul == "Dune"));
        assert!(books.iter().any(|b| b.judul == "Laskar Pelangi"));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_absent_fields() {
        let db = setup_test().await;
        let id = db.insert_book(&dune()).await.expect("Failed to insert book");

        let patch = UpdateBookRequest {
            judul: None,
            penulis: None,
            tahun: Some(2001),
        };
        let updated = db.update_book(id, &patch).await.expect("Failed to update book");
        assert!(updated, "Row with this id should have been matched");

        let book = db
            .get_book(id)
            .await
            .expect("Failed to get book")
            .expect("Book should exist");
        assert_eq!(book.judul, "Dune");
        assert_eq!(book.penulis, "Frank Herbert");
        assert_eq!(book.tahun, 2001);
    }

    #[tokio::test]
    async fn test_full_update_overwrites_every_field() {
        let db = setup_test().await;
        let id = db.insert_book(&dune()).await.expect("Failed to insert book");

        let patch = UpdateBookRequest {
            judul: Some("Dune Messiah".to_string()),
            penulis: Some("F. Herbert".to_string()),
            tahun: Some(1969),
        };
        let updated = db.update_book(id, &patch).await.expect("Failed to update book");
        assert!(updated);

        let book = db
            .get_book(id)
            .await
            .expect("Failed to get book")
            .expect("Book should exist");
        assert_eq!(book.judul, "Dune Messiah");
        assert_eq!(book.penulis, "F. Herbert");
        assert_eq!(book.tahun, 1969);
    }

    #[tokio::test]
    async fn test_update_nonexistent_book() {
        let db = setup_test().await;

        let patch = UpdateBookRequest {
            judul: Some("Ghost".to_string()),
            penulis: None,
            tahun: None,
        };
        let updated = db.update_book(99, &patch).await.expect("Update query failed");

        assert!(!updated, "No row should have been matched");
    }

    #[tokio::test]
    async fn test_delete_book() {
        let db = setup_test().await;
        let id = db.insert_book(&dune()).await.expect("Failed to insert book");

        // Delete the row
        let deleted = db.delete_book(id).await.expect("Failed to delete book");
        assert!(deleted, "Book should have been deleted");

        // Verify it's gone
        let book = db.get_book(id).await.expect("Failed to check after deletion");
        assert!(book.is_none());

        // Try to delete again (should return false - not found)
        let deleted_again = db.delete_book(id).await.expect("Failed to re-delete book");
        assert!(!deleted_again, "Book should not exist to be deleted");
    }
}
