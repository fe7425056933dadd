//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
        migrate_schema(conn, 1)?;
    } else if current_version < SCHEMA_VERSION {
        migrate_schema(conn, current_version)?;
    }

    Ok(())
}

fn internal(context: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message: format!("{}: {}", context, e),
        source: None,
    })
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| internal("Failed to create schema_version table", e))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| internal("Failed to clear schema_version", e))?;

    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| internal("Failed to set schema_version", e))?;

    Ok(())
}

/// Create the initial catalog schema (version 1).
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            subtitle TEXT,
            publisher TEXT,
            year INTEGER,
            isbn10 TEXT,
            isbn13 TEXT,
            ean TEXT,
            language TEXT,
            pages INTEGER,
            dimensions TEXT,
            description TEXT,
            keywords TEXT,
            dewey_code TEXT,
            shelf TEXT,
            level TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS book_authors (
            book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (book_id, author_id)
        );

        CREATE TABLE IF NOT EXISTS copies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            inventory_number TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'disponibile'
                CHECK (status IN ('disponibile', 'prestato', 'riservato',
                                  'danneggiato', 'perso', 'manutenzione')),
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
        CREATE INDEX IF NOT EXISTS idx_books_year ON books(year);
        CREATE INDEX IF NOT EXISTS idx_books_isbn10 ON books(isbn10);
        CREATE INDEX IF NOT EXISTS idx_books_isbn13 ON books(isbn13);
        CREATE INDEX IF NOT EXISTS idx_book_authors_author ON book_authors(author_id);
        CREATE INDEX IF NOT EXISTS idx_copies_book_status ON copies(book_id, status);",
    )
    .map_err(|e| internal("Failed to create catalog tables", e))
}

/// Run migrations from the given version to the current version.
fn migrate_schema(conn: &Connection, from_version: i32) -> StorageResult<()> {
    let mut version = from_version;

    while version < SCHEMA_VERSION {
        match version {
            1 => migrate_v1_to_v2(conn)?,
            _ => {
                return Err(StorageError::Backend(BackendError::MigrationError {
                    message: format!("no migration from schema version {}", version),
                }));
            }
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

/// Migration from v1 to v2: SRU rate limiting and access log tables.
fn migrate_v1_to_v2(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sru_rate_limits (
            ip TEXT PRIMARY KEY,
            request_count INTEGER NOT NULL DEFAULT 1,
            window_start INTEGER NOT NULL,
            last_request INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sru_rate_limits_window
            ON sru_rate_limits(window_start);

        CREATE TABLE IF NOT EXISTS sru_access_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ip TEXT NOT NULL,
            user_agent TEXT,
            operation TEXT,
            query TEXT,
            format TEXT,
            response_time_ms INTEGER,
            http_status INTEGER,
            error_message TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sru_access_log_created
            ON sru_access_log(created_at);",
    )
    .map_err(|e| internal("Failed to create SRU tables", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_schema_initialization() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let tables = table_names(&conn);
        for expected in [
            "authors",
            "book_authors",
            "books",
            "copies",
            "schema_version",
            "sru_access_log",
            "sru_rate_limits",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[test]
    fn test_schema_version() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migration_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        get_schema_version(&conn).unwrap();
        create_schema_v1(&conn).unwrap();
        set_schema_version(&conn, 1).unwrap();
        assert!(!table_names(&conn).contains(&"sru_rate_limits".to_string()));

        initialize_schema(&conn).unwrap();
        assert!(table_names(&conn).contains(&"sru_rate_limits".to_string()));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_copy_status_is_constrained() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO books (title, created_at) VALUES ('x', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO copies (book_id, inventory_number, status) VALUES (1, 'INV-1', 'borrowed')",
            [],
        );
        assert!(result.is_err());
    }
}
