//! Catalog search, scan and import for SQLite.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params, params_from_iter};

use crate::core::CatalogStore;
use crate::error::StorageResult;
use crate::search::registry;
use crate::types::{
    CatalogQuery, CatalogRecord, CopyRecord, CopyStatus, ScanRequest, ScanTerm, SearchOutcome,
    normalize_isbn,
};

use super::SqliteBackend;
use super::search::{QueryCompiler, SqlParam, build_order_by};

const BOOK_COLUMNS: &str = "b.id, b.title, b.subtitle, b.publisher, b.year, b.isbn10, b.isbn13, \
     b.ean, b.language, b.pages, b.dimensions, b.description, b.keywords, b.dewey_code, \
     b.shelf, b.level, b.created_at";

#[async_trait]
impl CatalogStore for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn search(&self, query: &CatalogQuery) -> StorageResult<SearchOutcome> {
        let predicate =
            QueryCompiler::new(registry(), query.strict_indexes).compile(&query.ast)?;

        let conn = self.get_connection()?;

        let count_sql = format!("SELECT COUNT(*) FROM books b WHERE {}", predicate.sql);
        let total: i64 = conn.query_row(
            &count_sql,
            params_from_iter(predicate.params.iter()),
            |row| row.get(0),
        )?;
        let total = total.max(0) as usize;

        if query.limit == 0 || query.offset >= total {
            return Ok(SearchOutcome {
                total,
                records: Vec::new(),
            });
        }

        let mut page = predicate;
        let limit = page.add_param(SqlParam::integer(query.limit as i64));
        let offset = page.add_param(SqlParam::integer(query.offset as i64));
        let sql = format!(
            "SELECT {} FROM books b WHERE {} {} LIMIT {} OFFSET {}",
            BOOK_COLUMNS,
            page.sql,
            build_order_by(&query.sort),
            limit,
            offset
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut records = stmt
            .query_map(params_from_iter(page.params.iter()), row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        attach_authors(&conn, &mut records)?;
        attach_copies(&conn, &mut records)?;

        tracing::debug!(
            total,
            returned = records.len(),
            offset = query.offset,
            "Catalog search complete"
        );

        Ok(SearchOutcome { total, records })
    }

    async fn scan(&self, request: &ScanRequest) -> StorageResult<Vec<ScanTerm>> {
        let fragment = QueryCompiler::new(registry(), request.strict_indexes)
            .compile_scan(&request.condition, request.maximum_terms)?;

        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&fragment.sql)?;
        let terms = stmt
            .query_map(params_from_iter(fragment.params.iter()), |row| {
                let frequency: i64 = row.get(1)?;
                Ok(ScanTerm {
                    value: row.get(0)?,
                    frequency: frequency.max(0) as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(terms)
    }

    async fn count_records(&self) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl SqliteBackend {
    /// Inserts records with their authors and copies in one transaction.
    ///
    /// Records with a positive `id` keep it; others get a fresh id. ISBNs are
    /// stored normalized. Returns the number of records inserted.
    pub fn import_records(&self, records: &[CatalogRecord]) -> StorageResult<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        for record in records {
            insert_record(&tx, record)?;
        }
        tx.commit()?;

        tracing::info!(count = records.len(), "Imported catalog records");
        Ok(records.len())
    }
}

fn insert_record(conn: &Connection, record: &CatalogRecord) -> StorageResult<i64> {
    let id = (record.id > 0).then_some(record.id);
    let created_at = record.created_at.unwrap_or_else(Utc::now).to_rfc3339();
    let isbn10 = stored_isbn(&record.isbn10);
    let isbn13 = stored_isbn(&record.isbn13);

    conn.execute(
        "INSERT INTO books (id, title, subtitle, publisher, year, isbn10, isbn13, ean, language,
                            pages, dimensions, description, keywords, dewey_code, shelf, level,
                            created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            id,
            record.title,
            record.subtitle,
            record.publisher,
            record.year,
            isbn10,
            isbn13,
            record.ean,
            record.language,
            record.pages,
            record.dimensions,
            record.description,
            record.keywords,
            record.dewey_code,
            record.shelf,
            record.level,
            created_at,
        ],
    )?;
    let book_id = conn.last_insert_rowid();

    for (position, name) in record.authors.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        conn.execute("INSERT OR IGNORE INTO authors (name) VALUES (?1)", [name])?;
        let author_id: i64 =
            conn.query_row("SELECT id FROM authors WHERE name = ?1", [name], |row| {
                row.get(0)
            })?;
        conn.execute(
            "INSERT OR IGNORE INTO book_authors (book_id, author_id, position) VALUES (?1, ?2, ?3)",
            params![book_id, author_id, position as i64],
        )?;
    }

    for copy in &record.copies {
        conn.execute(
            "INSERT INTO copies (book_id, inventory_number, status, notes) VALUES (?1, ?2, ?3, ?4)",
            params![book_id, copy.inventory_number, copy.status.as_str(), copy.notes],
        )?;
    }

    Ok(book_id)
}

fn stored_isbn(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(normalize_isbn)
        .filter(|isbn| !isbn.is_empty())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CatalogRecord> {
    let created_at: Option<String> = row.get(16)?;
    Ok(CatalogRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        subtitle: row.get(2)?,
        authors: Vec::new(),
        publisher: row.get(3)?,
        year: row.get(4)?,
        isbn10: row.get(5)?,
        isbn13: row.get(6)?,
        ean: row.get(7)?,
        language: row.get(8)?,
        pages: row.get(9)?,
        dimensions: row.get(10)?,
        description: row.get(11)?,
        keywords: row.get(12)?,
        dewey_code: row.get(13)?,
        shelf: row.get(14)?,
        level: row.get(15)?,
        created_at: created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        copies: Vec::new(),
    })
}

fn in_list(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loads authors for every record with one query.
fn attach_authors(conn: &Connection, records: &mut [CatalogRecord]) -> StorageResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let sql = format!(
        "SELECT ba.book_id, a.name FROM book_authors ba JOIN authors a ON a.id = ba.author_id \
         WHERE ba.book_id IN ({}) ORDER BY ba.book_id, ba.position",
        in_list(ids.len())
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut by_book: HashMap<i64, Vec<String>> = HashMap::new();
    for row in rows {
        let (book_id, name) = row?;
        by_book.entry(book_id).or_default().push(name);
    }

    for record in records.iter_mut() {
        if let Some(authors) = by_book.remove(&record.id) {
            record.authors = authors;
        }
    }

    Ok(())
}

/// Loads copies for every record with one query.
fn attach_copies(conn: &Connection, records: &mut [CatalogRecord]) -> StorageResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let sql = format!(
        "SELECT book_id, inventory_number, status, notes FROM copies \
         WHERE book_id IN ({}) ORDER BY book_id, inventory_number",
        in_list(ids.len())
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
        let status: String = row.get(2)?;
        let status = status.parse::<CopyStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
        })?;
        Ok((
            row.get::<_, i64>(0)?,
            CopyRecord {
                inventory_number: row.get(1)?,
                status,
                notes: row.get(3)?,
            },
        ))
    })?;

    let mut by_book: HashMap<i64, Vec<CopyRecord>> = HashMap::new();
    for row in rows {
        let (book_id, copy) = row?;
        by_book.entry(book_id).or_default().push(copy);
    }

    for record in records.iter_mut() {
        if let Some(copies) = by_book.remove(&record.id) {
            record.copies = copies;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_list() {
        assert_eq!(in_list(1), "?1");
        assert_eq!(in_list(3), "?1, ?2, ?3");
    }

    #[test]
    fn test_stored_isbn() {
        assert_eq!(
            stored_isbn(&Some("978-0-14-243724-7".to_string())).as_deref(),
            Some("9780142437247")
        );
        assert_eq!(stored_isbn(&Some("--".to_string())), None);
        assert_eq!(stored_isbn(&None), None);
    }
}
