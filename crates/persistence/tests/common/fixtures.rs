//! Catalog fixtures shared by the integration tests.

#![allow(dead_code)]

use biblio_persistence::backends::sqlite::SqliteBackend;
use biblio_persistence::types::{CatalogRecord, CopyRecord, CopyStatus};

/// Builder for catalog records.
#[derive(Debug, Clone)]
pub struct BookFixture {
    record: CatalogRecord,
}

impl BookFixture {
    /// Creates a fixture with an explicit id.
    pub fn new(id: i64, title: &str) -> Self {
        let mut record = CatalogRecord::new(title);
        record.id = id;
        record.language = Some("eng".to_string());
        Self { record }
    }

    pub fn subtitle(mut self, subtitle: &str) -> Self {
        self.record.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn authors(mut self, authors: &[&str]) -> Self {
        self.record.authors = authors.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn publisher(mut self, publisher: &str, year: i32) -> Self {
        self.record.publisher = Some(publisher.to_string());
        self.record.year = Some(year);
        self
    }

    pub fn isbn10(mut self, isbn: &str) -> Self {
        self.record.isbn10 = Some(isbn.to_string());
        self
    }

    pub fn isbn13(mut self, isbn: &str) -> Self {
        self.record.isbn13 = Some(isbn.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.record.language = Some(language.to_string());
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.record.keywords = Some(keywords.to_string());
        self
    }

    pub fn dewey(mut self, code: &str) -> Self {
        self.record.dewey_code = Some(code.to_string());
        self
    }

    pub fn location(mut self, shelf: &str, level: &str) -> Self {
        self.record.shelf = Some(shelf.to_string());
        self.record.level = Some(level.to_string());
        self
    }

    pub fn copy(mut self, inventory: &str, status: CopyStatus) -> Self {
        self.record.copies.push(CopyRecord::new(inventory, status));
        self
    }

    pub fn build(self) -> CatalogRecord {
        self.record
    }
}

/// Five records covering every index type.
///
/// | id | title | year | copies |
/// |----|-------|------|--------|
/// | 1 | Moby Dick | 1851 | disponibile, prestato |
/// | 2 | Harry Potter and the Philosopher's Stone | 1997 | prestato |
/// | 3 | Harrier Jets | 1985 | none |
/// | 4 | Il nome della rosa | 1980 | disponibile x2 |
/// | 5 | Design Patterns | 1994 | manutenzione |
pub fn sample_catalog() -> Vec<CatalogRecord> {
    vec![
        BookFixture::new(1, "Moby Dick")
            .subtitle("or, The Whale")
            .authors(&["Herman Melville"])
            .publisher("Penguin Classics", 1851)
            .isbn10("0142437247")
            .isbn13("978-0-14-243724-7")
            .keywords("whales, sea, obsession")
            .dewey("813.3")
            .location("A1", "2")
            .copy("INV-001", CopyStatus::Disponibile)
            .copy("INV-002", CopyStatus::Prestato)
            .build(),
        BookFixture::new(2, "Harry Potter and the Philosopher's Stone")
            .authors(&["J. K. Rowling"])
            .publisher("Bloomsbury", 1997)
            .isbn13("9780747532699")
            .keywords("magic, school")
            .dewey("823.914")
            .copy("INV-010", CopyStatus::Prestato)
            .build(),
        BookFixture::new(3, "Harrier Jets")
            .authors(&["Zed Adams", "Anne Brown"])
            .publisher("Aviation Press", 1985)
            .isbn10("0-8044-2957-X")
            .build(),
        BookFixture::new(4, "Il nome della rosa")
            .authors(&["Umberto Eco"])
            .publisher("Bompiani", 1980)
            .isbn13("9788845292613")
            .language("ita")
            .keywords("monastery, mystery")
            .copy("INV-020", CopyStatus::Disponibile)
            .copy("INV-021", CopyStatus::Disponibile)
            .build(),
        BookFixture::new(5, "Design Patterns")
            .subtitle("Elements of Reusable Object-Oriented Software")
            .authors(&["Erich Gamma", "Richard Helm", "Ralph Johnson", "John Vlissides"])
            .publisher("Addison-Wesley", 1994)
            .isbn13("978-0-201-63361-0")
            .keywords("software, 100% objects")
            .copy("INV-030", CopyStatus::Manutenzione)
            .build(),
    ]
}

/// An in-memory backend with the schema initialized.
pub fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

/// An in-memory backend loaded with [`sample_catalog`].
pub fn seeded_backend() -> SqliteBackend {
    let backend = create_backend();
    backend
        .import_records(&sample_catalog())
        .expect("Failed to import sample catalog");
    backend
}
