//! Catalog fixtures for endpoint tests.

#![allow(dead_code)]

use biblio_persistence::types::{CatalogRecord, CopyRecord, CopyStatus};

fn book(id: i64, title: &str, authors: &[&str], year: i32) -> CatalogRecord {
    let mut record = CatalogRecord::new(title);
    record.id = id;
    record.authors = authors.iter().map(|a| a.to_string()).collect();
    record.year = Some(year);
    record.language = Some("eng".to_string());
    record
}

/// Four records, three of them with "harr" or "moby" in the title.
///
/// | id | title | year | copies |
/// |----|-------|------|--------|
/// | 1 | Moby Dick | 1851 | disponibile, prestato |
/// | 2 | Harry Potter and the Philosopher's Stone | 1997 | prestato |
/// | 3 | Harrier Jets | 1985 | none |
/// | 4 | Il nome della rosa | 1980 | disponibile |
pub fn sample_catalog() -> Vec<CatalogRecord> {
    let mut moby = book(1, "Moby Dick", &["Herman Melville"], 1851);
    moby.subtitle = Some("or, The Whale".to_string());
    moby.publisher = Some("Penguin Classics".to_string());
    moby.isbn13 = Some("9780142437247".to_string());
    moby.keywords = Some("whales, sea".to_string());
    moby.shelf = Some("A1".to_string());
    moby.level = Some("2".to_string());
    moby.copies.push(CopyRecord::new("INV-001", CopyStatus::Disponibile));
    moby.copies.push(CopyRecord::new("INV-002", CopyStatus::Prestato));

    let mut potter = book(
        2,
        "Harry Potter and the Philosopher's Stone",
        &["J. K. Rowling"],
        1997,
    );
    potter.publisher = Some("Bloomsbury".to_string());
    potter.copies.push(CopyRecord::new("INV-010", CopyStatus::Prestato));

    let jets = book(3, "Harrier Jets", &["Zed Adams", "Anne Brown"], 1985);

    let mut rosa = book(4, "Il nome della rosa", &["Umberto Eco"], 1980);
    rosa.language = Some("ita".to_string());
    rosa.copies.push(CopyRecord::new("INV-020", CopyStatus::Disponibile));

    vec![moby, potter, jets, rosa]
}
