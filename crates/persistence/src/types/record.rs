//! Bibliographic record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Circulation status of a physical copy.
///
/// The stored values are the Italian status codes used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    /// On the shelf and available for loan.
    #[default]
    Disponibile,
    /// On loan.
    Prestato,
    /// Reserved for a patron.
    Riservato,
    /// Damaged.
    Danneggiato,
    /// Lost.
    Perso,
    /// Under maintenance.
    Manutenzione,
}

impl CopyStatus {
    /// Returns the stored status code.
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Disponibile => "disponibile",
            CopyStatus::Prestato => "prestato",
            CopyStatus::Riservato => "riservato",
            CopyStatus::Danneggiato => "danneggiato",
            CopyStatus::Perso => "perso",
            CopyStatus::Manutenzione => "manutenzione",
        }
    }

    /// All statuses, in storage order.
    pub fn all() -> &'static [CopyStatus] {
        &[
            CopyStatus::Disponibile,
            CopyStatus::Prestato,
            CopyStatus::Riservato,
            CopyStatus::Danneggiato,
            CopyStatus::Perso,
            CopyStatus::Manutenzione,
        ]
    }

    /// Returns true if the copy can be lent.
    pub fn is_available(&self) -> bool {
        matches!(self, CopyStatus::Disponibile)
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status code is not one of [`CopyStatus::all`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown copy status: {0}")]
pub struct UnknownCopyStatus(pub String);

impl FromStr for CopyStatus {
    type Err = UnknownCopyStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_lowercase();
        CopyStatus::all()
            .iter()
            .find(|status| status.as_str() == folded)
            .copied()
            .ok_or_else(|| UnknownCopyStatus(s.to_string()))
    }
}

/// One physical holding of a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRecord {
    /// Inventory number stamped on the copy.
    pub inventory_number: String,
    #[serde(default)]
    pub status: CopyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CopyRecord {
    /// Creates a copy without notes.
    pub fn new(inventory_number: impl Into<String>, status: CopyStatus) -> Self {
        Self {
            inventory_number: inventory_number.into(),
            status,
            notes: None,
        }
    }
}

/// A bibliographic record with its holdings.
///
/// Optional fields are `None` when the catalog has no value; empty strings are
/// never used to mean "missing".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Row identifier. Zero for records not yet stored.
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Authors in display order.
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn10: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    /// ISO 639-2 language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma or semicolon separated subject keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dewey_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub copies: Vec<CopyRecord>,
}

impl CatalogRecord {
    /// Creates a record with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// The first listed author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Keywords split into individual subjects.
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .map(|k| {
                k.split([',', ';'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Shelf and level joined into a single location label.
    pub fn location(&self) -> Option<String> {
        match (non_empty(&self.shelf), non_empty(&self.level)) {
            (Some(shelf), Some(level)) => Some(format!("{} / {}", shelf, level)),
            (Some(shelf), None) => Some(shelf.to_string()),
            (None, Some(level)) => Some(level.to_string()),
            (None, None) => None,
        }
    }

    /// Number of copies currently available.
    pub fn available_copies(&self) -> usize {
        self.copies.iter().filter(|c| c.status.is_available()).count()
    }

    /// The preferred ISBN (ISBN-13 first).
    pub fn isbn(&self) -> Option<&str> {
        non_empty(&self.isbn13).or_else(|| non_empty(&self.isbn10))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Strips an ISBN down to its digits and check character.
///
/// Lower-case `x` is folded to `X`; everything else that is not a digit is
/// dropped.
pub fn normalize_isbn(value: &str) -> String {
    value
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect()
}
