//! Index registry.
//!
//! The registry is the fixed vocabulary of CQL indexes the catalog can be
//! searched by. Each [`IndexDescriptor`] names the context set and index, the
//! kind of value it holds and the SQL column expressions it maps to. Column
//! expressions are the only SQL text that is ever spliced into a compiled
//! query; every value supplied by a client is bound as a parameter.
//!
//! Lookup is case-insensitive and accepts either the qualified name
//! (`dc.title`) or any alias (`title`, `bath.title`).

use std::collections::HashMap;
use std::sync::LazyLock;

/// Display-string expression for a book's authors, in position order.
pub const AUTHORS_EXPR: &str = "(SELECT GROUP_CONCAT(name, ', ') FROM \
     (SELECT a.name AS name FROM book_authors ba JOIN authors a ON a.id = ba.author_id \
     WHERE ba.book_id = b.id ORDER BY ba.position))";

/// How values of an index are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Substring and equality matching over one or more text columns.
    Text,
    /// Numeric comparison against a single column.
    Numeric,
    /// Normalized ISBN equality against the ISBN-10 and ISBN-13 columns.
    Isbn,
    /// Presence of copies with a given circulation status.
    Availability,
}

impl ValueType {
    /// Name used in explain responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Numeric => "numeric",
            ValueType::Isbn => "isbn",
            ValueType::Availability => "availability",
        }
    }
}

/// Where scan terms for an index come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSource {
    /// FROM clause.
    pub from: &'static str,
    /// Expression yielding the term text.
    pub term: &'static str,
    /// Aggregate yielding the number of records per term.
    pub count: &'static str,
}

const BOOK_TITLES: ScanSource = ScanSource {
    from: "books b",
    term: "b.title",
    count: "COUNT(*)",
};

/// A searchable index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    /// Context set (`dc`, `bath`, `cql`, ...).
    pub set: &'static str,
    /// Index name within the set.
    pub name: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Alternative names accepted in queries.
    pub aliases: &'static [&'static str],
    pub value_type: ValueType,
    /// SQL column expressions over the `books b` row.
    pub columns: &'static [&'static str],
    pub scan: ScanSource,
}

impl IndexDescriptor {
    /// Returns `set.name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.set, self.name)
    }
}

static INDEXES: &[IndexDescriptor] = &[
    IndexDescriptor {
        set: "cql",
        name: "anywhere",
        title: "Anywhere",
        aliases: &["cql.serverchoice", "anywhere"],
        value_type: ValueType::Text,
        columns: &[
            "b.title",
            "b.subtitle",
            AUTHORS_EXPR,
            "b.publisher",
            "b.description",
            "b.keywords",
        ],
        scan: BOOK_TITLES,
    },
    IndexDescriptor {
        set: "dc",
        name: "title",
        title: "Title",
        aliases: &["title", "bath.title"],
        value_type: ValueType::Text,
        columns: &["b.title", "b.subtitle"],
        scan: BOOK_TITLES,
    },
    IndexDescriptor {
        set: "dc",
        name: "creator",
        title: "Author",
        aliases: &["dc.author", "author", "creator", "bath.author", "bath.name"],
        value_type: ValueType::Text,
        columns: &[AUTHORS_EXPR],
        scan: ScanSource {
            from: "authors a JOIN book_authors ba ON ba.author_id = a.id",
            term: "a.name",
            count: "COUNT(DISTINCT ba.book_id)",
        },
    },
    IndexDescriptor {
        set: "dc",
        name: "publisher",
        title: "Publisher",
        aliases: &["publisher"],
        value_type: ValueType::Text,
        columns: &["b.publisher"],
        scan: ScanSource {
            from: "books b",
            term: "b.publisher",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "dc",
        name: "subject",
        title: "Subject",
        aliases: &["subject", "bath.subject"],
        value_type: ValueType::Text,
        columns: &["b.keywords"],
        scan: ScanSource {
            from: "books b",
            term: "b.keywords",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "dc",
        name: "description",
        title: "Description",
        aliases: &[],
        value_type: ValueType::Text,
        columns: &["b.description"],
        scan: ScanSource {
            from: "books b",
            term: "b.description",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "dc",
        name: "language",
        title: "Language",
        aliases: &["language"],
        value_type: ValueType::Text,
        columns: &["b.language"],
        scan: ScanSource {
            from: "books b",
            term: "b.language",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "dc",
        name: "date",
        title: "Publication year",
        aliases: &["date", "year"],
        value_type: ValueType::Numeric,
        columns: &["b.year"],
        scan: ScanSource {
            from: "books b",
            term: "CAST(b.year AS TEXT)",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "bath",
        name: "isbn",
        title: "ISBN",
        aliases: &["isbn", "dc.identifier"],
        value_type: ValueType::Isbn,
        columns: &["b.isbn10", "b.isbn13"],
        scan: ScanSource {
            from: "books b",
            term: "b.isbn13",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "library",
        name: "dewey",
        title: "Dewey classification",
        aliases: &["dewey"],
        value_type: ValueType::Text,
        columns: &["b.dewey_code"],
        scan: ScanSource {
            from: "books b",
            term: "b.dewey_code",
            count: "COUNT(*)",
        },
    },
    IndexDescriptor {
        set: "library",
        name: "available",
        title: "Availability",
        aliases: &["available"],
        value_type: ValueType::Availability,
        columns: &[],
        scan: ScanSource {
            from: "copies c",
            term: "c.status",
            count: "COUNT(DISTINCT c.book_id)",
        },
    },
    IndexDescriptor {
        set: "rec",
        name: "id",
        title: "Record identifier",
        aliases: &[],
        value_type: ValueType::Numeric,
        columns: &["b.id"],
        scan: ScanSource {
            from: "books b",
            term: "CAST(b.id AS TEXT)",
            count: "COUNT(*)",
        },
    },
];

/// Name every unresolved or implicit index falls back to.
pub const DEFAULT_INDEX_NAME: &str = "cql.anywhere";

/// Lookup table over the static index vocabulary.
#[derive(Debug)]
pub struct IndexRegistry {
    indexes: &'static [IndexDescriptor],
    by_name: HashMap<String, usize>,
}

static REGISTRY: LazyLock<IndexRegistry> = LazyLock::new(|| IndexRegistry::new(INDEXES));

/// Returns the process-wide registry.
pub fn registry() -> &'static IndexRegistry {
    &REGISTRY
}

/// How an index name was resolved.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub descriptor: &'a IndexDescriptor,
    /// True when the name was unknown and the default index was used instead.
    pub fallback: bool,
}

impl IndexRegistry {
    fn new(indexes: &'static [IndexDescriptor]) -> Self {
        let mut by_name = HashMap::new();
        for (i, descriptor) in indexes.iter().enumerate() {
            by_name.insert(descriptor.qualified_name(), i);
            for alias in descriptor.aliases {
                by_name.insert(alias.to_ascii_lowercase(), i);
            }
        }
        Self { indexes, by_name }
    }

    /// Looks up an index by qualified name or alias.
    pub fn get(&self, name: &str) -> Option<&IndexDescriptor> {
        self.by_name
            .get(&name.trim().to_ascii_lowercase())
            .map(|&i| &self.indexes[i])
    }

    /// The catch-all `cql.anywhere` index.
    pub fn default_index(&self) -> &IndexDescriptor {
        self.get(DEFAULT_INDEX_NAME)
            .unwrap_or(&self.indexes[0])
    }

    /// Resolves a name, degrading unknown names to the default index.
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        match self.get(name) {
            Some(descriptor) => Resolution {
                descriptor,
                fallback: false,
            },
            None => Resolution {
                descriptor: self.default_index(),
                fallback: true,
            },
        }
    }

    /// All indexes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.indexes.iter()
    }

    /// Indexes grouped by context set, sets in first-seen order.
    pub fn by_set(&self) -> Vec<(&'static str, Vec<&IndexDescriptor>)> {
        let mut groups: Vec<(&'static str, Vec<&IndexDescriptor>)> = Vec::new();
        for descriptor in self.indexes {
            match groups.iter_mut().find(|(set, _)| *set == descriptor.set) {
                Some((_, members)) => members.push(descriptor),
                None => groups.push((descriptor.set, vec![descriptor])),
            }
        }
        groups
    }

    /// Number of indexes.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Returns true if the registry has no indexes.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
