//! CQL to SQL predicate compiler.
//!
//! Walks a parsed CQL tree and produces a single boolean predicate over the
//! `books b` row. Every value that originates in the query, including numbers
//! that were validated and ISBNs that were normalized, is bound as a
//! parameter; only registry column expressions appear in the SQL text.
//!
//! A clause that carries no constraint (for example `dc.title all ""`)
//! compiles to the empty predicate. Boolean nodes with an empty side reduce to
//! the other side, and an empty top-level predicate becomes `1 = 1`.

use biblio_cql::{BooleanOp, Condition, CqlNode, Relation};

use crate::error::{SearchError, SearchResult};
use crate::search::{IndexDescriptor, IndexRegistry, ValueType};
use crate::types::{CopyStatus, normalize_isbn};

use super::query_builder::{SqlFragment, SqlParam, escape_like};

/// Predicate matching every row.
pub const TRUE_PREDICATE: &str = "1 = 1";

/// Predicate matching no row.
pub const FALSE_PREDICATE: &str = "1 = 0";

const AVAILABLE_VALUES: &[&str] = &["true", "yes", "1", "available", "disponibile"];
const UNAVAILABLE_VALUES: &[&str] = &["false", "no", "0", "unavailable", "non_disponibile"];

/// Compiles CQL trees into SQL predicates.
pub struct QueryCompiler<'r> {
    registry: &'r IndexRegistry,
    strict_indexes: bool,
    params: Vec<SqlParam>,
}

impl<'r> QueryCompiler<'r> {
    /// Creates a compiler over the given registry.
    ///
    /// With `strict_indexes`, a query naming an index that is not in the
    /// registry fails with [`SearchError::UnsupportedIndex`] instead of
    /// searching `cql.anywhere`.
    pub fn new(registry: &'r IndexRegistry, strict_indexes: bool) -> Self {
        Self {
            registry,
            strict_indexes,
            params: Vec::new(),
        }
    }

    /// Compiles a query into a predicate and its parameters.
    pub fn compile(mut self, ast: &CqlNode) -> SearchResult<SqlFragment> {
        let sql = self.compile_node(ast)?;
        let sql = if sql.is_empty() {
            TRUE_PREDICATE.to_string()
        } else {
            sql
        };
        Ok(SqlFragment::with_params(sql, self.params))
    }

    /// Resolves the index of a condition, honouring strict mode.
    pub fn resolve_index(&self, condition: &Condition) -> SearchResult<&'r IndexDescriptor> {
        let resolution = self.registry.resolve(&condition.index);
        if resolution.fallback {
            if self.strict_indexes && condition.explicit_index {
                return Err(SearchError::UnsupportedIndex {
                    index: condition.index.clone(),
                });
            }
            tracing::debug!(
                index = %condition.index,
                "Unknown index, searching {}",
                resolution.descriptor.qualified_name()
            );
        }
        Ok(resolution.descriptor)
    }

    /// Builds the term browse query for a scan clause.
    ///
    /// Distinct terms of the resolved index that start with the condition
    /// value are returned in ascending order with their record counts.
    pub fn compile_scan(
        mut self,
        condition: &Condition,
        maximum_terms: usize,
    ) -> SearchResult<SqlFragment> {
        let descriptor = self.resolve_index(condition)?;
        let source = descriptor.scan;

        let prefix = match descriptor.value_type {
            ValueType::Isbn => normalize_isbn(&condition.value),
            ValueType::Availability => condition.value.trim().to_lowercase(),
            _ => condition.value.trim().to_string(),
        };

        let pattern = self.bind(SqlParam::string(format!("{}%", escape_like(&prefix))));
        let limit = self.bind(SqlParam::integer(maximum_terms as i64));

        let sql = format!(
            "SELECT {term} AS term, {count} AS frequency FROM {from} \
             WHERE {term} IS NOT NULL AND {term} LIKE {pattern} ESCAPE '\\' \
             GROUP BY {term} ORDER BY {term} ASC LIMIT {limit}",
            term = source.term,
            count = source.count,
            from = source.from,
            pattern = pattern,
            limit = limit,
        );

        Ok(SqlFragment::with_params(sql, self.params))
    }

    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    fn compile_node(&mut self, node: &CqlNode) -> SearchResult<String> {
        match node {
            CqlNode::Boolean { op, left, right } => {
                let left = self.compile_node(left)?;
                let right = self.compile_node(right)?;
                Ok(combine(*op, left, right))
            }
            CqlNode::Not { operand } => {
                let inner = self.compile_node(operand)?;
                if inner.is_empty() {
                    Ok(FALSE_PREDICATE.to_string())
                } else {
                    // Nullable columns make the operand three-valued.
                    Ok(format!("NOT COALESCE(({}), 0)", inner))
                }
            }
            CqlNode::Condition(condition) => self.compile_condition(condition),
        }
    }

    fn compile_condition(&mut self, condition: &Condition) -> SearchResult<String> {
        let descriptor = self.resolve_index(condition)?;

        Ok(match descriptor.value_type {
            ValueType::Text => self.text_clause(descriptor.columns, condition),
            ValueType::Numeric => self.numeric_clause(descriptor.columns, condition),
            ValueType::Isbn => self.isbn_clause(descriptor.columns, condition),
            ValueType::Availability => self.availability_clause(condition),
        })
    }

    fn text_clause(&mut self, columns: &[&str], condition: &Condition) -> String {
        let value = condition.value.as_str();

        match condition.relation {
            Relation::Exact => {
                let p = self.bind(SqlParam::string(value));
                join(
                    columns
                        .iter()
                        .map(|col| format!("{} = {} COLLATE NOCASE", col, p)),
                    "OR",
                )
            }
            Relation::NotEq => {
                let p = self.bind(SqlParam::string(format!("%{}%", escape_like(value))));
                join(
                    columns
                        .iter()
                        .map(|col| format!("COALESCE({}, '') NOT LIKE {} ESCAPE '\\'", col, p)),
                    "AND",
                )
            }
            Relation::All | Relation::Any => {
                let joiner = if condition.relation == Relation::All {
                    "AND"
                } else {
                    "OR"
                };
                let clauses: Vec<String> = value
                    .split_whitespace()
                    .map(|term| self.contains_clause(columns, term))
                    .collect();
                join(clauses.into_iter(), joiner)
            }
            _ => {
                let term = value.trim();
                if term.is_empty() {
                    String::new()
                } else {
                    self.contains_clause(columns, term)
                }
            }
        }
    }

    fn contains_clause(&mut self, columns: &[&str], term: &str) -> String {
        let p = self.bind(SqlParam::string(format!("%{}%", escape_like(term))));
        join(
            columns
                .iter()
                .map(|col| format!("{} LIKE {} ESCAPE '\\'", col, p)),
            "OR",
        )
    }

    fn numeric_clause(&mut self, columns: &[&str], condition: &Condition) -> String {
        let Some(number) = parse_number(&condition.value) else {
            return FALSE_PREDICATE.to_string();
        };
        let Some(column) = columns.first() else {
            return FALSE_PREDICATE.to_string();
        };

        let operator = match condition.relation {
            Relation::Lt => "<",
            Relation::Gt => ">",
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::NotEq => "!=",
            _ => "=",
        };

        let p = self.bind(number);
        format!("{} {} {}", column, operator, p)
    }

    fn isbn_clause(&mut self, columns: &[&str], condition: &Condition) -> String {
        let isbn = normalize_isbn(&condition.value);
        if isbn.is_empty() {
            return FALSE_PREDICATE.to_string();
        }

        let p = self.bind(SqlParam::string(isbn));
        if condition.relation == Relation::NotEq {
            let matches = join(
                columns
                    .iter()
                    .map(|col| format!("COALESCE({}, '') = {}", col, p)),
                "OR",
            );
            format!("NOT ({})", matches)
        } else {
            join(columns.iter().map(|col| format!("{} = {}", col, p)), "OR")
        }
    }

    fn availability_clause(&mut self, condition: &Condition) -> String {
        let folded = condition.value.trim().to_lowercase();

        let (status, negate) = if AVAILABLE_VALUES.contains(&folded.as_str()) {
            (CopyStatus::Disponibile.as_str().to_string(), false)
        } else if UNAVAILABLE_VALUES.contains(&folded.as_str()) {
            (CopyStatus::Disponibile.as_str().to_string(), true)
        } else {
            (folded, false)
        };

        let p = self.bind(SqlParam::string(status));
        let exists = format!(
            "EXISTS (SELECT 1 FROM copies c WHERE c.book_id = b.id AND c.status = {})",
            p
        );
        let predicate = if negate {
            format!("NOT {}", exists)
        } else {
            exists
        };

        if condition.relation == Relation::NotEq {
            format!("NOT ({})", predicate)
        } else {
            predicate
        }
    }
}

fn combine(op: BooleanOp, left: String, right: String) -> String {
    if left.is_empty() {
        return right;
    }
    if right.is_empty() {
        return left;
    }
    format!("({}) {} ({})", left, op.as_str(), right)
}

fn join(clauses: impl Iterator<Item = String>, joiner: &str) -> String {
    let clauses: Vec<String> = clauses.filter(|c| !c.is_empty()).collect();
    match clauses.len() {
        0 => String::new(),
        1 => clauses.into_iter().next().unwrap_or_default(),
        _ => format!("({})", clauses.join(&format!(" {} ", joiner))),
    }
}

fn parse_number(value: &str) -> Option<SqlParam> {
    let value = value.trim();
    if let Ok(i) = value.parse::<i64>() {
        return Some(SqlParam::integer(i));
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(SqlParam::float)
}
