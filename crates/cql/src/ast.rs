//! CQL abstract syntax tree.

use std::fmt;

/// Boolean operators joining two sub-queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
}

impl BooleanOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOp::And => "AND",
            BooleanOp::Or => "OR",
        }
    }
}

/// Relations supported between an index and a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `<>`
    NotEq,
    /// `==` or `exact`
    Exact,
    /// `all`
    All,
    /// `any`
    Any,
}

impl Relation {
    /// Parses a relation token value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "=" => Some(Relation::Eq),
            "<" => Some(Relation::Lt),
            ">" => Some(Relation::Gt),
            "<=" => Some(Relation::Le),
            ">=" => Some(Relation::Ge),
            "<>" => Some(Relation::NotEq),
            "==" | "exact" => Some(Relation::Exact),
            "all" => Some(Relation::All),
            "any" => Some(Relation::Any),
            _ => None,
        }
    }

    /// Returns the canonical CQL spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Eq => "=",
            Relation::Lt => "<",
            Relation::Gt => ">",
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::NotEq => "<>",
            Relation::Exact => "exact",
            Relation::All => "all",
            Relation::Any => "any",
        }
    }

    /// All supported relations, in the order explain advertises them.
    pub fn all() -> &'static [Relation] {
        &[
            Relation::Eq,
            Relation::Lt,
            Relation::Gt,
            Relation::Le,
            Relation::Ge,
            Relation::NotEq,
            Relation::Exact,
            Relation::All,
            Relation::Any,
        ]
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search clause: `index relation value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Lower-cased index name.
    pub index: String,
    pub relation: Relation,
    pub value: String,
    /// False when the clause was a bare term and the index was implied.
    pub explicit_index: bool,
}

/// A node of the parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CqlNode {
    Boolean {
        op: BooleanOp,
        left: Box<CqlNode>,
        right: Box<CqlNode>,
    },
    Not {
        operand: Box<CqlNode>,
    },
    Condition(Condition),
}

impl CqlNode {
    /// Returns the condition if this node is a single search clause.
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            CqlNode::Condition(condition) => Some(condition),
            _ => None,
        }
    }
}

impl fmt::Display for CqlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlNode::Boolean { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            CqlNode::Not { operand } => write!(f, "NOT {}", operand),
            CqlNode::Condition(c) => write!(f, "{} {} \"{}\"", c.index, c.relation, c.value),
        }
    }
}
