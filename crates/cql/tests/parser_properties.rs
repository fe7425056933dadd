//! Property-style checks for the CQL parser over generated query shapes.

use biblio_cql::{
    BooleanOp, CqlError, CqlNode, MAX_DEPTH, MAX_QUERY_LENGTH, MAX_TOKENS, Relation, parse,
};

const INDEXES: &[&str] = &["dc.title", "dc.creator", "bath.isbn", "library.available", "rec.id"];
const RELATIONS: &[&str] = &["=", "<", ">", "<=", ">=", "<>", "==", "exact", "all", "any"];
const TERMS: &[&str] = &["moby", "\"moby dick\"", "'it\\'s'", "1851", "9780142437247"];

/// Builds a balanced expression of the given depth by alternating operators.
fn balanced(depth: usize, seed: usize) -> String {
    let index = INDEXES[seed % INDEXES.len()];
    let relation = RELATIONS[seed % RELATIONS.len()];
    let term = TERMS[seed % TERMS.len()];
    let leaf = format!("{} {} {}", index, relation, term);

    if depth == 0 {
        return leaf;
    }

    let inner = balanced(depth - 1, seed + 1);
    match seed % 4 {
        0 => format!("({}) AND {}", inner, leaf),
        1 => format!("{} OR ({})", leaf, inner),
        2 => format!("NOT ({})", inner),
        _ => format!("(({}))", inner),
    }
}

#[test]
fn balanced_expressions_always_parse() {
    for depth in 0..8 {
        for seed in 0..40 {
            let query = balanced(depth, seed);
            assert!(
                parse(&query).is_ok(),
                "balanced query failed to parse: {}",
                query
            );
        }
    }
}

#[test]
fn every_supported_relation_parses() {
    for relation in RELATIONS {
        let query = format!("dc.title {} x", relation);
        let ast = parse(&query).unwrap();
        let condition = ast.as_condition().unwrap();
        assert_eq!(Relation::parse(relation), Some(condition.relation));
    }
}

#[test]
fn long_chain_is_left_associative() {
    let ast = parse("a AND b AND c").unwrap();
    let CqlNode::Boolean { op, left, right } = ast else {
        panic!("expected boolean");
    };
    assert_eq!(op, BooleanOp::And);
    assert!(matches!(*left, CqlNode::Boolean { .. }));
    assert_eq!(right.as_condition().unwrap().value, "c");
}

#[test]
fn bounds_are_enforced() {
    let long = format!("dc.title = \"{}\"", "x".repeat(MAX_QUERY_LENGTH));
    assert!(matches!(parse(&long), Err(CqlError::InvalidSyntax { .. })));

    // 251 terms joined by 250 ORs: 501 tokens, still under the length cap.
    let many = vec!["a"; MAX_TOKENS / 2 + 1].join(" OR ");
    assert!(many.chars().count() <= MAX_QUERY_LENGTH);
    assert!(matches!(parse(&many), Err(CqlError::InvalidSyntax { .. })));

    let deep = format!(
        "{}a{}",
        "(".repeat(MAX_DEPTH + 1),
        ")".repeat(MAX_DEPTH + 1)
    );
    assert!(matches!(parse(&deep), Err(CqlError::InvalidSyntax { .. })));
}

#[test]
fn unbalanced_parentheses_fail() {
    for query in ["(a", "((a)", "a)", "(a))", "()", "(a AND (b OR c)"] {
        assert!(parse(query).is_err(), "query should fail: {}", query);
    }
}
