// Integration tests for the compiled grammar artifact and conflict table

use typecast::grammar::export::{language, GrammarBuilder, GRAMMAR_NAME};
use typecast::grammar::precedence::{
    ConflictPoint, ConflictTable, GrammarError, OperatorClass, Resolution,
};
use typecast::parser::parse::{parse, parse_with};
use typecast::syntax::node::{NodeKind, UnOp};

#[test]
fn test_language_has_stable_name() {
    assert_eq!(language().name, GRAMMAR_NAME);
    assert_eq!(language().name, "typecast");
}

#[test]
fn test_node_schema_contract() {
    let cast = language()
        .node_schema
        .iter()
        .find(|shape| shape.node == "cast_expression")
        .expect("cast node shape is exported");
    assert_eq!(cast.fields, &["type", "value"]);

    let json = language().to_json();
    assert!(json.contains("\"cast_expression\""));
    assert!(json.contains("\"type\""));
    assert!(json.contains("\"value\""));
}

#[test]
fn test_conflict_table_is_complete() {
    // Every pair of conflicting interpretations has exactly one winner.
    let table = &language().conflicts;
    for point in ConflictPoint::UNIVERSE {
        // resolve() is total on a built table.
        let _ = table.resolve(point);
    }
}

#[test]
fn test_incomplete_table_fails_at_build_time() {
    let mut rules = ConflictTable::default_rules();
    rules.retain(|(point, _)| {
        *point != ConflictPoint::Infix(OperatorClass::Additive)
    });
    let err = ConflictTable::build(rules).unwrap_err();
    assert_eq!(
        err,
        GrammarError::MissingConflict {
            point: ConflictPoint::Infix(OperatorClass::Additive)
        }
    );
}

#[test]
fn test_duplicated_entry_fails_at_build_time() {
    let mut rules = ConflictTable::default_rules();
    rules.push((ConflictPoint::ParenCall, Resolution::PreferCast));
    assert!(matches!(
        ConflictTable::build(rules),
        Err(GrammarError::DuplicateConflict { .. })
    ));
}

#[test]
fn test_operator_resolution_is_configurable() {
    // The default policy reads `(a)*b` as multiplication.
    let default_tree = parse("(a)*b;");
    let expr = &default_tree.statements()[0].children[0];
    assert!(matches!(expr.kind, NodeKind::BinaryExpression(_)));

    // A grammar that prefers casts in the multiplicative position reads
    // the same input as a cast of a dereference.
    let grammar = GrammarBuilder::new()
        .resolve_infix(OperatorClass::Multiplicative, Resolution::PreferCast)
        .build()
        .unwrap();
    let tree = parse_with(&grammar, "(a)*b;");
    let expr = &tree.statements()[0].children[0];
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    assert!(matches!(
        expr.field("value").unwrap().kind,
        NodeKind::UnaryExpression(UnOp::Deref)
    ));
}

#[test]
fn test_dynamic_resolution_values_break_without_scanner() {
    // Unequal dynamic precedence values decide the conflict directly.
    let grammar = GrammarBuilder::new()
        .resolve_infix(
            OperatorClass::AddressOf,
            Resolution::Dynamic { cast: 1, expression: 0 },
        )
        .build()
        .unwrap();
    // Even a plain name now casts in the address-of position.
    let tree = parse_with(&grammar, "(a)&b;");
    assert!(matches!(
        tree.statements()[0].children[0].kind,
        NodeKind::CastExpression
    ));
}

#[test]
fn test_default_and_custom_grammars_are_independent() {
    let custom = GrammarBuilder::new()
        .resolve_infix(OperatorClass::Additive, Resolution::PreferCast)
        .build()
        .unwrap();

    // The custom grammar flips `(T)-y`; the shared default is untouched.
    let custom_expr_kind = parse_with(&custom, "(T)-y;").statements()[0].children[0]
        .kind
        .clone();
    assert!(matches!(custom_expr_kind, NodeKind::CastExpression));

    let default_tree = parse("(T)-y;");
    let default_expr = &default_tree.statements()[0].children[0];
    assert!(matches!(default_expr.kind, NodeKind::BinaryExpression(_)));
}
