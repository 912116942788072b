// Integration tests for the cast-disambiguation policy

use typecast::parser::parse::parse;
use typecast::syntax::node::{BinOp, NodeKind, SyntaxNode, UnOp};

/// The expression inside the first statement.
fn first_expr(source: &str) -> SyntaxNode {
    let tree = parse(source);
    assert!(
        !tree.has_errors(),
        "unexpected parse errors in {:?}: {:?}",
        source,
        tree.root
    );
    let statements = tree.statements();
    assert_eq!(statements.len(), 1, "expected one statement in {:?}", source);
    statements[0].children[0].clone()
}

#[test]
fn test_keyword_cast() {
    let expr = first_expr("(int)x;");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    let ty = expr.field("type").expect("cast has a type field");
    assert!(matches!(ty.kind, NodeKind::TypeExpression(ref name) if name == "int"));
    let value = expr.field("value").expect("cast has a value field");
    assert!(matches!(value.kind, NodeKind::Identifier(ref name) if name == "x"));
}

#[test]
fn test_keyword_cast_spans() {
    let source = "(int)x;";
    let expr = first_expr(source);
    // The cast covers `(int)x`, the type covers `int`, the value `x`.
    assert_eq!(&source[expr.span.start..expr.span.end], "(int)x");
    let ty = expr.field("type").unwrap();
    assert_eq!(&source[ty.span.start..ty.span.end], "int");
    let value = expr.field("value").unwrap();
    assert_eq!(&source[value.span.start..value.span.end], "x");
}

#[test]
fn test_ambiguous_identifier_cast() {
    // `(T)x` has no infix continuation, so the cast interpretation wins.
    let expr = first_expr("(T)x;");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
}

#[test]
fn test_ambiguous_identifier_before_minus_is_binary() {
    // `(a)-b` reads as binary minus, not a cast of `-b`.
    let expr = first_expr("(a)-b;");
    assert!(matches!(expr.kind, NodeKind::BinaryExpression(BinOp::Sub)));
    assert!(matches!(
        expr.children[0].kind,
        NodeKind::ParenExpression
    ));
}

#[test]
fn test_ambiguous_identifier_before_star_is_multiplication() {
    let expr = first_expr("(a)*b;");
    assert!(matches!(expr.kind, NodeKind::BinaryExpression(BinOp::Mul)));
}

#[test]
fn test_ambiguous_identifier_before_amp_uses_scanner_shape() {
    // Plain name: expression wins.
    let expr = first_expr("(a)&b;");
    assert!(matches!(expr.kind, NodeKind::BinaryExpression(BinOp::BitAnd)));

    // Type-shaped name: cast of an address-of expression.
    let expr = first_expr("(size_t)&x;");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    let value = expr.field("value").unwrap();
    assert!(matches!(
        value.kind,
        NodeKind::UnaryExpression(UnOp::AddrOf)
    ));
}

#[test]
fn test_call_shape_is_never_a_cast() {
    // `(foo)(bar)` is a call on a parenthesized callee.
    let expr = first_expr("(foo)(bar);");
    assert!(matches!(expr.kind, NodeKind::CallExpression));
    let callee = expr.field("callee").unwrap();
    assert!(matches!(callee.kind, NodeKind::ParenExpression));
    assert_eq!(expr.children.len(), 2);
}

#[test]
fn test_pointer_suffix_commits_cast() {
    let expr = first_expr("(T*)p;");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    let ty = expr.field("type").unwrap();
    assert!(matches!(ty.kind, NodeKind::TypeExpression(ref name) if name == "T*"));

    // Even before `(`, which would read as a call for a bare identifier.
    let expr = first_expr("(T*)(p);");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
}

#[test]
fn test_multi_keyword_and_tagged_casts() {
    let expr = first_expr("(unsigned long)x;");
    assert!(matches!(
        expr.field("type").unwrap().kind,
        NodeKind::TypeExpression(ref name) if name == "unsigned long"
    ));

    let expr = first_expr("(struct point)p;");
    assert!(matches!(
        expr.field("type").unwrap().kind,
        NodeKind::TypeExpression(ref name) if name == "struct point"
    ));

    let expr = first_expr("(const char*)s;");
    assert!(matches!(
        expr.field("type").unwrap().kind,
        NodeKind::TypeExpression(ref name) if name == "const char*"
    ));
}

#[test]
fn test_cast_of_unary_operand() {
    // `(int)-x` casts the negation.
    let expr = first_expr("(int)-x;");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    let value = expr.field("value").unwrap();
    assert!(matches!(value.kind, NodeKind::UnaryExpression(UnOp::Neg)));
}

#[test]
fn test_nested_casts() {
    let expr = first_expr("(int)(char)x;");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    let inner = expr.field("value").unwrap();
    assert!(matches!(inner.kind, NodeKind::CastExpression));
}

#[test]
fn test_cast_binds_looser_than_call() {
    // `(int)f(x)` casts the call result.
    let expr = first_expr("(int)f(x);");
    assert!(matches!(expr.kind, NodeKind::CastExpression));
    let value = expr.field("value").unwrap();
    assert!(matches!(value.kind, NodeKind::CallExpression));
}

#[test]
fn test_cast_inside_arithmetic() {
    // `(int)x + y` is addition of a cast, not a cast of an addition.
    let expr = first_expr("(int)x + y;");
    assert!(matches!(expr.kind, NodeKind::BinaryExpression(BinOp::Add)));
    assert!(matches!(
        expr.children[0].kind,
        NodeKind::CastExpression
    ));
}

#[test]
fn test_compound_literal_is_not_a_cast() {
    let expr = first_expr("(struct point){0, 0};");
    assert!(matches!(expr.kind, NodeKind::CompoundLiteral));
    assert!(matches!(
        expr.field("type").unwrap().kind,
        NodeKind::TypeExpression(ref name) if name == "struct point"
    ));
    // Type plus two initializer elements.
    assert_eq!(expr.children.len(), 3);
}

#[test]
fn test_plain_parenthesized_expression() {
    let expr = first_expr("(a + b) * c;");
    assert!(matches!(expr.kind, NodeKind::BinaryExpression(BinOp::Mul)));
    let paren = &expr.children[0];
    assert!(matches!(paren.kind, NodeKind::ParenExpression));
    assert!(matches!(
        paren.field("inner").unwrap().kind,
        NodeKind::BinaryExpression(BinOp::Add)
    ));
}

#[test]
fn test_sizeof_type_and_expression() {
    let expr = first_expr("sizeof(int);");
    assert!(matches!(expr.kind, NodeKind::SizeofExpression));
    assert!(matches!(
        expr.children[0].kind,
        NodeKind::TypeExpression(ref name) if name == "int"
    ));

    // A bare identifier in sizeof parses as an expression operand.
    let expr = first_expr("sizeof(x);");
    assert!(matches!(expr.kind, NodeKind::SizeofExpression));
    assert!(matches!(expr.children[0].kind, NodeKind::ParenExpression));
}

#[test]
fn test_malformed_cast_does_not_poison_the_file() {
    let tree = parse("(int; y = (int)x; (a)-b;");
    let statements = tree.statements();
    assert_eq!(statements.len(), 3);
    assert!(matches!(statements[0].kind, NodeKind::Error));

    // Recovery resumes cleanly: the remaining statements parse as usual.
    assert!(matches!(statements[1].kind, NodeKind::ExpressionStatement));
    assert!(matches!(
        statements[1].children[0].kind,
        NodeKind::AssignExpression(None)
    ));
    assert!(matches!(statements[2].kind, NodeKind::ExpressionStatement));
}

#[test]
fn test_unterminated_parenthesis_is_one_error_node() {
    let tree = parse("(int");
    let statements = tree.statements();
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0].kind, NodeKind::Error));
    assert_eq!(tree.text(&statements[0]), "(int");
}

#[test]
fn test_lexical_garbage_is_recovered_per_statement() {
    let tree = parse("a $ b; (int)x;");
    let statements = tree.statements();
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0].kind, NodeKind::Error));
    assert!(matches!(
        statements[1].children[0].kind,
        NodeKind::CastExpression
    ));
}

#[test]
fn test_repeated_parses_are_deterministic() {
    let source = "(T)x; (a)-b; (foo)(bar); (size_t)&x; (int";
    let first = parse(source);
    for _ in 0..5 {
        assert_eq!(parse(source), first);
    }
}
