//! Cast-disambiguation rule: cast vs. parenthesized expression vs. call.
//!
//! Given a parenthesized candidate and the one token following the closing
//! parenthesis, commit to exactly one interpretation. No symbol table is
//! consulted; the decision uses the candidate's confidence, the lexical
//! class of the follow token, the conflict table, and (for dynamic ties)
//! the external scanner hook. Ambiguity is never an error: every input
//! resolves deterministically to one of the three outcomes.

use super::precedence::{ConflictPoint, ConflictTable, OperatorClass, Resolution};
use super::scanner::{self, ScanHint, ScannerState};
use super::token::TokenKind;
use super::type_expr::{Confidence, TypeCandidate};
use crate::syntax::node::SyntaxNode;

/// The three interpretations of `( ... ) ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// A type being cast onto the following operand.
    Cast,
    /// An ordinary parenthesized sub-expression.
    ParenExpr,
    /// A parenthesized callee applied to an argument list.
    Call,
}

/// Operator class of an ambiguous follow token, when it has one.
///
/// These are exactly the tokens that both start a unary operand and
/// continue an enclosing expression in infix position.
pub fn ambiguous_class(kind: &TokenKind) -> Option<OperatorClass> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some(OperatorClass::Additive),
        TokenKind::Star => Some(OperatorClass::Multiplicative),
        TokenKind::Amp => Some(OperatorClass::AddressOf),
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            Some(OperatorClass::IncrementDecrement)
        }
        _ => None,
    }
}

/// Decide the interpretation of a parenthesized candidate.
///
/// * `candidate`: the type shape matched between the parentheses.
/// * `inner`: a previously recognized node for the parenthesized content,
///   when one exists (incremental reuse); a call-shaped or operator-shaped
///   inner node vetoes the cast interpretation outright.
/// * `follow`: the token immediately after the closing parenthesis.
pub fn disambiguate(
    candidate: &TypeCandidate,
    inner: Option<&SyntaxNode>,
    follow: &TokenKind,
    table: &ConflictTable,
    state: &mut ScannerState,
) -> CastOutcome {
    // Structural veto: already-disambiguated substructure is never
    // reinterpreted as a type.
    if inner.is_some_and(SyntaxNode::is_expression_shaped) {
        return if matches!(follow, TokenKind::LParen) {
            CastOutcome::Call
        } else {
            CastOutcome::ParenExpr
        };
    }

    match candidate.confidence {
        Confidence::High => {
            // An unambiguous type followed by anything that can start a
            // unary operand is a cast. Any other follow token means the
            // parenthesis cannot be a cast here; the caller falls back.
            if follow.starts_operand() {
                CastOutcome::Cast
            } else {
                CastOutcome::ParenExpr
            }
        }
        Confidence::Low => {
            let point = if matches!(follow, TokenKind::LParen) {
                ConflictPoint::ParenCall
            } else if let Some(class) = ambiguous_class(follow) {
                ConflictPoint::Infix(class)
            } else if follow.starts_operand() {
                ConflictPoint::ParenOperand
            } else {
                // The follow token cannot start an operand at all, so no
                // cast reading exists.
                return CastOutcome::ParenExpr;
            };

            match table.resolve(point) {
                Resolution::PreferCast => CastOutcome::Cast,
                Resolution::PreferExpression => expression_outcome(follow),
                Resolution::Dynamic { cast, expression } => {
                    if cast > expression {
                        CastOutcome::Cast
                    } else if expression > cast {
                        expression_outcome(follow)
                    } else {
                        // Tie: one token of lexical-shape lookahead.
                        let name = candidate.named_base().unwrap_or("");
                        match scanner::scan(state, name).hint {
                            ScanHint::TypeLike => CastOutcome::Cast,
                            ScanHint::ExpressionLike => expression_outcome(follow),
                        }
                    }
                }
            }
        }
    }
}

fn expression_outcome(follow: &TokenKind) -> CastOutcome {
    if matches!(follow, TokenKind::LParen) {
        CastOutcome::Call
    } else {
        CastOutcome::ParenExpr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::lexer::Lexer;
    use crate::grammar::token::Span;
    use crate::syntax::node::{BinOp, NodeKind};

    fn table() -> ConflictTable {
        ConflictTable::build(ConflictTable::default_rules()).unwrap()
    }

    fn candidate(source: &str) -> TypeCandidate {
        let tokens = Lexer::new(source).tokenize();
        TypeCandidate::parse(&tokens, 0).unwrap().0
    }

    fn decide(source: &str, follow: TokenKind) -> CastOutcome {
        let mut state = ScannerState::new();
        disambiguate(&candidate(source), None, &follow, &table(), &mut state)
    }

    #[test]
    fn test_keyword_type_before_operand_is_cast() {
        assert_eq!(
            decide("int)", TokenKind::Ident("x".to_string())),
            CastOutcome::Cast
        );
        assert_eq!(decide("int)", TokenKind::IntLiteral(3)), CastOutcome::Cast);
        // `(int)-x` casts a unary expression.
        assert_eq!(decide("int)", TokenKind::Minus), CastOutcome::Cast);
        // `(int)(x)` casts a parenthesized expression.
        assert_eq!(decide("int)", TokenKind::LParen), CastOutcome::Cast);
    }

    #[test]
    fn test_keyword_type_without_operand_is_not_cast() {
        assert_eq!(decide("int)", TokenKind::Semicolon), CastOutcome::ParenExpr);
        assert_eq!(decide("int)", TokenKind::EqEq), CastOutcome::ParenExpr);
    }

    #[test]
    fn test_bare_identifier_before_plain_operand_is_cast() {
        assert_eq!(
            decide("T)", TokenKind::Ident("x".to_string())),
            CastOutcome::Cast
        );
        assert_eq!(decide("T)", TokenKind::IntLiteral(1)), CastOutcome::Cast);
    }

    #[test]
    fn test_bare_identifier_before_infix_operator_is_expression() {
        assert_eq!(decide("a)", TokenKind::Minus), CastOutcome::ParenExpr);
        assert_eq!(decide("a)", TokenKind::Plus), CastOutcome::ParenExpr);
        assert_eq!(decide("a)", TokenKind::Star), CastOutcome::ParenExpr);
        assert_eq!(decide("a)", TokenKind::PlusPlus), CastOutcome::ParenExpr);
    }

    #[test]
    fn test_bare_identifier_before_lparen_is_call() {
        assert_eq!(decide("foo)", TokenKind::LParen), CastOutcome::Call);
    }

    #[test]
    fn test_suffixed_identifier_is_high_confidence_cast() {
        assert_eq!(
            decide("T*)", TokenKind::Ident("p".to_string())),
            CastOutcome::Cast
        );
        // `(T*)(p)` is a cast even though `(` follows: high confidence.
        assert_eq!(decide("T*)", TokenKind::LParen), CastOutcome::Cast);
    }

    #[test]
    fn test_dynamic_tie_consults_scanner() {
        // The address-of position is a dynamic tie in the default table:
        // the scanner's lexical-shape hint decides it.
        assert_eq!(decide("size_t)", TokenKind::Amp), CastOutcome::Cast);
        assert_eq!(decide("a)", TokenKind::Amp), CastOutcome::ParenExpr);
    }

    #[test]
    fn test_structural_veto_blocks_cast() {
        let call_shaped = SyntaxNode::new(
            NodeKind::CallExpression,
            Span::new(1, 6),
            vec![SyntaxNode::leaf(
                NodeKind::Identifier("f".to_string()),
                Span::new(1, 2),
            )],
        );
        let mut state = ScannerState::new();
        // Even a follow token that would otherwise commit a cast cannot
        // override already-recognized call-shaped content.
        let outcome = disambiguate(
            &candidate("T)"),
            Some(&call_shaped),
            &TokenKind::Ident("x".to_string()),
            &table(),
            &mut state,
        );
        assert_eq!(outcome, CastOutcome::ParenExpr);

        let binary_shaped = SyntaxNode::new(
            NodeKind::BinaryExpression(BinOp::Add),
            Span::new(1, 6),
            Vec::new(),
        );
        let outcome = disambiguate(
            &candidate("T)"),
            Some(&binary_shaped),
            &TokenKind::LParen,
            &table(),
            &mut state,
        );
        assert_eq!(outcome, CastOutcome::Call);
    }

    #[test]
    fn test_every_input_resolves_to_exactly_one_outcome() {
        // Determinism: repeated decisions with fresh state agree.
        for _ in 0..3 {
            assert_eq!(decide("a)", TokenKind::Minus), CastOutcome::ParenExpr);
            assert_eq!(
                decide("T)", TokenKind::Ident("x".to_string())),
                CastOutcome::Cast
            );
        }
    }
}
