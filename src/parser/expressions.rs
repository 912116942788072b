//! Expression parsing: precedence climbing with the cast hook.
//!
//! Binary operators are handled by a shared `parse_binary_expr` method
//! parameterized on `PrecedenceLevel`, which maps tokens to operators and
//! recurses to the next-tighter level.
//!
//! Call hierarchy (loosest to tightest binding):
//!   parse_expression -> parse_assignment -> parse_conditional
//!   -> parse_binary_expr(LogicalOr) -> ... -> parse_binary_expr(Multiplicative)
//!   -> parse_cast -> parse_unary -> parse_postfix -> parse_primary
//!
//! `parse_cast` is where the grammar earns its name: on `(` it attempts the
//! type-expression rule and hands the candidate, the follow token, and the
//! conflict table to the cast-disambiguation rule. A failed or vetoed
//! attempt costs one candidate parse and falls through to ordinary
//! parenthesized-expression/call parsing.

use crate::grammar::cast::{self, CastOutcome};
use crate::grammar::token::{Span, TokenKind};
use crate::grammar::type_expr::{Confidence, TypeCandidate};
use crate::parser::parse::{ParseFault, Parser};
use crate::syntax::node::{BinOp, NodeKind, SyntaxNode, UnOp};

/// C operator precedence levels (loosest to tightest binding).
#[derive(Debug, Clone, Copy)]
enum PrecedenceLevel {
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
}

impl<'g> Parser<'g> {
    /// Parse expression (top-level entry point).
    pub(crate) fn parse_expression(&mut self) -> Result<SyntaxNode, ParseFault> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative) or fall through.
    fn parse_assignment(&mut self) -> Result<SyntaxNode, ParseFault> {
        let lhs = self.parse_conditional()?;

        let op = if self.check(&TokenKind::Eq) {
            None
        } else if let Some(op) = self.compound_assign_op() {
            Some(op)
        } else {
            return Ok(lhs);
        };

        self.advance();
        let rhs = self.parse_assignment()?;
        let span = lhs.span.join(rhs.span);
        Ok(SyntaxNode::new(
            NodeKind::AssignExpression(op),
            span,
            vec![lhs, rhs],
        ))
    }

    fn compound_assign_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            TokenKind::PercentEq => Some(BinOp::Mod),
            _ => None,
        }
    }

    /// Parse ternary: condition ? true_expr : false_expr.
    fn parse_conditional(&mut self) -> Result<SyntaxNode, ParseFault> {
        let cond = self.parse_binary_expr(PrecedenceLevel::LogicalOr)?;

        if self.match_token(&TokenKind::Question) {
            let then_expr = self.parse_expression()?;
            self.expect_token(&TokenKind::Colon, "Expected ':' in conditional expression")?;
            let else_expr = self.parse_conditional()?;
            let span = cond.span.join(else_expr.span);
            return Ok(SyntaxNode::new(
                NodeKind::ConditionalExpression,
                span,
                vec![cond, then_expr, else_expr],
            ));
        }

        Ok(cond)
    }

    /// Map a token to a binary operator at the given precedence level.
    fn token_to_binop(&self, kind: &TokenKind, level: PrecedenceLevel) -> Option<BinOp> {
        match (kind, level) {
            (TokenKind::OrOr, PrecedenceLevel::LogicalOr) => Some(BinOp::Or),
            (TokenKind::AndAnd, PrecedenceLevel::LogicalAnd) => Some(BinOp::And),
            (TokenKind::Pipe, PrecedenceLevel::BitwiseOr) => Some(BinOp::BitOr),
            (TokenKind::Caret, PrecedenceLevel::BitwiseXor) => Some(BinOp::BitXor),
            (TokenKind::Amp, PrecedenceLevel::BitwiseAnd) => Some(BinOp::BitAnd),
            (TokenKind::EqEq, PrecedenceLevel::Equality) => Some(BinOp::Eq),
            (TokenKind::NotEq, PrecedenceLevel::Equality) => Some(BinOp::Ne),
            (TokenKind::Lt, PrecedenceLevel::Relational) => Some(BinOp::Lt),
            (TokenKind::Le, PrecedenceLevel::Relational) => Some(BinOp::Le),
            (TokenKind::Gt, PrecedenceLevel::Relational) => Some(BinOp::Gt),
            (TokenKind::Ge, PrecedenceLevel::Relational) => Some(BinOp::Ge),
            (TokenKind::LtLt, PrecedenceLevel::Shift) => Some(BinOp::BitShl),
            (TokenKind::GtGt, PrecedenceLevel::Shift) => Some(BinOp::BitShr),
            (TokenKind::Plus, PrecedenceLevel::Additive) => Some(BinOp::Add),
            (TokenKind::Minus, PrecedenceLevel::Additive) => Some(BinOp::Sub),
            (TokenKind::Star, PrecedenceLevel::Multiplicative) => Some(BinOp::Mul),
            (TokenKind::Slash, PrecedenceLevel::Multiplicative) => Some(BinOp::Div),
            (TokenKind::Percent, PrecedenceLevel::Multiplicative) => Some(BinOp::Mod),
            _ => None,
        }
    }

    /// Parse a left-associative binary expression at the given level.
    fn parse_binary_expr(
        &mut self,
        level: PrecedenceLevel,
    ) -> Result<SyntaxNode, ParseFault> {
        let mut lhs = self.parse_next_tighter(level)?;
        loop {
            let op = match self.token_to_binop(self.peek_kind(), level) {
                Some(op) => op,
                None => break,
            };
            self.advance();
            let rhs = self.parse_next_tighter(level)?;
            let span = lhs.span.join(rhs.span);
            lhs = SyntaxNode::new(NodeKind::BinaryExpression(op), span, vec![lhs, rhs]);
        }
        Ok(lhs)
    }

    fn parse_next_tighter(
        &mut self,
        level: PrecedenceLevel,
    ) -> Result<SyntaxNode, ParseFault> {
        match level {
            PrecedenceLevel::LogicalOr => self.parse_binary_expr(PrecedenceLevel::LogicalAnd),
            PrecedenceLevel::LogicalAnd => self.parse_binary_expr(PrecedenceLevel::BitwiseOr),
            PrecedenceLevel::BitwiseOr => self.parse_binary_expr(PrecedenceLevel::BitwiseXor),
            PrecedenceLevel::BitwiseXor => self.parse_binary_expr(PrecedenceLevel::BitwiseAnd),
            PrecedenceLevel::BitwiseAnd => self.parse_binary_expr(PrecedenceLevel::Equality),
            PrecedenceLevel::Equality => self.parse_binary_expr(PrecedenceLevel::Relational),
            PrecedenceLevel::Relational => self.parse_binary_expr(PrecedenceLevel::Shift),
            PrecedenceLevel::Shift => self.parse_binary_expr(PrecedenceLevel::Additive),
            PrecedenceLevel::Additive => {
                self.parse_binary_expr(PrecedenceLevel::Multiplicative)
            }
            PrecedenceLevel::Multiplicative => self.parse_cast(),
        }
    }

    /// Parse a cast expression `(type)expr`, a compound literal
    /// `(type){...}`, or fall through to unary parsing.
    fn parse_cast(&mut self) -> Result<SyntaxNode, ParseFault> {
        if self.check(&TokenKind::LParen) {
            let lparen_span = self.current_span();

            if let Some((candidate, next)) =
                TypeCandidate::parse(&self.tokens, self.position + 1)
            {
                if matches!(self.kind_at(next), TokenKind::RParen) {
                    let follow = self.kind_at(next + 1).clone();
                    let outcome = cast::disambiguate(
                        &candidate,
                        None,
                        &follow,
                        self.table,
                        &mut self.scanner,
                    );

                    if outcome == CastOutcome::Cast {
                        // Commit: consume up to and including ')'.
                        self.position = next + 1;
                        let type_node = SyntaxNode::leaf(
                            NodeKind::TypeExpression(candidate.render()),
                            candidate.span,
                        );

                        if matches!(follow, TokenKind::LBrace) {
                            let literal = self.parse_compound_literal(
                                lparen_span,
                                type_node,
                            )?;
                            return self.parse_postfix_ops(literal);
                        }

                        let operand = self.parse_cast()?;
                        let span = lparen_span.join(operand.span);
                        return Ok(SyntaxNode::new(
                            NodeKind::CastExpression,
                            span,
                            vec![type_node, operand],
                        ));
                    }
                    // ParenExpr/Call: fall through; the postfix loop reads
                    // the parenthesis as an ordinary sub-expression.
                }
            }
        }

        self.parse_unary()
    }

    /// Parse the `{...}` initializer of a compound literal. The brace list
    /// is kept as extra children after the type.
    fn parse_compound_literal(
        &mut self,
        lparen_span: Span,
        type_node: SyntaxNode,
    ) -> Result<SyntaxNode, ParseFault> {
        self.expect_token(&TokenKind::LBrace, "Expected '{' in compound literal")?;
        let mut children = vec![type_node];

        if !self.check(&TokenKind::RBrace) {
            loop {
                children.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
                // Trailing comma before '}'.
                if self.check(&TokenKind::RBrace) {
                    break;
                }
            }
        }

        self.expect_token(&TokenKind::RBrace, "Expected '}' after compound literal")?;
        let span = lparen_span.join(self.previous_span());
        Ok(SyntaxNode::new(NodeKind::CompoundLiteral, span, children))
    }

    /// Parse unary (! ~ - + & * ++ -- sizeof).
    fn parse_unary(&mut self) -> Result<SyntaxNode, ParseFault> {
        let span = self.current_span();

        let op = match self.peek_kind() {
            TokenKind::Bang => Some((UnOp::Not, false)),
            TokenKind::Tilde => Some((UnOp::BitNot, false)),
            TokenKind::Minus => Some((UnOp::Neg, false)),
            TokenKind::Plus => Some((UnOp::Plus, false)),
            TokenKind::Amp => Some((UnOp::AddrOf, false)),
            TokenKind::Star => Some((UnOp::Deref, false)),
            TokenKind::PlusPlus => Some((UnOp::PreInc, true)),
            TokenKind::MinusMinus => Some((UnOp::PreDec, true)),
            _ => None,
        };

        if let Some((op, inc_dec)) = op {
            self.advance();
            // Increment/decrement binds to a unary expression; the other
            // prefix operators take a cast expression, per C.
            let operand = if inc_dec {
                self.parse_unary()?
            } else {
                self.parse_cast()?
            };
            let span = span.join(operand.span);
            return Ok(SyntaxNode::new(
                NodeKind::UnaryExpression(op),
                span,
                vec![operand],
            ));
        }

        if self.check(&TokenKind::Sizeof) {
            return self.parse_sizeof();
        }

        self.parse_postfix()
    }

    /// Parse `sizeof(type)`, `sizeof(expr)`, or `sizeof expr`.
    fn parse_sizeof(&mut self) -> Result<SyntaxNode, ParseFault> {
        let start_span = self.current_span();
        self.advance(); // 'sizeof'

        if self.check(&TokenKind::LParen) {
            if let Some((candidate, next)) =
                TypeCandidate::parse(&self.tokens, self.position + 1)
            {
                // A bare identifier in `sizeof(x)` reads as an expression;
                // only an unambiguous type shape takes the type path.
                if matches!(self.kind_at(next), TokenKind::RParen)
                    && candidate.confidence == Confidence::High
                {
                    self.position = next + 1;
                    let span = start_span.join(self.previous_span());
                    let type_node = SyntaxNode::leaf(
                        NodeKind::TypeExpression(candidate.render()),
                        candidate.span,
                    );
                    return Ok(SyntaxNode::new(
                        NodeKind::SizeofExpression,
                        span,
                        vec![type_node],
                    ));
                }
            }
        }

        let operand = self.parse_unary()?;
        let span = start_span.join(operand.span);
        Ok(SyntaxNode::new(
            NodeKind::SizeofExpression,
            span,
            vec![operand],
        ))
    }

    /// Parse postfix chains: `++` `--` `[]` `.` `->` `()`.
    fn parse_postfix(&mut self) -> Result<SyntaxNode, ParseFault> {
        let expr = self.parse_primary()?;
        self.parse_postfix_ops(expr)
    }

    pub(crate) fn parse_postfix_ops(
        &mut self,
        mut expr: SyntaxNode,
    ) -> Result<SyntaxNode, ParseFault> {
        loop {
            match self.peek_kind() {
                TokenKind::PlusPlus => {
                    self.advance();
                    let span = expr.span.join(self.previous_span());
                    expr = SyntaxNode::new(
                        NodeKind::UnaryExpression(UnOp::PostInc),
                        span,
                        vec![expr],
                    );
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    let span = expr.span.join(self.previous_span());
                    expr = SyntaxNode::new(
                        NodeKind::UnaryExpression(UnOp::PostDec),
                        span,
                        vec![expr],
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect_token(&TokenKind::RBracket, "Expected ']' after index")?;
                    let span = expr.span.join(self.previous_span());
                    expr = SyntaxNode::new(
                        NodeKind::IndexExpression,
                        span,
                        vec![expr, index],
                    );
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    let arrow = matches!(self.peek_kind(), TokenKind::Arrow);
                    self.advance();
                    let member = self.expect_identifier()?;
                    let span = expr.span.join(self.previous_span());
                    expr = SyntaxNode::new(
                        NodeKind::MemberExpression { arrow, member },
                        span,
                        vec![expr],
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut children = vec![expr];
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            children.push(self.parse_expression()?);
                            if !self.match_token(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect_token(&TokenKind::RParen, "Expected ')' after arguments")?;
                    let span = children[0].span.join(self.previous_span());
                    expr = SyntaxNode::new(NodeKind::CallExpression, span, children);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parse primary: literals, identifiers, parenthesized expressions.
    fn parse_primary(&mut self) -> Result<SyntaxNode, ParseFault> {
        let span = self.current_span();

        match self.peek_kind().clone() {
            TokenKind::IntLiteral(value) => {
                self.advance();
                Ok(SyntaxNode::leaf(NodeKind::IntLiteral(value), span))
            }
            TokenKind::CharLiteral(value) => {
                self.advance();
                Ok(SyntaxNode::leaf(NodeKind::CharLiteral(value), span))
            }
            TokenKind::StringLiteral(value) => {
                self.advance();
                Ok(SyntaxNode::leaf(NodeKind::StringLiteral(value), span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(SyntaxNode::leaf(NodeKind::Identifier(name), span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_token(&TokenKind::RParen, "Expected ')' after expression")?;
                let full = span.join(self.previous_span());
                Ok(SyntaxNode::new(
                    NodeKind::ParenExpression,
                    full,
                    vec![inner],
                ))
            }
            TokenKind::Error => Err(ParseFault::new("Unrecognized input", span)),
            other => Err(ParseFault::new(
                format!("Unexpected token: {}", other),
                span,
            )),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseFault> {
        if let TokenKind::Ident(name) = self.peek_kind().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseFault::new(
                format!("Expected identifier, found {}", self.peek_kind()),
                self.current_span(),
            ))
        }
    }
}
