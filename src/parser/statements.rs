//! Statement parsing and error recovery.
//!
//! A source file is a `;`-separated statement list, the granularity the
//! incremental re-parser reuses subtrees at. A malformed statement becomes
//! an error node covering its span, the driver resynchronizes just past
//! the next `;`, and parsing continues: one malformed cast never poisons
//! the rest of the file's tree.

use crate::grammar::token::{Span, TokenKind};
use crate::parser::parse::{ParseFault, Parser};
use crate::syntax::node::{NodeKind, SyntaxNode};

impl<'g> Parser<'g> {
    /// Parse the statement list to end of input. Never fails.
    pub(crate) fn parse_statements(&mut self) -> Vec<SyntaxNode> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            // Stray semicolons are empty statements; no node.
            if self.match_token(&TokenKind::Semicolon) {
                continue;
            }

            let start = self.current_span();
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(fault) => statements.push(self.recover(start, fault)),
            }
        }

        statements
    }

    /// Parse one expression statement: `expr ;`.
    fn parse_statement(&mut self) -> Result<SyntaxNode, ParseFault> {
        let expr = self.parse_expression()?;
        self.expect_token(&TokenKind::Semicolon, "Expected ';' after expression")?;
        let span = expr.span.join(self.previous_span());
        Ok(SyntaxNode::new(
            NodeKind::ExpressionStatement,
            span,
            vec![expr],
        ))
    }

    /// Consume tokens up to and including the next `;` (or end of input)
    /// and cover the skipped span with an error node.
    fn recover(&mut self, start: Span, fault: ParseFault) -> SyntaxNode {
        let mut end = start.end.max(fault.span.end);

        while !self.is_at_end() {
            let token = self.advance();
            end = end.max(token.span.end);
            if matches!(token.kind, TokenKind::Semicolon) {
                break;
            }
        }

        SyntaxNode::leaf(NodeKind::Error, Span::new(start.start, end))
    }
}
