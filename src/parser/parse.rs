//! Parse driver coordinator.
//!
//! This module provides the [`Parser`] struct, the shared helper methods,
//! and the public parse entry points. The driver embodies the engine-side
//! interfaces the grammar is written against: a token cursor
//! (peek/consume/save/restore) and per-parse scanner state.
//!
//! # Driver architecture
//!
//! Recursive descent split across `impl Parser` blocks:
//! - this module: parser state, helpers, entry points
//! - `expressions`: precedence climbing with the cast-disambiguation hook
//! - `statements`: statement list and error recovery into error nodes
//!
//! Parsing is infallible at the public surface: malformed input becomes
//! error nodes in the produced tree, never a returned `Err`.

use crate::grammar::export::{language, CompiledGrammar};
use crate::grammar::lexer::Lexer;
use crate::grammar::precedence::ConflictTable;
use crate::grammar::scanner::ScannerState;
use crate::grammar::token::{Span, Token, TokenKind};
use crate::syntax::node::{NodeKind, SyntaxNode, SyntaxTree};

/// Internal parse fault: converted into an error node at the statement
/// level, never surfaced to callers.
#[derive(Debug, Clone)]
pub(crate) struct ParseFault {
    pub message: String,
    pub span: Span,
}

impl ParseFault {
    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

/// Recursive descent driver for the typecast grammar.
pub struct Parser<'g> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) table: &'g ConflictTable,
    pub(crate) scanner: ScannerState,
}

/// Parse a source text with the default grammar. Always produces a tree;
/// malformed regions are covered by error nodes.
pub fn parse(source: &str) -> SyntaxTree {
    parse_with(language(), source)
}

/// Parse a source text with a custom-built grammar.
pub fn parse_with(grammar: &CompiledGrammar, source: &str) -> SyntaxTree {
    let mut parser = Parser::with_grammar(source, grammar);
    let statements = parser.parse_statements();
    let root = SyntaxNode::new(
        NodeKind::SourceFile,
        Span::new(0, source.len()),
        statements,
    );
    SyntaxTree::new(root, source.to_string())
}

/// Parse a slice of a larger text in place, producing statements whose
/// spans are valid for the whole text. Used by incremental re-parse for
/// the edited middle region.
pub(crate) fn parse_segment(
    grammar: &CompiledGrammar,
    slice: &str,
    offset: usize,
) -> Vec<SyntaxNode> {
    let mut parser = Parser {
        tokens: Lexer::with_offset(slice, offset).tokenize(),
        position: 0,
        table: &grammar.conflicts,
        scanner: ScannerState::new(),
    };
    parser.parse_statements()
}

impl<'g> Parser<'g> {
    pub fn new(source: &str) -> Parser<'static> {
        Parser::with_grammar(source, language())
    }

    pub fn with_grammar(source: &str, grammar: &'g CompiledGrammar) -> Parser<'g> {
        Parser {
            tokens: Lexer::new(source).tokenize(),
            position: 0,
            table: &grammar.conflicts,
            scanner: ScannerState::new(),
        }
    }

    // ===== Cursor helpers =====

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.position.min(self.tokens.len() - 1)].kind
    }

    pub(crate) fn kind_at(&self, pos: usize) -> &TokenKind {
        match self.tokens.get(pos) {
            Some(token) => &token.kind,
            None => &TokenKind::Eof,
        }
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous().span
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.position.min(self.tokens.len() - 1)].span
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        message: &str,
    ) -> Result<(), ParseFault> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseFault::new(
                format!("{}, found {}", message, self.peek_kind()),
                self.current_span(),
            ))
        }
    }
}
