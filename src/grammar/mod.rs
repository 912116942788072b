//! The typecast grammar definition.
//!
//! This module holds everything that is "the grammar" as opposed to the
//! parse driver that exercises it:
//! - [`token`]: token kinds, byte spans, and the lexical classes the
//!   disambiguation policy is defined over
//! - [`lexer`]: error-tolerant tokenization (source text → tokens)
//! - [`type_expr`]: the type-expression candidate rule with its confidence
//!   signal
//! - [`cast`]: the cast-disambiguation rule (cast / paren-expr / call)
//! - [`precedence`]: the conflict table, validated for completeness when
//!   built
//! - [`scanner`]: the external scanner hook for dynamic-precedence ties
//! - [`export`]: the compiled grammar artifact and node-shape schema
//!
//! The compiled grammar is immutable once built and shared by all parses;
//! per-parse mutable state lives only in the driver and its
//! [`scanner::ScannerState`].

pub mod cast;
pub mod export;
pub mod lexer;
pub mod precedence;
pub mod scanner;
pub mod token;
pub mod type_expr;
