//! # Introduction
//!
//! `typecast` is a grammar for recognizing cast expressions (parenthesized
//! type expressions immediately applied to an operand) in C-family source
//! text, and for disambiguating them from ordinary parenthesized
//! expressions and call-shaped constructs without a symbol table. It ships
//! with a reference parse driver and statement-level incremental re-parse.
//!
//! ## Parse pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser (type-expression rule,
//!     cast-disambiguation rule, conflict table, external scanner) → CST
//!                                        ↘ incremental re-parse on edits
//! ```
//!
//! 1. [`grammar`]: token classes, the error-tolerant lexer, the
//!    type-expression and cast-disambiguation rules, the
//!    build-time-validated conflict table, the external scanner hook, and
//!    the compiled grammar export.
//! 2. [`parser`]: the recursive descent driver that applies the grammar
//!    and always produces a tree, isolating malformed regions in error
//!    nodes.
//! 3. [`syntax`]: the concrete syntax tree with node kinds, byte spans,
//!    named fields (`"type"` / `"value"` on the cast node), and structural
//!    equality.
//! 4. [`incremental`]: byte-range edits with reuse of unaffected top-level
//!    subtrees.
//!
//! ## Disambiguation policy
//!
//! An unambiguous type shape (`(int)`, `(T*)`, `(struct p)`) followed by an
//! operand commits to a cast. A bare identifier candidate is resolved by
//! the conflict table under the "expressions win over ambiguous casts"
//! policy: `(T)x` is a cast, while `(a)-b`, `(a)*b` and `(foo)(bar)` read
//! as expression, multiplication and call. The table is data, not code;
//! embedders can rebuild it with different per-operator resolutions.

pub mod grammar;
pub mod incremental;
pub mod parser;
pub mod syntax;
