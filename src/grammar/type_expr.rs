//! Type-expression rule: recognizing a candidate type inside parentheses.
//!
//! The rule runs with the cursor positioned just after an opening
//! parenthesis and matches `qualifier* base suffix*`, where a base is one or
//! more type keywords (`unsigned long`), a tagged name (`struct point`), or
//! a bare identifier. The result carries a [`Confidence`] signal: keyword
//! and tagged bases are unambiguous, and so is any candidate with a
//! pointer/array/qualifier suffix, but a bare identifier is syntactically
//! identical to an expression and stays [`Confidence::Low`]; the
//! disambiguation rule decides what to do with it.

use super::token::{Span, Token, TokenKind};

/// Confidence that the matched span really is a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Unambiguous: keyword base, tagged base, or any suffix present.
    High,
    /// A bare identifier; could equally be an expression operand.
    Low,
}

/// The base of a type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeBase {
    /// One or more type keywords, e.g. `unsigned long`.
    Keyword(Vec<TokenKind>),
    /// `struct`/`union`/`enum` followed by a name.
    Tagged { tag: TokenKind, name: String },
    /// A bare identifier that may name a type.
    Named(String),
}

/// A candidate type-expression span with its shape details.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCandidate {
    pub base: TypeBase,
    pub qualifiers: Vec<TokenKind>,
    pub pointer_depth: usize,
    /// Array-size placeholders; `None` for an unsized `[]` dimension.
    pub array_dims: Vec<Option<i64>>,
    pub span: Span,
    pub confidence: Confidence,
}

impl TypeCandidate {
    /// Attempt to match a type expression starting at `tokens[pos]`.
    ///
    /// On success returns the candidate and the position of the first token
    /// after it (for a well-formed cast, the closing parenthesis). On
    /// failure returns `None` and the caller's position is untouched,
    /// including for empty parenthesis content, which is never a type.
    pub fn parse(tokens: &[Token], pos: usize) -> Option<(TypeCandidate, usize)> {
        let mut cursor = pos;
        let mut qualifiers = Vec::new();

        while kind_at(tokens, cursor).is_some_and(TokenKind::is_qualifier) {
            qualifiers.push(kind_at(tokens, cursor)?.clone());
            cursor += 1;
        }

        let start_span = tokens.get(pos)?.span;
        let base = Self::parse_base(tokens, &mut cursor)?;

        let mut pointer_depth = 0;
        let mut array_dims = Vec::new();
        let mut suffixes = 0;

        loop {
            match kind_at(tokens, cursor) {
                Some(TokenKind::Star) => {
                    pointer_depth += 1;
                    suffixes += 1;
                    cursor += 1;
                }
                Some(kind) if kind.is_qualifier() => {
                    qualifiers.push(kind.clone());
                    suffixes += 1;
                    cursor += 1;
                }
                Some(TokenKind::LBracket) => {
                    let dim = match kind_at(tokens, cursor + 1) {
                        Some(TokenKind::RBracket) => {
                            cursor += 2;
                            None
                        }
                        Some(TokenKind::IntLiteral(n)) => {
                            let n = *n;
                            if kind_at(tokens, cursor + 2) != Some(&TokenKind::RBracket) {
                                return None;
                            }
                            cursor += 3;
                            Some(n)
                        }
                        _ => return None,
                    };
                    array_dims.push(dim);
                    suffixes += 1;
                }
                _ => break,
            }
        }

        let end_span = tokens.get(cursor.saturating_sub(1))?.span;
        let confidence = match (&base, suffixes + qualifiers.len()) {
            (TypeBase::Named(_), 0) => Confidence::Low,
            _ => Confidence::High,
        };

        Some((
            TypeCandidate {
                base,
                qualifiers,
                pointer_depth,
                array_dims,
                span: start_span.join(end_span),
                confidence,
            },
            cursor,
        ))
    }

    fn parse_base(tokens: &[Token], cursor: &mut usize) -> Option<TypeBase> {
        match kind_at(tokens, *cursor)? {
            kind if kind.is_type_keyword() => {
                let mut keywords = Vec::new();
                while let Some(k) = kind_at(tokens, *cursor) {
                    if k.is_type_keyword() {
                        keywords.push(k.clone());
                        *cursor += 1;
                    } else {
                        break;
                    }
                }
                Some(TypeBase::Keyword(keywords))
            }
            kind if kind.is_tag_keyword() => {
                let tag = kind.clone();
                let name = match kind_at(tokens, *cursor + 1)? {
                    TokenKind::Ident(name) => name.clone(),
                    _ => return None,
                };
                *cursor += 2;
                Some(TypeBase::Tagged { tag, name })
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                *cursor += 1;
                Some(TypeBase::Named(name))
            }
            _ => None,
        }
    }

    /// The identifier naming the base type, when there is one.
    pub fn named_base(&self) -> Option<&str> {
        match &self.base {
            TypeBase::Named(name) => Some(name),
            TypeBase::Tagged { name, .. } => Some(name),
            TypeBase::Keyword(_) => None,
        }
    }

    /// Canonical spelling, e.g. `const unsigned long *`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for qualifier in &self.qualifiers {
            let word = match qualifier {
                TokenKind::Const => "const",
                _ => "volatile",
            };
            out.push_str(word);
            out.push(' ');
        }
        match &self.base {
            TypeBase::Keyword(keywords) => {
                let words: Vec<&str> = keywords
                    .iter()
                    .map(|k| match k {
                        TokenKind::Int => "int",
                        TokenKind::Char => "char",
                        TokenKind::Void => "void",
                        TokenKind::Long => "long",
                        TokenKind::Short => "short",
                        TokenKind::Float => "float",
                        TokenKind::Double => "double",
                        TokenKind::Signed => "signed",
                        TokenKind::Unsigned => "unsigned",
                        _ => "_Bool",
                    })
                    .collect();
                out.push_str(&words.join(" "));
            }
            TypeBase::Tagged { tag, name } => {
                let word = match tag {
                    TokenKind::Struct => "struct",
                    TokenKind::Union => "union",
                    _ => "enum",
                };
                out.push_str(word);
                out.push(' ');
                out.push_str(name);
            }
            TypeBase::Named(name) => out.push_str(name),
        }
        for _ in 0..self.pointer_depth {
            out.push('*');
        }
        for dim in &self.array_dims {
            match dim {
                Some(n) => out.push_str(&format!("[{}]", n)),
                None => out.push_str("[]"),
            }
        }
        out
    }
}

fn kind_at(tokens: &[Token], pos: usize) -> Option<&TokenKind> {
    tokens.get(pos).map(|t| &t.kind)
}
