//! Concrete syntax tree produced by the parse driver.
//!
//! The grammar only declares node *shapes* (kind plus named fields); the
//! nodes themselves are built during parsing and replaced wholesale or
//! reused during incremental re-parse. Unlike an AST, the tree keeps
//! parenthesized expressions as explicit nodes and covers malformed spans
//! with [`NodeKind::Error`] nodes instead of failing.

use crate::grammar::token::Span;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Plus,    // +x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
    Deref,   // *x
    AddrOf,  // &x
}

/// Node kinds the grammar can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root: a sequence of statements.
    SourceFile,
    /// An expression terminated by `;`.
    ExpressionStatement,
    /// `(type) value`; children `[type, value]`, field names "type", "value".
    CastExpression,
    /// A recognized type expression; carries its canonical spelling.
    TypeExpression(String),
    /// `( inner )` kept explicitly; children `[inner]`.
    ParenExpression,
    /// `callee(args...)`; children `[callee, args...]`.
    CallExpression,
    /// `(type){...}`; children `[type]`.
    CompoundLiteral,
    BinaryExpression(BinOp),
    UnaryExpression(UnOp),
    /// `base[index]`; children `[base, index]`.
    IndexExpression,
    /// `.member` or `->member`; children `[base]`.
    MemberExpression { arrow: bool, member: String },
    /// `cond ? a : b`; children `[cond, a, b]`.
    ConditionalExpression,
    /// `lhs = rhs` or compound assignment; children `[lhs, rhs]`.
    AssignExpression(Option<BinOp>),
    /// `sizeof(type)` or `sizeof expr`; one child.
    SizeofExpression,
    Identifier(String),
    IntLiteral(i64),
    CharLiteral(i8),
    StringLiteral(String),
    /// Covers a malformed span; parsing continued after it.
    Error,
}

impl NodeKind {
    /// Stable node name used in the exported schema and by query consumers.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source_file",
            NodeKind::ExpressionStatement => "expression_statement",
            NodeKind::CastExpression => "cast_expression",
            NodeKind::TypeExpression(_) => "type_expression",
            NodeKind::ParenExpression => "parenthesized_expression",
            NodeKind::CallExpression => "call_expression",
            NodeKind::CompoundLiteral => "compound_literal",
            NodeKind::BinaryExpression(_) => "binary_expression",
            NodeKind::UnaryExpression(_) => "unary_expression",
            NodeKind::IndexExpression => "index_expression",
            NodeKind::MemberExpression { .. } => "member_expression",
            NodeKind::ConditionalExpression => "conditional_expression",
            NodeKind::AssignExpression(_) => "assignment_expression",
            NodeKind::SizeofExpression => "sizeof_expression",
            NodeKind::Identifier(_) => "identifier",
            NodeKind::IntLiteral(_) => "int_literal",
            NodeKind::CharLiteral(_) => "char_literal",
            NodeKind::StringLiteral(_) => "string_literal",
            NodeKind::Error => "error",
        }
    }
}

/// One concrete syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Span, children: Vec<SyntaxNode>) -> Self {
        Self { kind, span, children }
    }

    pub fn leaf(kind: NodeKind, span: Span) -> Self {
        Self { kind, span, children: Vec::new() }
    }

    /// Look up a child by its schema field name.
    ///
    /// Field names are a compatibility contract with query/highlighting
    /// consumers; the cast node exposes "type" and "value".
    pub fn field(&self, name: &str) -> Option<&SyntaxNode> {
        let index = match (&self.kind, name) {
            (NodeKind::CastExpression, "type") => 0,
            (NodeKind::CastExpression, "value") => 1,
            (NodeKind::CompoundLiteral, "type") => 0,
            (NodeKind::ParenExpression, "inner") => 0,
            (NodeKind::CallExpression, "callee") => 0,
            (NodeKind::IndexExpression, "base") => 0,
            (NodeKind::IndexExpression, "index") => 1,
            (NodeKind::MemberExpression { .. }, "base") => 0,
            (NodeKind::ConditionalExpression, "condition") => 0,
            (NodeKind::AssignExpression(_), "left") => 0,
            (NodeKind::AssignExpression(_), "right") => 1,
            _ => return None,
        };
        self.children.get(index)
    }

    /// True for nodes that are structurally expression-shaped: a
    /// parenthesized content of this shape is never reinterpreted as a cast
    /// (the structural veto of the disambiguation rule).
    pub fn is_expression_shaped(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::CallExpression
                | NodeKind::BinaryExpression(_)
                | NodeKind::UnaryExpression(_)
                | NodeKind::IndexExpression
                | NodeKind::MemberExpression { .. }
                | NodeKind::ConditionalExpression
                | NodeKind::AssignExpression(_)
        )
    }

    /// True if this node or any descendant is an error node.
    pub fn has_errors(&self) -> bool {
        matches!(self.kind, NodeKind::Error)
            || self.children.iter().any(SyntaxNode::has_errors)
    }

    /// Shift this node's span and all descendant spans by `delta` bytes.
    /// Used when an unaffected subtree is reused after an edit.
    pub fn shift(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }
        self.span = self.span.shifted(delta);
        for child in &mut self.children {
            child.shift(delta);
        }
    }
}

/// Line/column pair derived from a byte offset, for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A parse result: the root node plus the text it was parsed from.
///
/// The source text is retained so that incremental re-parse can compare
/// unaffected regions byte-for-byte before reusing their subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
    source: String,
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode, source: String) -> Self {
        Self { root, source }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The top-level statement nodes (including error nodes).
    pub fn statements(&self) -> &[SyntaxNode] {
        &self.root.children
    }

    pub fn has_errors(&self) -> bool {
        self.root.has_errors()
    }

    /// Source text covered by a node's span.
    pub fn text(&self, node: &SyntaxNode) -> &str {
        &self.source[node.span.start..node.span.end.min(self.source.len())]
    }

    /// 1-based line/column of a byte offset.
    pub fn position_at(&self, offset: usize) -> Position {
        let clamped = offset.min(self.source.len());
        let mut line = 1;
        let mut column = 1;
        for ch in self.source[..clamped].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }
}
