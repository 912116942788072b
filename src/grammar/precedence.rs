//! Conflict table: deterministic resolution of cast-vs-expression prefixes.
//!
//! Every ambiguous prefix the grammar can produce is a [`ConflictPoint`];
//! the table pairs each point with exactly one [`Resolution`]. The table is
//! declared statically, validated when built, and once built it is an
//! immutable value shared by all parses with no synchronization. An
//! incomplete or duplicated declaration is a grammar-authoring defect
//! surfaced as a [`GrammarError`] at build time, never at parse time.

use serde::Serialize;
use std::fmt;

/// Operator classes that are ambiguous after `( identifier )`: each of
/// these tokens can both start a unary operand and continue an enclosing
/// expression in infix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorClass {
    /// `+` / `-`
    Additive,
    /// `*`
    Multiplicative,
    /// `&`
    AddressOf,
    /// `++` / `--`
    IncrementDecrement,
}

/// An ambiguous prefix class requiring a declared resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictPoint {
    /// `( identifier ) operand` where the operand token cannot continue an
    /// infix expression: cast vs. parenthesized expression.
    ParenOperand,
    /// `( identifier ) (`: cast vs. function call.
    ParenCall,
    /// `( identifier ) op` for an ambiguous operator class: cast of a
    /// unary expression vs. binary expression.
    Infix(OperatorClass),
}

impl ConflictPoint {
    /// Every conflict point the grammar can produce, in table order.
    pub const UNIVERSE: [ConflictPoint; 6] = [
        ConflictPoint::ParenOperand,
        ConflictPoint::ParenCall,
        ConflictPoint::Infix(OperatorClass::Additive),
        ConflictPoint::Infix(OperatorClass::Multiplicative),
        ConflictPoint::Infix(OperatorClass::AddressOf),
        ConflictPoint::Infix(OperatorClass::IncrementDecrement),
    ];

    fn index(self) -> usize {
        match self {
            ConflictPoint::ParenOperand => 0,
            ConflictPoint::ParenCall => 1,
            ConflictPoint::Infix(OperatorClass::Additive) => 2,
            ConflictPoint::Infix(OperatorClass::Multiplicative) => 3,
            ConflictPoint::Infix(OperatorClass::AddressOf) => 4,
            ConflictPoint::Infix(OperatorClass::IncrementDecrement) => 5,
        }
    }
}

impl fmt::Display for ConflictPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPoint::ParenOperand => write!(f, "paren-operand"),
            ConflictPoint::ParenCall => write!(f, "paren-call"),
            ConflictPoint::Infix(class) => write!(f, "infix({:?})", class),
        }
    }
}

/// Resolution directive for one conflict point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// The cast interpretation wins.
    PreferCast,
    /// The expression (paren/call/binary) interpretation wins.
    PreferExpression,
    /// Compare dynamic precedence values; on a tie the external scanner
    /// hook breaks it from lexical shape.
    Dynamic { cast: i32, expression: i32 },
}

/// Grammar-authoring errors caught when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A conflict point has no declared resolution.
    MissingConflict { point: ConflictPoint },
    /// A conflict point was declared more than once.
    DuplicateConflict { point: ConflictPoint },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MissingConflict { point } => {
                write!(f, "conflict point {} has no declared resolution", point)
            }
            GrammarError::DuplicateConflict { point } => {
                write!(f, "conflict point {} is declared more than once", point)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// The compiled, immutable conflict table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictTable {
    entries: [Resolution; 6],
}

impl ConflictTable {
    /// The default rule set: "expressions win over ambiguous casts", with
    /// the address-of position left to dynamic precedence so the external
    /// scanner can recognize type-like names (`(size_t)&x`).
    pub fn default_rules() -> Vec<(ConflictPoint, Resolution)> {
        vec![
            (ConflictPoint::ParenOperand, Resolution::PreferCast),
            (ConflictPoint::ParenCall, Resolution::PreferExpression),
            (
                ConflictPoint::Infix(OperatorClass::Additive),
                Resolution::PreferExpression,
            ),
            (
                ConflictPoint::Infix(OperatorClass::Multiplicative),
                Resolution::PreferExpression,
            ),
            (
                ConflictPoint::Infix(OperatorClass::AddressOf),
                Resolution::Dynamic { cast: 0, expression: 0 },
            ),
            (
                ConflictPoint::Infix(OperatorClass::IncrementDecrement),
                Resolution::PreferExpression,
            ),
        ]
    }

    /// Validate and compile a rule set. Exactly one entry per point in
    /// [`ConflictPoint::UNIVERSE`] is required.
    pub fn build(
        rules: Vec<(ConflictPoint, Resolution)>,
    ) -> Result<ConflictTable, GrammarError> {
        let mut entries: [Option<Resolution>; 6] = [None; 6];

        for (point, resolution) in rules {
            let slot = &mut entries[point.index()];
            if slot.is_some() {
                return Err(GrammarError::DuplicateConflict { point });
            }
            *slot = Some(resolution);
        }

        for point in ConflictPoint::UNIVERSE {
            if entries[point.index()].is_none() {
                return Err(GrammarError::MissingConflict { point });
            }
        }

        Ok(ConflictTable {
            entries: entries.map(|slot| slot.unwrap_or(Resolution::PreferExpression)),
        })
    }

    /// Resolution for a conflict point. Total on a built table.
    pub fn resolve(&self, point: ConflictPoint) -> Resolution {
        self.entries[point.index()]
    }
}
