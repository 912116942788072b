//! Compiled grammar export: the artifact embedders query by name.
//!
//! The compiled grammar bundles the validated conflict table with the
//! node-shape schema that query/highlighting consumers rely on. Field names
//! in the schema ("type" and "value" on the cast node) are a compatibility
//! contract and must not change silently between versions.
//!
//! The default grammar is built exactly once per process and shared
//! read-only by every parse; there is no teardown beyond process exit.

use serde::Serialize;
use std::sync::OnceLock;

use super::precedence::{ConflictTable, GrammarError, OperatorClass, Resolution};

/// Stable name embedders use to request this grammar.
pub const GRAMMAR_NAME: &str = "typecast";

/// Declared shape of one node kind: its name and named fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeShape {
    pub node: &'static str,
    pub fields: &'static [&'static str],
}

/// Node shapes this grammar produces.
pub const NODE_SCHEMA: &[NodeShape] = &[
    NodeShape { node: "source_file", fields: &[] },
    NodeShape { node: "expression_statement", fields: &[] },
    NodeShape { node: "cast_expression", fields: &["type", "value"] },
    NodeShape { node: "type_expression", fields: &[] },
    NodeShape { node: "parenthesized_expression", fields: &["inner"] },
    NodeShape { node: "call_expression", fields: &["callee"] },
    NodeShape { node: "compound_literal", fields: &["type"] },
    NodeShape { node: "binary_expression", fields: &[] },
    NodeShape { node: "unary_expression", fields: &[] },
    NodeShape { node: "index_expression", fields: &["base", "index"] },
    NodeShape { node: "member_expression", fields: &["base"] },
    NodeShape { node: "conditional_expression", fields: &["condition"] },
    NodeShape { node: "assignment_expression", fields: &["left", "right"] },
    NodeShape { node: "sizeof_expression", fields: &[] },
    NodeShape { node: "error", fields: &[] },
];

/// The compiled rule table and metadata consumed by a parse driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledGrammar {
    pub name: &'static str,
    pub version: &'static str,
    pub node_schema: &'static [NodeShape],
    pub conflicts: ConflictTable,
}

impl CompiledGrammar {
    /// Serialize the grammar metadata (name, version, node shapes, conflict
    /// resolutions) for downstream consumers.
    pub fn to_json(&self) -> String {
        // Serialization of plain static data cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Builder for a grammar with overridden conflict resolutions.
///
/// The exact precedence between low-confidence cast candidates and specific
/// operators is a known point of divergence between real-world grammars, so
/// it is data rather than code: embedders override individual ambiguous
/// classes and rebuild.
pub struct GrammarBuilder {
    rules: Vec<(super::precedence::ConflictPoint, Resolution)>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self {
            rules: ConflictTable::default_rules(),
        }
    }

    /// Override the resolution for one ambiguous infix class.
    pub fn resolve_infix(mut self, class: OperatorClass, resolution: Resolution) -> Self {
        use super::precedence::ConflictPoint;
        self.rules
            .retain(|(point, _)| *point != ConflictPoint::Infix(class));
        self.rules.push((ConflictPoint::Infix(class), resolution));
        self
    }

    /// Validate the rule set and produce a compiled grammar.
    pub fn build(self) -> Result<CompiledGrammar, GrammarError> {
        Ok(CompiledGrammar {
            name: GRAMMAR_NAME,
            version: env!("CARGO_PKG_VERSION"),
            node_schema: NODE_SCHEMA,
            conflicts: ConflictTable::build(self.rules)?,
        })
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide compiled default grammar.
///
/// Built on first use and never mutated; safe to share across concurrent
/// parses without synchronization. The default rule set is statically
/// complete, so building it cannot fail (completeness of custom rule sets
/// is checked by [`GrammarBuilder::build`]).
pub fn language() -> &'static CompiledGrammar {
    static GRAMMAR: OnceLock<CompiledGrammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        GrammarBuilder::new()
            .build()
            .expect("default conflict table covers every conflict point")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::precedence::ConflictPoint;

    #[test]
    fn test_language_is_a_single_shared_instance() {
        let a = language() as *const CompiledGrammar;
        let b = language() as *const CompiledGrammar;
        assert_eq!(a, b);
        assert_eq!(language().name, "typecast");
    }

    #[test]
    fn test_schema_declares_cast_fields() {
        let cast = NODE_SCHEMA
            .iter()
            .find(|shape| shape.node == "cast_expression")
            .unwrap();
        assert_eq!(cast.fields, &["type", "value"]);
    }

    #[test]
    fn test_schema_json_contains_contract_names() {
        let json = language().to_json();
        assert!(json.contains("\"cast_expression\""));
        assert!(json.contains("\"type\""));
        assert!(json.contains("\"value\""));
        assert!(json.contains("\"typecast\""));
    }

    #[test]
    fn test_builder_override() {
        let grammar = GrammarBuilder::new()
            .resolve_infix(OperatorClass::Multiplicative, Resolution::PreferCast)
            .build()
            .unwrap();
        assert_eq!(
            grammar
                .conflicts
                .resolve(ConflictPoint::Infix(OperatorClass::Multiplicative)),
            Resolution::PreferCast
        );
        // Untouched entries keep the default policy.
        assert_eq!(
            grammar
                .conflicts
                .resolve(ConflictPoint::Infix(OperatorClass::Additive)),
            Resolution::PreferExpression
        );
    }
}
