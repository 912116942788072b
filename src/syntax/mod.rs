//! Syntax tree types: node kinds, spans, named-field access, error nodes.

pub mod node;
