//! Incremental re-parse: reuse unaffected subtrees after a byte-range edit.
//!
//! Reuse operates at statement granularity. Statements that end before the
//! edited range are kept as-is; statements that start at or after it are
//! kept with shifted spans; only the middle region is re-lexed and
//! re-parsed in place. A statement is reused only when its source text is
//! byte-identical at its (shifted) location in the new text, so re-parsing
//! unedited text yields a tree equal to a fresh parse. Reused subtrees keep
//! their recognized shapes: already-disambiguated call- or
//! operator-shaped content is never reinterpreted as a cast.

use std::fmt;

use crate::grammar::export::language;
use crate::grammar::token::Span;
use crate::parser::parse::parse_segment;
use crate::syntax::node::{NodeKind, SyntaxNode, SyntaxTree};

/// One byte-range edit: `start..old_end` in the old text was replaced by
/// `start..new_end` in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl Edit {
    pub fn new(start: usize, old_end: usize, new_end: usize) -> Self {
        Self { start, old_end, new_end }
    }

    /// Byte shift applied to everything after the edited range.
    pub fn delta(&self) -> isize {
        self.new_end as isize - self.old_end as isize
    }
}

/// Invalid edit descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// `start` exceeds `old_end` or `new_end`.
    InvertedRange { start: usize, end: usize },
    /// `old_end` lies beyond the old text.
    OldRangeOutOfBounds { old_end: usize, len: usize },
    /// `new_end` lies beyond the new text.
    NewRangeOutOfBounds { new_end: usize, len: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvertedRange { start, end } => {
                write!(f, "edit range is inverted: start {} > end {}", start, end)
            }
            EditError::OldRangeOutOfBounds { old_end, len } => {
                write!(f, "edit old_end {} exceeds old text length {}", old_end, len)
            }
            EditError::NewRangeOutOfBounds { new_end, len } => {
                write!(f, "edit new_end {} exceeds new text length {}", new_end, len)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// How many leading and trailing statements an edit leaves reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReusePlan {
    pub prefix: usize,
    pub suffix: usize,
}

impl SyntaxTree {
    /// Re-derive the tree for `new_source` after `edit`, reusing every
    /// top-level statement the edit did not touch.
    pub fn with_edit(&self, edit: &Edit, new_source: &str) -> Result<SyntaxTree, EditError> {
        self.validate_edit(edit, new_source)?;

        let delta = edit.delta();
        let statements = self.statements();
        let plan = self.reuse_plan(edit, new_source);

        let mut children: Vec<SyntaxNode> = statements[..plan.prefix].to_vec();

        let middle_start = children.last().map(|s| s.span.end).unwrap_or(0);
        let reused_suffix = &statements[statements.len() - plan.suffix..];
        let middle_end = reused_suffix
            .first()
            .map(|s| (s.span.start as isize + delta) as usize)
            .unwrap_or(new_source.len());

        let middle = parse_segment(
            language(),
            &new_source[middle_start..middle_end],
            middle_start,
        );

        // If the middle region ends in an error reaching the reuse
        // boundary (an unterminated comment or literal introduced by the
        // edit), the malformed span may swallow the trailing statements:
        // re-parse the whole tail instead of reusing it.
        let boundary_error = middle
            .last()
            .is_some_and(|s| matches!(s.kind, NodeKind::Error) && s.span.end >= middle_end);

        let (reparsed, reused_suffix_count) = if boundary_error && !reused_suffix.is_empty() {
            let tail = parse_segment(language(), &new_source[middle_start..], middle_start);
            let count = tail.len();
            children.extend(tail);
            (count, 0)
        } else {
            let count = middle.len();
            children.extend(middle);
            for statement in reused_suffix {
                let mut shifted = statement.clone();
                shifted.shift(delta);
                children.push(shifted);
            }
            (count, plan.suffix)
        };

        log::trace!(
            "incremental re-parse: reused {} leading and {} trailing statements, re-parsed {}",
            plan.prefix,
            reused_suffix_count,
            reparsed
        );

        let root = SyntaxNode::new(
            NodeKind::SourceFile,
            Span::new(0, new_source.len()),
            children,
        );
        Ok(SyntaxTree::new(root, new_source.to_string()))
    }

    /// Compute the reusable statement counts for an edit, without parsing.
    ///
    /// A leading statement is reusable when it ends at or before the edit
    /// and its text is unchanged; a trailing statement when it starts at or
    /// after the old edited range and its text is unchanged at its shifted
    /// location.
    pub fn reuse_plan(&self, edit: &Edit, new_source: &str) -> ReusePlan {
        let statements = self.statements();
        let old_source = self.source();
        let delta = edit.delta();

        let mut prefix = 0;
        for statement in statements {
            let span = statement.span;
            let unchanged = span.end <= edit.start
                && old_source.get(span.start..span.end)
                    == new_source.get(span.start..span.end);
            if unchanged {
                prefix += 1;
            } else {
                break;
            }
        }

        let mut suffix = 0;
        for statement in statements.iter().rev() {
            if prefix + suffix >= statements.len() {
                break;
            }
            let span = statement.span;
            if span.start < edit.old_end {
                break;
            }
            let shifted = span.shifted(delta);
            let unchanged = old_source.get(span.start..span.end)
                == new_source.get(shifted.start..shifted.end);
            if unchanged {
                suffix += 1;
            } else {
                break;
            }
        }

        ReusePlan { prefix, suffix }
    }

    fn validate_edit(&self, edit: &Edit, new_source: &str) -> Result<(), EditError> {
        if edit.start > edit.old_end {
            return Err(EditError::InvertedRange {
                start: edit.start,
                end: edit.old_end,
            });
        }
        if edit.start > edit.new_end {
            return Err(EditError::InvertedRange {
                start: edit.start,
                end: edit.new_end,
            });
        }
        if edit.old_end > self.source().len() {
            return Err(EditError::OldRangeOutOfBounds {
                old_end: edit.old_end,
                len: self.source().len(),
            });
        }
        if edit.new_end > new_source.len() {
            return Err(EditError::NewRangeOutOfBounds {
                new_end: edit.new_end,
                len: new_source.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;

    #[test]
    fn test_noop_edit_reuses_everything_but_one_side() {
        let source = "a; b; c;";
        let tree = parse(source);
        let edit = Edit::new(source.len(), source.len(), source.len());
        let plan = tree.reuse_plan(&edit, source);
        assert_eq!(plan.prefix, 3);
        assert_eq!(plan.suffix, 0);
    }

    #[test]
    fn test_middle_edit_reuses_both_sides() {
        let source = "a; b; c;";
        let tree = parse(source);
        // Replace `b` (offset 3..4) with `bb`.
        let edit = Edit::new(3, 4, 5);
        let new_source = "a; bb; c;";
        let plan = tree.reuse_plan(&edit, new_source);
        assert_eq!(plan.prefix, 1);
        assert_eq!(plan.suffix, 1);

        let new_tree = tree.with_edit(&edit, new_source).unwrap();
        assert_eq!(new_tree, parse(new_source));
    }

    #[test]
    fn test_inverted_edit_is_rejected() {
        let tree = parse("a;");
        let err = tree.with_edit(&Edit::new(5, 2, 2), "a;").unwrap_err();
        assert!(matches!(err, EditError::InvertedRange { .. }));
    }

    #[test]
    fn test_out_of_bounds_edit_is_rejected() {
        let tree = parse("a;");
        let err = tree.with_edit(&Edit::new(0, 50, 2), "a;").unwrap_err();
        assert!(matches!(err, EditError::OldRangeOutOfBounds { .. }));
    }
}
