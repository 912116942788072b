//! External scanner hook: lexical-shape lookahead for dynamic ties.
//!
//! When the conflict table resolves an ambiguous prefix with equal dynamic
//! precedence values, the grammar asks this scanner for one token of
//! lexical-shape judgement: does the candidate's name *look like* a type?
//! The heuristic uses only the characters themselves (no symbol table):
//! `_t`/`_type` suffixes, SCREAMING_CASE and CamelCase identifiers read as
//! type-like in C-family codebases.
//!
//! Scanner state is created per parse attempt, owned by that parse, and
//! never shared: concurrent parses each carry their own [`ScannerState`].

/// Lexical-shape judgement for one scanned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanHint {
    TypeLike,
    ExpressionLike,
}

/// Small fixed-size lookahead state carried across scanner calls within a
/// single parse attempt. Reset on construction; a fresh parse gets a fresh
/// state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannerState {
    calls: u32,
    last_hint: Option<ScanHint>,
}

impl ScannerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scans performed in this parse attempt.
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// The most recent hint, if any scan has run.
    pub fn last_hint(&self) -> Option<ScanHint> {
        self.last_hint
    }
}

/// Result of one scanner invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Bytes of `input` consumed (the identifier prefix).
    pub consumed: usize,
    pub hint: ScanHint,
}

/// Scan one identifier from the head of `input` and classify its shape.
///
/// Pure function of `(state, input)`: the same state and input always
/// produce the same outcome and successor state.
pub fn scan(state: &mut ScannerState, input: &str) -> ScanOutcome {
    let consumed = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '_')
        .map(|(i, _)| i)
        .unwrap_or(input.len());

    let name = &input[..consumed];
    let hint = if looks_like_type(name) {
        ScanHint::TypeLike
    } else {
        ScanHint::ExpressionLike
    };

    state.calls += 1;
    state.last_hint = Some(hint);

    ScanOutcome { consumed, hint }
}

fn looks_like_type(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.ends_with("_t") || name.ends_with("_type") {
        return true;
    }

    let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = name.chars().any(|c| c.is_ascii_uppercase());

    // SCREAMING_CASE of more than one character.
    if has_upper && !has_lower && name.len() > 1 {
        return true;
    }

    // CamelCase: leading uppercase with lowercase following.
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && has_lower
}
