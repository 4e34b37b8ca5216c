use crate::token::{Span, Token, TokenType};

/// Taxonomy from spec.md §7.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Invalid character, unterminated string, inconsistent indentation.
    Lexical { message: String },
    /// The token at this position did not match a required literal or kind.
    ExpectedToken { expected: String, found: String },
    /// No grammar symbol in scope matched this position.
    NoMatch,
    /// Multiple complete readings of one statement survived to the terminator.
    Ambiguity { unique_ids: Vec<String> },
    /// An `assignable` position held a non-addressable expression.
    IllegalAssignable,
}

/// A single diagnostic: a token-indexed position plus a message (spec.md §3
/// CodeError, §7). Rust models the original's distinguished "success"
/// sentinel as `Result<T, CodeError>` instead of a comparable sentinel value
/// (spec.md §9 "Error sentinel"); `fold` below replaces `FoldError`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeError {
    pub position: usize,
    pub span: Span,
    pub kind: ErrorKind,
}

impl CodeError {
    pub fn new(position: usize, span: Span, kind: ErrorKind) -> Self {
        CodeError { position, span, kind }
    }

    pub fn expected_token(position: usize, span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        CodeError::new(position, span, ErrorKind::ExpectedToken { expected: expected.into(), found: found.into() })
    }

    pub fn no_match(position: usize, span: Span) -> Self {
        CodeError::new(position, span, ErrorKind::NoMatch)
    }

    pub fn lexical(position: usize, span: Span, message: impl Into<String>) -> Self {
        CodeError::new(position, span, ErrorKind::Lexical { message: message.into() })
    }

    pub fn ambiguity(position: usize, span: Span, unique_ids: Vec<String>) -> Self {
        CodeError::new(position, span, ErrorKind::Ambiguity { unique_ids })
    }

    pub fn illegal_assignable(position: usize, span: Span) -> Self {
        CodeError::new(position, span, ErrorKind::IllegalAssignable)
    }
}

/// Error folding (spec.md §4.4, §7, §8 invariant 5): the error whose token
/// position is later in the stream wins; ties keep the first. `fold` is
/// associative and commutative, and a `None` ("success") is dominated by any
/// real error on one side but is the identity when folded with another
/// `None`.
pub fn fold(e1: Option<CodeError>, e2: Option<CodeError>) -> Option<CodeError> {
    match (e1, e2) {
        (None, None) => None,
        (Some(e), None) | (None, Some(e)) => Some(e),
        (Some(a), Some(b)) => {
            if b.position > a.position {
                Some(b)
            } else {
                Some(a)
            }
        }
    }
}

/// Recovers a 1-based row/column from a byte offset into `source`, used only
/// for presenting a `CodeError` to a human (spec.md §6: "row/column are
/// recovered via the token list").
fn locate(source: &str, offset: usize) -> (usize, usize, usize, usize) {
    let mut row = 1;
    let mut line_start = 0;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            row += 1;
            line_start = i + 1;
        }
    }
    let line_end = source[line_start..]
        .find('\n')
        .map(|off| line_start + off)
        .unwrap_or(source.len());
    let column = offset.saturating_sub(line_start);
    (row, column, line_start, line_end)
}

/// Renders a `CodeError` against the original source text, teacher style:
/// a `row | line` gutter followed by an underlined span. This is a
/// presentation concern only — it owns no parsing logic (SPEC_FULL.md §10).
pub struct Diagnostic<'a> {
    pub error: &'a CodeError,
    pub source: &'a str,
}

impl<'a> Diagnostic<'a> {
    pub fn new(error: &'a CodeError, source: &'a str) -> Self {
        Diagnostic { error, source }
    }

    pub fn render(&self) -> String {
        let (row, col, line_start, line_end) = locate(self.source, self.error.span.start);
        let line = &self.source[line_start..line_end];
        let len = (self.error.span.end.max(self.error.span.start + 1) - self.error.span.start).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));
        format!(
            "error: {}\n{:>4} | {}\n     | {}",
            describe(&self.error.kind),
            row,
            line,
            underline
        )
    }
}

fn describe(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::Lexical { message } => message.clone(),
        ErrorKind::ExpectedToken { expected, found } => {
            format!("expected {}, found {}", expected, found)
        }
        ErrorKind::NoMatch => "no grammar symbol in scope matches here".to_string(),
        ErrorKind::Ambiguity { unique_ids } => {
            format!("ambiguous statement — matches both {}", unique_ids.join(" and "))
        }
        ErrorKind::IllegalAssignable => "this expression is not addressable".to_string(),
    }
}

/// Human-readable label for a token, used in `ExpectedToken` diagnostics.
pub fn describe_token(token: &Token) -> String {
    match &token.kind {
        TokenType::Identifier(_) => "an identifier".to_string(),
        TokenType::Integer(_) => "an integer literal".to_string(),
        TokenType::Float(_) => "a float literal".to_string(),
        TokenType::String(_) => "a string literal".to_string(),
        TokenType::Punct(p) => format!("'{:?}'", p),
        TokenType::Newline => "end of statement".to_string(),
        TokenType::Indent => "an indent".to_string(),
        TokenType::Dedent => "a dedent".to_string(),
        TokenType::Eof => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(pos: usize) -> CodeError {
        CodeError::no_match(pos, Span::new(pos, pos + 1))
    }

    #[test]
    fn fold_success_is_identity() {
        assert_eq!(fold(None, None), None);
    }

    #[test]
    fn fold_success_dominated_by_real_error() {
        let e = err(3);
        assert_eq!(fold(Some(e.clone()), None), Some(e.clone()));
        assert_eq!(fold(None, Some(e.clone())), Some(e));
    }

    #[test]
    fn fold_keeps_deepest_reaching_error() {
        let shallow = err(2);
        let deep = err(9);
        assert_eq!(fold(Some(shallow.clone()), Some(deep.clone())), Some(deep.clone()));
        assert_eq!(fold(Some(deep.clone()), Some(shallow.clone())), Some(deep));
    }

    #[test]
    fn fold_breaks_ties_by_keeping_first() {
        let a = err(5);
        let b = err(5);
        assert_eq!(fold(Some(a.clone()), Some(b)), Some(a));
    }

    #[test]
    fn fold_is_commutative() {
        let a = err(3);
        let b = err(7);
        assert_eq!(fold(Some(a.clone()), Some(b.clone())), fold(Some(b), Some(a)));
    }

    #[test]
    fn fold_is_associative() {
        let a = Some(err(1));
        let b = Some(err(4));
        let c = Some(err(2));
        assert_eq!(fold(fold(a.clone(), b.clone()), c.clone()), fold(a, fold(b, c)));
    }

    #[test]
    fn diagnostic_renders_underline_at_column() {
        let source = "set x to\nplus";
        let error = CodeError::no_match(9, Span::new(9, 13));
        let rendered = Diagnostic::new(&error, source).render();
        assert!(rendered.contains("plus"));
        assert!(rendered.contains("^^^^"));
    }
}
