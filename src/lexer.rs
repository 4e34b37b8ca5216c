use crate::error::CodeError;
use crate::intern::Interner;
use crate::token::{Punct, Span, Token, TokenType};

// ============================================================================
// Stage 1: Line Lexer — indentation and blank-line handling (spec.md §4.1)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum LineToken {
    Indent,
    Dedent,
    Content { text: String, start: usize, end: usize },
}

/// Stage 1 lexer: turns source text into a stream of indentation-structural
/// tokens plus opaque per-line `Content` for stage 2 to tokenize. Mirrors the
/// teacher's `LineLexer` (`src/lexer.rs` in the teacher repo), generalized
/// from English-prose lines to Tinymoe statement lines.
struct LineLexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    indent_stack: Vec<usize>,
    pending_dedents: usize,
    position: usize,
    has_pending_content: bool,
    pending_content: Option<(String, usize, usize)>,
    finished_lines: bool,
    errors: Vec<CodeError>,
}

impl<'a> LineLexer<'a> {
    fn new(source: &'a str) -> Self {
        LineLexer {
            source,
            bytes: source.as_bytes(),
            indent_stack: vec![0],
            pending_dedents: 0,
            position: 0,
            has_pending_content: false,
            pending_content: None,
            finished_lines: false,
            errors: Vec::new(),
        }
    }

    /// Raw-column indent measurement (spec.md §6: "indentation is compared
    /// in raw columns"). Mixing tabs and spaces within one line's leading
    /// whitespace is a lexical error, but lexing continues.
    fn measure_indent(&mut self, line_start: usize) -> (usize, usize) {
        let mut indent = 0;
        let mut pos = line_start;
        let mut saw_space = false;
        let mut saw_tab = false;
        while pos < self.bytes.len() {
            match self.bytes[pos] {
                b' ' => {
                    saw_space = true;
                    indent += 1;
                    pos += 1;
                }
                b'\t' => {
                    saw_tab = true;
                    indent += 1;
                    pos += 1;
                }
                _ => break,
            }
        }
        if saw_space && saw_tab {
            self.errors.push(CodeError::lexical(
                line_start,
                Span::new(line_start, pos),
                "inconsistent indentation: tabs and spaces mixed on one line",
            ));
        }
        (indent, pos)
    }

    fn read_line_content(&self, content_start: usize) -> (String, usize, usize, usize) {
        let mut pos = content_start;
        while pos < self.bytes.len() && self.bytes[pos] != b'\n' {
            pos += 1;
        }
        let content_end = pos;
        let text = self.source[content_start..content_end].trim_end().to_string();
        let next_line_start = if pos < self.bytes.len() { pos + 1 } else { pos };
        (text, content_start, content_end, next_line_start)
    }

    fn is_blank_line(&self, line_start: usize) -> bool {
        let mut pos = line_start;
        while pos < self.bytes.len() {
            match self.bytes[pos] {
                b' ' | b'\t' => pos += 1,
                b'\n' => return true,
                _ => return false,
            }
        }
        true
    }

    fn process_next_line(&mut self) -> bool {
        while self.position < self.bytes.len() && self.is_blank_line(self.position) {
            while self.position < self.bytes.len() && self.bytes[self.position] != b'\n' {
                self.position += 1;
            }
            if self.position < self.bytes.len() {
                self.position += 1;
            }
        }

        if self.position >= self.bytes.len() {
            self.finished_lines = true;
            if self.indent_stack.len() > 1 {
                self.pending_dedents = self.indent_stack.len() - 1;
                self.indent_stack.truncate(1);
            }
            return self.pending_dedents > 0;
        }

        let (line_indent, content_start) = self.measure_indent(self.position);
        let (text, start, end, next_pos) = self.read_line_content(content_start);

        if text.is_empty() {
            self.position = next_pos;
            return self.process_next_line();
        }

        let current_indent = *self.indent_stack.last().unwrap();
        if line_indent > current_indent {
            self.indent_stack.push(line_indent);
        } else if line_indent < current_indent {
            while self.indent_stack.len() > 1 && line_indent < *self.indent_stack.last().unwrap() {
                self.indent_stack.pop();
                self.pending_dedents += 1;
            }
        }
        self.has_pending_content = true;
        self.pending_content = Some((text, start, end));
        self.position = next_pos;
        true
    }
}

impl<'a> Iterator for LineLexer<'a> {
    type Item = LineToken;

    fn next(&mut self) -> Option<LineToken> {
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            return Some(LineToken::Dedent);
        }
        if self.has_pending_content {
            self.has_pending_content = false;
            let (text, start, end) = self.pending_content.take().unwrap();
            return Some(LineToken::Content { text, start, end });
        }
        if !self.finished_lines {
            let had_levels = self.indent_stack.len();
            if self.process_next_line() {
                if self.indent_stack.len() > had_levels {
                    return Some(LineToken::Indent);
                }
                if self.pending_dedents > 0 {
                    self.pending_dedents -= 1;
                    return Some(LineToken::Dedent);
                }
                if self.has_pending_content {
                    self.has_pending_content = false;
                    let (text, start, end) = self.pending_content.take().unwrap();
                    return Some(LineToken::Content { text, start, end });
                }
            } else if self.pending_dedents > 0 {
                self.pending_dedents -= 1;
                return Some(LineToken::Dedent);
            }
        }
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            return Some(LineToken::Dedent);
        }
        None
    }
}

// ============================================================================
// Stage 2: Word Lexer — classifies the text of one Content line into tokens
// ============================================================================

pub struct Lexer<'a, 'int> {
    source: &'a str,
    interner: &'int mut Interner,
    errors: Vec<CodeError>,
}

impl<'a, 'int> Lexer<'a, 'int> {
    pub fn new(source: &'a str, interner: &'int mut Interner) -> Self {
        Lexer { source, interner, errors: Vec::new() }
    }

    /// Lexer totality (spec.md §8 invariant 1): always returns a finite
    /// token list and error list, never panics, for any input byte sequence.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<CodeError>) {
        let mut tokens = Vec::new();
        // Lines are independent, so an error on one never stops later lines
        // (spec.md §4.1: "parsing of remaining lines continues").
        let lines: Vec<LineToken> = {
            let mut ll = LineLexer::new(self.source);
            let collected: Vec<LineToken> = (&mut ll).collect();
            self.errors.extend(ll.errors);
            collected
        };

        for line in lines {
            match line {
                LineToken::Indent => tokens.push(Token::new(TokenType::Indent, Span::new(0, 0))),
                LineToken::Dedent => tokens.push(Token::new(TokenType::Dedent, Span::new(0, 0))),
                LineToken::Content { text, start, end } => {
                    self.tokenize_line(&text, start, &mut tokens);
                    tokens.push(Token::new(TokenType::Newline, Span::new(end, end + 1)));
                }
            }
        }
        tokens.push(Token::new(TokenType::Eof, Span::new(self.source.len(), self.source.len())));
        (tokens, self.errors)
    }

    fn tokenize_line(&mut self, text: &str, line_start: usize, tokens: &mut Vec<Token>) {
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c == b' ' || c == b'\t' {
                i += 1;
                continue;
            }
            let abs = line_start + i;
            if c.is_ascii_alphabetic() || c == b'_' {
                let start = i;
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let word = &text[start..i];
                let sym = self.interner.intern(word);
                tokens.push(Token::new(TokenType::Identifier(sym), Span::new(line_start + start, line_start + i)));
            } else if c.is_ascii_digit() {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let mut is_float = false;
                if i < bytes.len() && bytes[i] == b'.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
                    is_float = true;
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text_slice = &text[start..i];
                let span = Span::new(line_start + start, line_start + i);
                if is_float {
                    match text_slice.parse::<f64>() {
                        Ok(v) => tokens.push(Token::new(TokenType::Float(v), span)),
                        Err(_) => self.errors.push(CodeError::lexical(abs, span, "malformed float literal")),
                    }
                } else {
                    match text_slice.parse::<i64>() {
                        Ok(v) => tokens.push(Token::new(TokenType::Integer(v), span)),
                        Err(_) => self.errors.push(CodeError::lexical(abs, span, "integer literal out of range")),
                    }
                }
            } else if c == b'"' {
                let start = i;
                i += 1;
                let mut value = String::new();
                let mut terminated = false;
                while i < bytes.len() {
                    match bytes[i] {
                        b'"' => {
                            terminated = true;
                            i += 1;
                            break;
                        }
                        b'\\' if i + 1 < bytes.len() => {
                            let escaped = match bytes[i + 1] {
                                b'\\' => Some('\\'),
                                b'"' => Some('"'),
                                b'n' => Some('\n'),
                                b't' => Some('\t'),
                                b'r' => Some('\r'),
                                other => {
                                    self.errors.push(CodeError::lexical(
                                        line_start + i,
                                        Span::new(line_start + i, line_start + i + 2),
                                        format!("unknown escape sequence '\\{}'", other as char),
                                    ));
                                    None
                                }
                            };
                            if let Some(ch) = escaped {
                                value.push(ch);
                            }
                            i += 2;
                        }
                        _ => {
                            // `text` is a `&str` slice, so `i` sits on a char
                            // boundary here; decode the whole scalar value
                            // rather than reinterpreting one of its UTF-8
                            // bytes on its own (spec.md §6: source is UTF-8).
                            let ch = text[i..].chars().next().expect("i is a valid char boundary");
                            value.push(ch);
                            i += ch.len_utf8();
                        }
                    }
                }
                let span = Span::new(line_start + start, line_start + i);
                if !terminated {
                    self.errors.push(CodeError::lexical(abs, span, "unterminated string literal"));
                }
                let sym = self.interner.intern(&value);
                tokens.push(Token::new(TokenType::String(sym), span));
            } else {
                let (punct, len) = self.classify_punct(&bytes[i..]);
                match punct {
                    Some(p) => {
                        tokens.push(Token::new(TokenType::Punct(p), Span::new(line_start + i, line_start + i + len)));
                        i += len;
                    }
                    None => {
                        self.errors.push(CodeError::lexical(
                            abs,
                            Span::new(abs, abs + 1),
                            format!("unexpected character '{}'", c as char),
                        ));
                        i += 1;
                    }
                }
            }
        }
    }

    fn classify_punct(&self, rest: &[u8]) -> (Option<Punct>, usize) {
        match rest[0] {
            b'(' => (Some(Punct::LParen), 1),
            b')' => (Some(Punct::RParen), 1),
            b',' => (Some(Punct::Comma), 1),
            b':' => (Some(Punct::Colon), 1),
            b'+' => (Some(Punct::Plus), 1),
            b'-' => (Some(Punct::Minus), 1),
            b'*' => (Some(Punct::Star), 1),
            b'/' => (Some(Punct::Slash), 1),
            b'&' => (Some(Punct::Amp), 1),
            b'=' => (Some(Punct::Eq), 1),
            b'<' => {
                if rest.get(1) == Some(&b'=') {
                    (Some(Punct::Le), 2)
                } else if rest.get(1) == Some(&b'>') {
                    (Some(Punct::Ne), 2)
                } else {
                    (Some(Punct::Lt), 1)
                }
            }
            b'>' => {
                if rest.get(1) == Some(&b'=') {
                    (Some(Punct::Ge), 2)
                } else {
                    (Some(Punct::Gt), 1)
                }
            }
            _ => (None, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> (Vec<Token>, Vec<CodeError>, Interner) {
        let mut interner = Interner::new();
        let (tokens, errors) = Lexer::new(src, &mut interner).tokenize();
        (tokens, errors, interner)
    }

    #[test]
    fn lexes_identifiers_and_newline() {
        let (tokens, errors, interner) = lex("set x to 1");
        assert!(errors.is_empty());
        let words: Vec<String> = tokens
            .iter()
            .filter_map(|t| match &t.kind {
                TokenType::Identifier(s) => Some(interner.resolve(*s).to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(words, vec!["set", "x", "to"]);
        assert!(matches!(tokens.last().unwrap().kind, TokenType::Eof));
    }

    #[test]
    fn lexes_integer_and_float() {
        let (tokens, errors, _) = lex("1 3.5");
        assert!(errors.is_empty());
        assert!(matches!(tokens[0].kind, TokenType::Integer(1)));
        assert!(matches!(tokens[1].kind, TokenType::Float(f) if (f - 3.5).abs() < 1e-9));
    }

    #[test]
    fn lexes_string_with_escapes() {
        let (tokens, errors, interner) = lex(r#""a\nb""#);
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenType::String(s) => assert_eq!(interner.resolve(*s), "a\nb"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    /// spec.md §6: source text is UTF-8; a multi-byte character inside a
    /// string literal must decode as one scalar value, not be split across
    /// several corrupted single-byte pushes.
    #[test]
    fn lexes_string_with_multibyte_utf8_content() {
        let (tokens, errors, interner) = lex("\"héllo wörld 日本語\"");
        assert!(errors.is_empty());
        match &tokens[0].kind {
            TokenType::String(s) => assert_eq!(interner.resolve(*s), "héllo wörld 日本語"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn reports_unterminated_string_and_continues() {
        let (_, errors, _) = lex("\"oops\nset x to 1");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, crate::error::ErrorKind::Lexical { .. }));
    }

    #[test]
    fn emits_indent_and_dedent_around_nested_block() {
        let src = "repeat\n    call foo\nend";
        let (tokens, errors, _) = lex(src);
        assert!(errors.is_empty());
        assert!(tokens.iter().any(|t| matches!(t.kind, TokenType::Indent)));
        assert!(tokens.iter().any(|t| matches!(t.kind, TokenType::Dedent)));
    }

    #[test]
    fn mixed_tabs_and_spaces_is_lexical_error() {
        let src = "repeat\n \tcall foo\nend";
        let (_, errors, _) = lex(src);
        assert!(errors.iter().any(|e| matches!(e.kind, crate::error::ErrorKind::Lexical { .. })));
    }

    #[test]
    fn never_panics_on_arbitrary_bytes() {
        for src in ["", "\0\0\0", "\"", "   \t   ", "-.-.-", "\"\\q\""] {
            let (_, _errors, _) = lex(src);
        }
    }
}
