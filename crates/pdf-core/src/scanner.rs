//! Low-level tokenizer over an immutable byte buffer.
//!
//! No object semantics live here: the scanner only knows about whitespace,
//! delimiters, literals, hex strings, names, numbers, comments, and bare
//! keywords. Structural errors (unterminated string, bad hex digit) are
//! surfaced to the caller; recovery policy belongs to the xref resolver and
//! document parser.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("unterminated literal string starting at byte {0}")]
    UnterminatedString(usize),
    #[error("unterminated hex string starting at byte {0}")]
    UnterminatedHexString(usize),
    #[error("invalid hex digit at byte {0}")]
    InvalidHexDigit(usize),
    #[error("unexpected end of input at byte {0}")]
    Eof(usize),
}

pub type ScanResult<T> = Result<T, ScanError>;

fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

/// A single lexical token produced by [`Scanner::next_token`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Integer(i64),
    Real(f64),
    Name(Vec<u8>),
    LiteralString(Vec<u8>),
    HexString(Vec<u8>),
    Keyword(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
}

/// Cursor over a read-only byte buffer with explicit peek/consume/seek/
/// mark-restore control.
pub struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8]) -> Scanner<'a> {
        Scanner { buf, pos: 0 }
    }

    pub fn at(buf: &'a [u8], pos: usize) -> Scanner<'a> {
        Scanner { buf, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    pub fn mark(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, mark: usize) {
        self.pos = mark;
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.buf.get(self.pos + offset).copied()
    }

    pub fn consume(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Whitespace is `{NUL, TAB, LF, FF, CR, SP}`; `%` begins a line comment
    /// ending at LF/CR.
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b) if is_whitespace(b) => {
                    self.pos += 1;
                }
                Some(b'%') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    /// Integer or real with optional leading sign and at most one `.`.
    pub fn read_number(&mut self) -> ScanResult<Token> {
        let start = self.pos;
        let mut saw_digit = false;
        let mut is_real = false;

        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_digit() => {
                    saw_digit = true;
                    self.pos += 1;
                }
                Some(b'.') if !is_real => {
                    is_real = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if !saw_digit && !is_real {
            return Err(ScanError::Eof(start));
        }
        let text = std::str::from_utf8(&self.buf[start..self.pos]).unwrap_or("0");
        if is_real {
            // Tolerate malformed reals ("-", ".", "--1") the way real-world
            // producers occasionally emit them: coerce to 0.
            let v: f64 = text.parse().unwrap_or(0.0);
            Ok(Token::Real(v))
        } else {
            match text.parse::<i64>() {
                Ok(v) => Ok(Token::Integer(v)),
                Err(_) => Ok(Token::Real(text.parse().unwrap_or(0.0))),
            }
        }
    }

    /// Begins with `/`, ends at whitespace/delimiter; `#HH` decodes to a
    /// single byte.
    pub fn read_name(&mut self) -> ScanResult<Token> {
        debug_assert_eq!(self.peek(), Some(b'/'));
        self.pos += 1;
        let mut out = Vec::new();
        while let Some(b) = self.peek() {
            if is_whitespace(b) || is_delimiter(b) {
                break;
            }
            if b == b'#' {
                if let (Some(h1), Some(h2)) = (self.peek_at(1), self.peek_at(2)) {
                    if let (Some(d1), Some(d2)) = (hex_digit(h1), hex_digit(h2)) {
                        out.push(d1 * 16 + d2);
                        self.pos += 3;
                        continue;
                    }
                }
                out.push(b);
                self.pos += 1;
                continue;
            }
            out.push(b);
            self.pos += 1;
        }
        Ok(Token::Name(out))
    }

    /// Balanced parentheses with backslash escapes.
    pub fn read_literal_string(&mut self) -> ScanResult<Token> {
        let start = self.pos;
        debug_assert_eq!(self.peek(), Some(b'('));
        self.pos += 1;
        let mut depth = 1i32;
        let mut out = Vec::new();
        loop {
            let b = self.consume().ok_or(ScanError::UnterminatedString(start))?;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    out.push(b);
                }
                b'\\' => {
                    let e = self
                        .consume()
                        .ok_or(ScanError::UnterminatedString(start))?;
                    match e {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'(' => out.push(b'('),
                        b')' => out.push(b')'),
                        b'\\' => out.push(b'\\'),
                        b'\r' => {
                            // line continuation; \r\n counts as one EOL
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut v = (e - b'0') as u32;
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(d @ b'0'..=b'7') => {
                                        v = v * 8 + (d - b'0') as u32;
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            out.push((v & 0xFF) as u8);
                        }
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
        Ok(Token::LiteralString(out))
    }

    /// Between `<` and `>`, whitespace ignored, odd final digit padded with
    /// `0`.
    pub fn read_hex_string(&mut self) -> ScanResult<Token> {
        let start = self.pos;
        debug_assert_eq!(self.peek(), Some(b'<'));
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            let b = self
                .consume()
                .ok_or(ScanError::UnterminatedHexString(start))?;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            match hex_digit(b) {
                Some(d) => digits.push(d),
                None => return Err(ScanError::InvalidHexDigit(self.pos - 1)),
            }
        }
        if digits.len() % 2 == 1 {
            digits.push(0);
        }
        let bytes = digits.chunks(2).map(|c| c[0] * 16 + c[1]).collect();
        Ok(Token::HexString(bytes))
    }

    /// Contiguous non-delimiter bytes: `true`, `false`, `null`, `obj`,
    /// `endobj`, `stream`, content-stream operators, etc.
    pub fn read_keyword(&mut self) -> ScanResult<Token> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !is_regular(b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(ScanError::Eof(start));
        }
        Ok(Token::Keyword(self.buf[start..self.pos].to_vec()))
    }

    /// Reads the next structural token, dispatching on the lookahead byte.
    pub fn next_token(&mut self) -> ScanResult<Option<Token>> {
        self.skip_whitespace_and_comments();
        let b = match self.peek() {
            Some(b) => b,
            None => return Ok(None),
        };
        let tok = match b {
            b'/' => self.read_name()?,
            b'(' => self.read_literal_string()?,
            b'<' => {
                if self.peek_at(1) == Some(b'<') {
                    self.pos += 2;
                    Token::DictStart
                } else {
                    self.read_hex_string()?
                }
            }
            b'>' => {
                if self.peek_at(1) == Some(b'>') {
                    self.pos += 2;
                    Token::DictEnd
                } else {
                    self.pos += 1;
                    return self.next_token();
                }
            }
            b'[' => {
                self.pos += 1;
                Token::ArrayStart
            }
            b']' => {
                self.pos += 1;
                Token::ArrayEnd
            }
            b'+' | b'-' | b'.' => self.read_number()?,
            b if b.is_ascii_digit() => self.read_number()?,
            _ => self.read_keyword()?,
        };
        Ok(Some(tok))
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_numbers() {
        let mut s = Scanner::new(b"123 -45 3.14 -0.5 .5");
        assert_eq!(s.next_token().unwrap(), Some(Token::Integer(123)));
        assert_eq!(s.next_token().unwrap(), Some(Token::Integer(-45)));
        assert_eq!(s.next_token().unwrap(), Some(Token::Real(3.14)));
        assert_eq!(s.next_token().unwrap(), Some(Token::Real(-0.5)));
        assert_eq!(s.next_token().unwrap(), Some(Token::Real(0.5)));
    }

    #[test]
    fn reads_name_with_hex_escape() {
        let mut s = Scanner::new(b"/Name#20With#23Space");
        assert_eq!(
            s.next_token().unwrap(),
            Some(Token::Name(b"Name With#Space".to_vec()))
        );
    }

    #[test]
    fn reads_balanced_literal_string() {
        let mut s = Scanner::new(b"(Hello (World) \\)) ");
        assert_eq!(
            s.next_token().unwrap(),
            Some(Token::LiteralString(b"Hello (World) )".to_vec()))
        );
    }

    #[test]
    fn literal_string_octal_escape() {
        let mut s = Scanner::new(b"(\\101\\102)");
        assert_eq!(
            s.next_token().unwrap(),
            Some(Token::LiteralString(b"AB".to_vec()))
        );
    }

    #[test]
    fn unterminated_literal_string_is_recoverable_error() {
        let mut s = Scanner::new(b"(unterminated");
        assert!(matches!(
            s.next_token(),
            Err(ScanError::UnterminatedString(_))
        ));
    }

    #[test]
    fn reads_hex_string_with_odd_digit_padding() {
        let mut s = Scanner::new(b"<48656C6C6F2>");
        match s.next_token().unwrap() {
            Some(Token::HexString(bytes)) => assert_eq!(bytes.last(), Some(&0x20)),
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn distinguishes_dict_and_hex_delimiters() {
        let mut s = Scanner::new(b"<< /A <FF> >>");
        assert_eq!(s.next_token().unwrap(), Some(Token::DictStart));
        assert_eq!(
            s.next_token().unwrap(),
            Some(Token::Name(b"A".to_vec()))
        );
        assert_eq!(
            s.next_token().unwrap(),
            Some(Token::HexString(vec![0xFF]))
        );
        assert_eq!(s.next_token().unwrap(), Some(Token::DictEnd));
    }

    #[test]
    fn reads_keywords() {
        let mut s = Scanner::new(b"true false null obj endobj stream");
        for kw in ["true", "false", "null", "obj", "endobj", "stream"] {
            assert_eq!(
                s.next_token().unwrap(),
                Some(Token::Keyword(kw.as_bytes().to_vec()))
            );
        }
    }

    #[test]
    fn skips_line_comments() {
        let mut s = Scanner::new(b"% a comment\n42");
        assert_eq!(s.next_token().unwrap(), Some(Token::Integer(42)));
    }
}
