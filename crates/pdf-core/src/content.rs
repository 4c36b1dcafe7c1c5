//! Content-stream tokenization: operator/operand pairs plus inline images
//! (`BI ... ID ... EI`).

use crate::object::Object;
use crate::object_parser::ObjectParser;
use crate::scanner::{ScanError, Scanner, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Operator { name: String, operands: Vec<Object> },
    InlineImage { dict: crate::object::Dictionary, data: Vec<u8> },
}

#[derive(Debug, thiserror::Error)]
pub enum ContentParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("unterminated inline image: no EI found")]
    UnterminatedInlineImage,
}

/// Parses a whole content stream into a flat list of operators and inline
/// images, in document order. Operands accumulate between operators; an
/// operator keyword flushes them.
pub fn parse_content_stream(data: &[u8]) -> Result<Vec<ContentItem>, ContentParseError> {
    let mut scanner = Scanner::new(data);
    let mut items = Vec::new();
    let mut operands = Vec::new();

    loop {
        scanner.skip_whitespace_and_comments();
        if scanner.is_eof() {
            break;
        }
        let mark = scanner.mark();
        let tok = match scanner.next_token()? {
            Some(t) => t,
            None => break,
        };
        match tok {
            Token::Keyword(kw) if kw == b"BI" => {
                let (dict, data) = parse_inline_image(&mut scanner)?;
                items.push(ContentItem::InlineImage { dict, data });
                operands.clear();
            }
            Token::Keyword(kw) => {
                let name = String::from_utf8_lossy(&kw).into_owned();
                items.push(ContentItem::Operator {
                    name,
                    operands: std::mem::take(&mut operands),
                });
            }
            _ => {
                operands.push(reparse_operand(&mut scanner, mark)?);
            }
        }
    }
    Ok(items)
}

/// Re-dispatches a single already-read token through the object grammar
/// (arrays/dicts can appear as operands, e.g. `TJ`'s array or inline
/// `BDC`/`DP` property dictionaries). The outer scanner is rewound to
/// `mark` and re-driven by a full [`ObjectParser`] so nested structures
/// parse correctly, then advanced past whatever it consumed.
fn reparse_operand(scanner: &mut Scanner, mark: usize) -> Result<Object, ContentParseError> {
    scanner.restore(mark);
    let mut parser = ObjectParser::new(Scanner::at(scanner.remaining(), 0));
    let obj = parser
        .parse_object()
        .map_err(|_| ContentParseError::Scan(ScanError::Eof(mark)))?;
    let consumed = parser.scanner.pos();
    scanner.seek(mark + consumed);
    Ok(obj)
}

/// `BI <dict entries> ID <binary data> EI`. The binary payload has no
/// escaping and can contain anything, including byte sequences that look
/// like `EI`; this scans for `EI` preceded by whitespace and followed by
/// whitespace/EOF, which is the same heuristic real-world producers rely on.
fn parse_inline_image(
    scanner: &mut Scanner,
) -> Result<(crate::object::Dictionary, Vec<u8>), ContentParseError> {
    let mut dict = crate::object::Dictionary::new();
    loop {
        scanner.skip_whitespace_and_comments();
        let mark = scanner.mark();
        let tok = scanner.next_token()?.ok_or(ScanError::Eof(mark))?;
        match tok {
            Token::Keyword(kw) if kw == b"ID" => break,
            Token::Name(key) => {
                let mut parser = ObjectParser::new(Scanner::at(scanner.remaining(), 0));
                let value = parser
                    .parse_object()
                    .map_err(|_| ContentParseError::Scan(ScanError::Eof(mark)))?;
                let consumed = parser.scanner.pos();
                scanner.seek(scanner.pos() + consumed);
                dict.set(key, value);
            }
            _ => return Err(ContentParseError::Scan(ScanError::Eof(mark))),
        }
    }
    // Exactly one whitespace byte separates `ID` from the raw data.
    if matches!(scanner.peek(), Some(b' ') | Some(b'\n') | Some(b'\r')) {
        scanner.consume();
    }
    let data_start = scanner.pos();
    let remaining = scanner.remaining();
    let mut search_from = 0;
    loop {
        let rel = remaining[search_from..]
            .windows(2)
            .position(|w| w == b"EI")
            .ok_or(ContentParseError::UnterminatedInlineImage)?;
        let ei_pos = search_from + rel;
        let preceded_ok = ei_pos == 0 || remaining[ei_pos - 1].is_ascii_whitespace();
        let followed_ok = ei_pos + 2 >= remaining.len()
            || remaining[ei_pos + 2].is_ascii_whitespace()
            || is_delimiterish(remaining[ei_pos + 2]);
        if preceded_ok && followed_ok {
            let data_end = if ei_pos > 0 && remaining[ei_pos - 1].is_ascii_whitespace() {
                ei_pos - 1
            } else {
                ei_pos
            };
            let data = remaining[..data_end].to_vec();
            scanner.seek(data_start + ei_pos + 2);
            return Ok((dict, data));
        }
        search_from = ei_pos + 2;
        if search_from >= remaining.len() {
            return Err(ContentParseError::UnterminatedInlineImage);
        }
    }
}

fn is_delimiterish(b: u8) -> bool {
    matches!(b, b'/' | b'[' | b'(' | b'<')
}
