//! Text search over a page's plain text, re-expressed in terms of the
//! glyphs that produced each matched character.

use regex::Regex;

use crate::extractor::Rect;
use crate::line_grouper::Line;
use crate::error::SearchError;

const WORD_BOUNDARY_CHARS: &str = "\\s.,;:!?'\"()[]{}<>/\\|@#$%^&*+=~`";

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions<'a> {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub page: Option<usize>,
    _marker: std::marker::PhantomData<&'a ()>,
}

impl<'a> SearchOptions<'a> {
    pub fn new() -> SearchOptions<'a> {
        SearchOptions { case_sensitive: true, whole_word: false, page: None, _marker: std::marker::PhantomData }
    }
}

impl<'a> Default for SearchOptions<'a> {
    fn default() -> SearchOptions<'a> {
        SearchOptions::new()
    }
}

/// A search hit: the plain-text byte range it covers, and the glyph
/// bounding rectangles (one per matched character) plus their union.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub text_range: std::ops::Range<usize>,
    pub char_rects: Vec<Rect>,
    pub bbox: Rect,
}

/// Flattens a page's lines into plain text plus a parallel
/// "text char index -> glyph rect" map, joined the same way
/// [`crate::line_grouper::plain_text`] does (`\n` between lines).
fn flatten(lines: &[Line]) -> (String, Vec<Rect>) {
    let mut text = String::new();
    let mut rects = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            text.push('\n');
            rects.push(Rect { x0: 0.0, y0: 0.0, x1: 0.0, y1: 0.0 });
        }
        for span in &line.spans {
            for glyph in &span.glyphs {
                for ch in glyph.text.chars() {
                    text.push(ch);
                    rects.push(glyph.bbox);
                }
            }
        }
    }
    (text, rects)
}

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => WORD_BOUNDARY_CHARS.contains(c),
    }
}

/// Searches `lines`' plain text for `pattern`, treated as a literal
/// substring unless `as_regex` is set. Regex patterns are always searched
/// globally (all non-overlapping matches); a zero-length match advances the
/// cursor by one character to avoid looping forever.
pub fn search(
    lines: &[Line],
    pattern: &str,
    as_regex: bool,
    options: &SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    let (text, rects) = flatten(lines);
    let haystack = if options.case_sensitive { text.clone() } else { text.to_lowercase() };

    let raw_matches: Vec<(usize, usize)> = if as_regex {
        let pattern = if options.case_sensitive { pattern.to_string() } else { format!("(?i){pattern}") };
        let re = Regex::new(&pattern)?;
        find_all(&re, &haystack)
    } else {
        let needle = if options.case_sensitive { pattern.to_string() } else { pattern.to_lowercase() };
        find_substring_matches(&haystack, &needle)
    };

    let matches = raw_matches
        .into_iter()
        .filter(|&(start, end)| !options.whole_word || is_word_bounded(&text, start, end))
        .map(|(start, end)| {
            let char_rects: Vec<Rect> =
                text[start..end].chars().enumerate().map(|(i, _)| rects[char_index(&text, start) + i]).collect();
            let bbox = char_rects.iter().copied().reduce(|a, b| a.union(&b)).unwrap_or(Rect { x0: 0.0, y0: 0.0, x1: 0.0, y1: 0.0 });
            SearchMatch { text_range: start..end, char_rects, bbox }
        })
        .collect();

    Ok(matches)
}

/// Searches across several pages, honoring `options.page` as a restriction
/// to a single page index (0-based) when set.
pub fn search_pages(
    pages: &[(usize, &[Line])],
    pattern: &str,
    as_regex: bool,
    options: &SearchOptions,
) -> Result<Vec<(usize, SearchMatch)>, SearchError> {
    let mut all = Vec::new();
    for &(page_index, lines) in pages {
        if options.page.is_some_and(|p| p != page_index) {
            continue;
        }
        for m in search(lines, pattern, as_regex, options)? {
            all.push((page_index, m));
        }
    }
    Ok(all)
}

fn char_index(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    is_boundary(before) && is_boundary(after)
}

fn find_substring_matches(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }
    let mut matches = Vec::new();
    let mut start = 0;
    while let Some(rel) = haystack[start..].find(needle) {
        let match_start = start + rel;
        let match_end = match_start + needle.len();
        matches.push((match_start, match_end));
        start = match_end;
    }
    matches
}

fn find_all(re: &Regex, haystack: &str) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        match re.find_at(haystack, start) {
            Some(m) => {
                let (s, e) = (m.start(), m.end());
                matches.push((s, e));
                start = if e > s { e } else { next_char_boundary(haystack, e) };
            }
            None => break,
        }
    }
    matches
}

fn next_char_boundary(s: &str, from: usize) -> usize {
    if from >= s.len() {
        return from + 1;
    }
    let mut i = from + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::GlyphRecord;
    use crate::line_grouper::Span;

    fn glyph(ch: char, x: f64) -> GlyphRecord {
        GlyphRecord {
            text: ch.to_string(),
            bbox: Rect { x0: x, y0: 0.0, x1: x + 6.0, y1: 12.0 },
            baseline: (x, 0.0),
            width: 6.0,
            font_name: "F1".to_string(),
            font_size: 12.0,
        }
    }

    fn line_from(text: &str) -> Line {
        let glyphs: Vec<GlyphRecord> = text.chars().enumerate().map(|(i, c)| glyph(c, i as f64 * 6.0)).collect();
        Line { baseline_y: 0.0, spans: vec![Span { font_name: "F1".to_string(), font_size: 12.0, glyphs }] }
    }

    #[test]
    fn substring_search_finds_all_occurrences() {
        let lines = vec![line_from("cat cat cat")];
        let matches = search(&lines, "cat", false, &SearchOptions::default()).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn case_insensitive_substring_search() {
        let lines = vec![line_from("Cat cat CAT")];
        let options = SearchOptions { case_sensitive: false, ..SearchOptions::default() };
        let matches = search(&lines, "cat", false, &options).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn whole_word_excludes_partial_matches() {
        let lines = vec![line_from("concatenate cat scatter")];
        let options = SearchOptions { whole_word: true, ..SearchOptions::default() };
        let matches = search(&lines, "cat", false, &options).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn regex_search_is_global() {
        let lines = vec![line_from("a1 b2 c3")];
        let matches = search(&lines, "[a-z][0-9]", true, &SearchOptions::default()).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn zero_length_match_does_not_loop_forever() {
        let lines = vec![line_from("abc")];
        let matches = search(&lines, "x*", true, &SearchOptions::default()).unwrap();
        assert!(matches.len() >= 3);
    }

    #[test]
    fn match_bbox_unions_each_character_rect() {
        let lines = vec![line_from("cat")];
        let matches = search(&lines, "cat", false, &SearchOptions::default()).unwrap();
        assert_eq!(matches[0].char_rects.len(), 3);
        assert_eq!(matches[0].bbox.x0, 0.0);
        assert_eq!(matches[0].bbox.x1, 18.0);
    }

    #[test]
    fn search_pages_honors_page_restriction() {
        let page0 = vec![line_from("cat")];
        let page1 = vec![line_from("cat")];
        let pages: Vec<(usize, &[Line])> = vec![(0, &page0), (1, &page1)];
        let options = SearchOptions { page: Some(1), ..SearchOptions::default() };
        let matches = search_pages(&pages, "cat", false, &options).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0, 1);
    }

    #[test]
    fn invalid_regex_pattern_is_an_error() {
        let lines = vec![line_from("abc")];
        let result = search(&lines, "[", true, &SearchOptions::default());
        assert!(result.is_err());
    }
}
