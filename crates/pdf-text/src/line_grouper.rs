//! Groups an unordered bag of extracted glyphs into lines and font/size
//! spans, inserting synthetic space glyphs across wide gaps.

use crate::extractor::{GlyphRecord, Rect};

const BASELINE_TOLERANCE: f64 = 2.0;
const FONT_SIZE_TOLERANCE: f64 = 0.5;
const GAP_SPACE_RATIO: f64 = 0.3;

/// One run of glyphs sharing a font name and size within a line.
#[derive(Debug, Clone)]
pub struct Span {
    pub font_name: String,
    pub font_size: f64,
    pub glyphs: Vec<GlyphRecord>,
}

impl Span {
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.text.as_str()).collect()
    }
}

/// A line: glyphs sharing a baseline y within [`BASELINE_TOLERANCE`],
/// sorted left to right and broken into spans.
#[derive(Debug, Clone)]
pub struct Line {
    pub baseline_y: f64,
    pub spans: Vec<Span>,
}

impl Line {
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::text).collect::<Vec<_>>().join("")
    }

    pub fn bbox(&self) -> Option<Rect> {
        self.spans
            .iter()
            .flat_map(|s| s.glyphs.iter())
            .map(|g| g.bbox)
            .reduce(|a, b| a.union(&b))
    }
}

/// Groups glyphs into lines (by baseline y) and spans within each line (by
/// font name/size), inserting synthetic space glyphs across wide gaps.
/// Lines are returned top-down (highest baseline y first); plain text is
/// the line texts joined by `\n`.
pub fn group_lines(mut glyphs: Vec<GlyphRecord>) -> Vec<Line> {
    // Cluster by baseline y first (descending, so the topmost line forms
    // first), independent of x — each glyph joins the most recent cluster
    // within tolerance or starts a new one.
    glyphs.sort_by(|a, b| b.baseline.1.partial_cmp(&a.baseline.1).unwrap());

    let mut clusters: Vec<(f64, Vec<GlyphRecord>)> = Vec::new();
    for glyph in glyphs {
        match clusters.last_mut().filter(|(y, _)| (*y - glyph.baseline.1).abs() <= BASELINE_TOLERANCE) {
            Some((_, bucket)) => bucket.push(glyph),
            None => clusters.push((glyph.baseline.1, vec![glyph])),
        }
    }

    clusters
        .into_iter()
        .map(|(baseline_y, mut bucket)| {
            bucket.sort_by(|a, b| a.baseline.0.partial_cmp(&b.baseline.0).unwrap());
            let mut line = Line { baseline_y, spans: Vec::new() };
            for glyph in bucket {
                push_into_line(&mut line, glyph);
            }
            line
        })
        .collect()
}

fn push_into_line(line: &mut Line, glyph: GlyphRecord) {
    let needs_new_span = match line.spans.last() {
        Some(span) => {
            span.font_name != glyph.font_name
                || (span.font_size - glyph.font_size).abs() > FONT_SIZE_TOLERANCE
        }
        None => true,
    };

    if needs_new_span {
        line.spans.push(Span { font_name: glyph.font_name.clone(), font_size: glyph.font_size, glyphs: Vec::new() });
    }

    let span = line.spans.last_mut().unwrap();
    if let Some(prev) = span.glyphs.last() {
        let avg_font_size = (prev.font_size + glyph.font_size) / 2.0;
        let gap = glyph.bbox.x0 - prev.bbox.x1;
        if gap > GAP_SPACE_RATIO * avg_font_size {
            span.glyphs.push(GlyphRecord {
                text: " ".to_string(),
                bbox: Rect { x0: prev.bbox.x1, y0: prev.bbox.y0, x1: glyph.bbox.x0, y1: prev.bbox.y1 },
                baseline: (prev.bbox.x1, prev.baseline.1),
                width: gap,
                font_name: prev.font_name.clone(),
                font_size: prev.font_size,
            });
        }
    }
    span.glyphs.push(glyph);
}

/// Plain text of a page: lines joined by `\n`, top-down.
pub fn plain_text(lines: &[Line]) -> String {
    lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(text: &str, x: f64, y: f64, width: f64, font: &str, size: f64) -> GlyphRecord {
        GlyphRecord {
            text: text.to_string(),
            bbox: Rect { x0: x, y0: y, x1: x + width, y1: y + size },
            baseline: (x, y),
            width,
            font_name: font.to_string(),
            font_size: size,
        }
    }

    #[test]
    fn groups_by_baseline_within_tolerance() {
        let glyphs = vec![
            glyph("A", 0.0, 100.0, 6.0, "F1", 12.0),
            glyph("B", 10.0, 101.0, 6.0, "F1", 12.0),
            glyph("C", 0.0, 50.0, 6.0, "F1", 12.0),
        ];
        let lines = group_lines(glyphs);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "AB");
        assert_eq!(lines[1].text(), "C");
    }

    #[test]
    fn lines_are_sorted_top_down() {
        let glyphs = vec![glyph("bottom", 0.0, 10.0, 6.0, "F1", 12.0), glyph("top", 0.0, 200.0, 6.0, "F1", 12.0)];
        let lines = group_lines(glyphs);
        assert_eq!(lines[0].text(), "top");
        assert_eq!(lines[1].text(), "bottom");
    }

    #[test]
    fn new_span_opens_on_font_size_change() {
        let glyphs = vec![
            glyph("A", 0.0, 0.0, 6.0, "F1", 12.0),
            glyph("B", 6.0, 0.0, 6.0, "F1", 18.0),
        ];
        let lines = group_lines(glyphs);
        assert_eq!(lines[0].spans.len(), 2);
    }

    #[test]
    fn wide_gap_inserts_synthetic_space() {
        let glyphs = vec![
            glyph("A", 0.0, 0.0, 6.0, "F1", 12.0),
            glyph("B", 20.0, 0.0, 6.0, "F1", 12.0),
        ];
        let lines = group_lines(glyphs);
        assert_eq!(lines[0].text(), "A B");
    }

    #[test]
    fn plain_text_joins_lines_with_newline() {
        let glyphs = vec![glyph("A", 0.0, 100.0, 6.0, "F1", 12.0), glyph("B", 0.0, 50.0, 6.0, "F1", 12.0)];
        let lines = group_lines(glyphs);
        assert_eq!(plain_text(&lines), "A\nB");
    }
}
