//! Graphics and text state maintained while walking a content stream
//! The text matrix is intentionally outside the `q`/`Q` stack.

use crate::matrix::Matrix;

/// Text-state parameters set by `Tc`/`Tw`/`Tz`/`TL`/`Tf`/`Tr`/`Ts` and the
/// matrices they act through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextState {
    pub char_spacing: f64,
    pub word_spacing: f64,
    pub horizontal_scale: f64,
    pub leading: f64,
    pub font_size: f64,
    pub rise: f64,
    pub render_mode: i64,
    pub tm: Matrix,
    pub tlm: Matrix,
}

impl TextState {
    pub fn new() -> TextState {
        TextState {
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 100.0,
            leading: 0.0,
            font_size: 0.0,
            rise: 0.0,
            render_mode: 0,
            tm: Matrix::identity(),
            tlm: Matrix::identity(),
        }
    }

    /// `BT`: resets both matrices to identity. Other text-state scalars
    /// (char spacing, leading, font) persist across `BT`/`ET`.
    pub fn begin_text(&mut self) {
        self.tm = Matrix::identity();
        self.tlm = Matrix::identity();
    }

    /// `Tm a b c d e f`: sets both Tm and Tlm literally.
    pub fn set_matrix(&mut self, m: Matrix) {
        self.tm = m;
        self.tlm = m;
    }

    /// `Td tx ty`: translates Tlm by `(tx, ty)`; Tm follows.
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translation(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    /// `TD tx ty`: sets leading to `-ty`, then behaves as `Td`.
    pub fn move_line_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_line(tx, ty);
    }

    /// `T*`: `Td(0, -leading)`.
    pub fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Advances Tm by `tx` in text space after showing a glyph of width `w`
    /// (glyph units, 1000/em).
    pub fn advance(&mut self, w: f64, is_space: bool) -> f64 {
        let w0 = w / 1000.0;
        let tx = (w0 * self.font_size + self.char_spacing + if is_space { self.word_spacing } else { 0.0 })
            * (self.horizontal_scale / 100.0);
        self.tm = Matrix::translation(tx, 0.0).multiply(&self.tm);
        tx
    }

    /// `TJ` array number: adjusts Tm by `-adj/1000 * fontSize * hs/100`
    /// before the next string in the array.
    pub fn apply_tj_adjustment(&mut self, adj: f64) {
        let tx = -(adj / 1000.0) * self.font_size * (self.horizontal_scale / 100.0);
        self.tm = Matrix::translation(tx, 0.0).multiply(&self.tm);
    }

    /// Effective font size: `|fontSize * sy(Tm) * sy(ctm)|`.
    pub fn effective_font_size(&self, ctm: &Matrix) -> f64 {
        (self.font_size * self.tm.sy() * ctm.sy()).abs()
    }
}

impl Default for TextState {
    fn default() -> TextState {
        TextState::new()
    }
}

/// The subset of graphics state relevant to text extraction: the CTM plus a
/// stack for `q`/`Q`. Unlike `TextState`, this *is* saved/restored by
/// `q`/`Q`.
#[derive(Debug, Clone)]
pub struct GraphicsState {
    pub ctm: Matrix,
    stack: Vec<(Matrix, TextState)>,
}

impl GraphicsState {
    pub fn new() -> GraphicsState {
        GraphicsState { ctm: Matrix::identity(), stack: Vec::new() }
    }

    /// `cm a b c d e f`: prepends the given matrix to the CTM.
    pub fn concat(&mut self, m: Matrix) {
        self.ctm = m.multiply(&self.ctm);
    }

    pub fn save(&mut self, text_state: &TextState) {
        self.stack.push((self.ctm, *text_state));
    }

    /// `Q`: pops the CTM and the saved text-state subset, if any was saved.
    pub fn restore(&mut self, text_state: &mut TextState) {
        if let Some((ctm, saved_text)) = self.stack.pop() {
            self.ctm = ctm;
            *text_state = saved_text;
        }
    }
}

impl Default for GraphicsState {
    fn default() -> GraphicsState {
        GraphicsState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_text_resets_matrices_but_not_scalars() {
        let mut ts = TextState::new();
        ts.font_size = 12.0;
        ts.set_matrix(Matrix::translation(5.0, 5.0));
        ts.begin_text();
        assert_eq!(ts.tm, Matrix::identity());
        assert_eq!(ts.font_size, 12.0);
    }

    #[test]
    fn td_translates_tlm_and_copies_to_tm() {
        let mut ts = TextState::new();
        ts.move_line(10.0, 0.0);
        assert_eq!(ts.tm.e, 10.0);
        ts.move_line(0.0, 5.0);
        assert_eq!(ts.tm.e, 10.0);
        assert_eq!(ts.tm.f, 5.0);
    }

    #[test]
    fn td_sets_leading_to_negative_ty() {
        let mut ts = TextState::new();
        ts.move_line_and_set_leading(0.0, -14.0);
        assert_eq!(ts.leading, 14.0);
    }

    #[test]
    fn next_line_uses_leading() {
        let mut ts = TextState::new();
        ts.leading = 14.0;
        ts.next_line();
        assert_eq!(ts.tm.f, -14.0);
    }

    #[test]
    fn advance_moves_tm_by_glyph_width_scaled_to_font_size() {
        let mut ts = TextState::new();
        ts.font_size = 10.0;
        let tx = ts.advance(500.0, false);
        assert_eq!(tx, 5.0);
        assert_eq!(ts.tm.e, 5.0);
    }

    #[test]
    fn advance_adds_word_spacing_only_for_space_glyphs() {
        let mut ts = TextState::new();
        ts.font_size = 10.0;
        ts.word_spacing = 2.0;
        assert_eq!(ts.advance(0.0, true), 2.0);
        assert_eq!(ts.advance(0.0, false), 0.0);
    }

    #[test]
    fn q_and_restore_roundtrip_ctm_and_text_state() {
        let mut gs = GraphicsState::new();
        let mut ts = TextState::new();
        ts.font_size = 9.0;
        gs.save(&ts);
        gs.concat(Matrix::translation(100.0, 0.0));
        ts.font_size = 24.0;
        gs.restore(&mut ts);
        assert_eq!(gs.ctm, Matrix::identity());
        assert_eq!(ts.font_size, 9.0);
    }

    #[test]
    fn text_matrix_is_not_part_of_the_graphics_state_stack() {
        // q/Q restores ctm and the passed-in text state snapshot, but Tm
        // itself is driven independently by BT/Td/Tm, never by q/Q alone.
        let mut gs = GraphicsState::new();
        let ts = TextState::new();
        gs.save(&ts);
        gs.concat(Matrix::translation(1.0, 1.0));
        assert_eq!(gs.ctm, Matrix::translation(1.0, 1.0));
    }
}
