//! Read-side `/FontDescriptor` parsing: metrics and font-program references
//! pulled back out of a `Dictionary`, mirroring the fields
//! [`crate::embedding::pdf_objects`] writes on the way in.

use pdf_core::object::{Dictionary, ObjectId};

/// Which embedded font-program stream a descriptor carries, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontProgramRef {
    /// `/FontFile2`: a TrueType program.
    TrueType(ObjectId),
    /// `/FontFile3`: a CFF/Type1C (or OpenType-CFF) program, carrying its
    /// `/Subtype`.
    Cff { stream: ObjectId, subtype: String },
}

/// Metrics and font-program references pulled from a `/FontDescriptor`
/// dictionary.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    pub flags: i64,
    pub ascent: f64,
    pub descent: f64,
    pub cap_height: f64,
    pub italic_angle: f64,
    pub stem_v: f64,
    pub missing_width: f64,
    pub font_program: Option<FontProgramRef>,
}

impl FontDescriptor {
    /// Parses a `/FontDescriptor` dictionary. Numeric fields default to 0
    /// when absent, matching how most viewers treat a missing entry.
    pub fn parse(dict: &Dictionary) -> FontDescriptor {
        let font_program = dict
            .get_ref(b"FontFile2")
            .map(FontProgramRef::TrueType)
            .or_else(|| {
                let stream = dict.get_ref(b"FontFile3")?;
                // The stream's own /Subtype (Type1C, CIDFontType0C, OpenType)
                // isn't visible from the descriptor dict alone; callers with
                // access to the registry should prefer resolving it there.
                Some(FontProgramRef::Cff { stream, subtype: "Type1C".to_string() })
            });

        FontDescriptor {
            flags: dict.get_integer(b"Flags").unwrap_or(0),
            ascent: dict.get_number(b"Ascent").unwrap_or(0.0),
            descent: dict.get_number(b"Descent").unwrap_or(0.0),
            cap_height: dict.get_number(b"CapHeight").unwrap_or(0.0),
            italic_angle: dict.get_number(b"ItalicAngle").unwrap_or(0.0),
            stem_v: dict.get_number(b"StemV").unwrap_or(0.0),
            missing_width: dict.get_number(b"MissingWidth").unwrap_or(0.0),
            font_program,
        }
    }

    /// Bit 3 (value 4) of `/Flags`: the font uses a symbolic, non-Standard
    /// encoding.
    pub fn is_symbolic(&self) -> bool {
        self.flags & 0x0004 != 0
    }

    /// Bit 1 (value 1): every glyph has the same width.
    pub fn is_fixed_pitch(&self) -> bool {
        self.flags & 0x0001 != 0
    }
}
