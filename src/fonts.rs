use unicode_normalization::UnicodeNormalization as _;

/// The built-in PDF faces used on the labels. These are three of the
/// fourteen standard fonts every PDF viewer ships, so they are referenced by
/// name and never embedded in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    /// The PostScript name written into the font dictionary.
    pub fn postscript_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// The name the face is registered under in the page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::HelveticaOblique => "F3",
        }
    }

    /// All faces registered in every document, in resource-name order.
    pub fn all() -> [BuiltinFont; 3] {
        [
            BuiltinFont::Helvetica,
            BuiltinFont::HelveticaBold,
            BuiltinFont::HelveticaOblique,
        ]
    }

    /// The advance-width table of the face. The oblique face shares the
    /// regular metrics, as in the Adobe AFM files.
    fn widths(&self) -> &'static [u16; 95] {
        match self {
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => &HELVETICA_WIDTHS,
            BuiltinFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

// Advance widths in 1/1000 em for the printable ASCII range (0x20..=0x7E),
// taken from the Adobe AFM metrics of the base-14 fonts. They are what makes
// shrink-to-fit work without embedding any font file: the viewer renders the
// same Helvetica these tables describe.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Fallback width for characters the tables do not cover. 556/1000 em is the
/// width of most Helvetica lowercase letters and digits.
const DEFAULT_WIDTH: u16 = 556;

/// The advance width of a single character in 1/1000 em.
///
/// ASCII characters come straight from the AFM tables. For everything else
/// the character is decomposed (NFD) and the width of its base letter is
/// used, which is exact for the accented Latin letters of the standard
/// fonts; a handful of non-decomposable glyphs carry their own widths.
fn character_width(font: BuiltinFont, character: char) -> u16 {
    let code = character as u32;
    if (0x20..=0x7E).contains(&code) {
        return font.widths()[(code - 0x20) as usize];
    }

    match character {
        'ß' => 611,
        'æ' => 889,
        'Æ' => 1000,
        'ø' => 611,
        'Ø' => 778,
        'œ' => 944,
        'Œ' => 1000,
        '–' => 556,
        '—' => 1000,
        '°' => 400,
        '\u{a0}' => 278,
        _ => {
            if let Some(base) = character.nfd().next() {
                let base_code = base as u32;
                if base != character && (0x20..=0x7E).contains(&base_code) {
                    return font.widths()[(base_code - 0x20) as usize];
                }
            }
            DEFAULT_WIDTH
        }
    }
}

/// Measure a string in points for the given face and font size. The text is
/// NFC-normalized first so that measurement and drawing agree on the
/// character sequence.
pub fn string_width(text: &str, font: BuiltinFont, font_size: f32) -> f32 {
    let total: u32 = text
        .nfc()
        .map(|character| character_width(font, character) as u32)
        .sum();
    total as f32 * font_size / 1000.0
}

/// Encode text for a `Tj` operand under WinAnsi encoding. Characters outside
/// the encoding are replaced by a question mark and logged, so a bad input
/// row degrades visibly on the label instead of aborting the run.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.nfc()
        .map(|character| {
            let code = character as u32;
            match code {
                0x20..=0x7E => code as u8,
                0xA0..=0xFF => code as u8,
                _ => match character {
                    '\u{20ac}' => 0x80,
                    '\u{201a}' => 0x82,
                    '\u{192}' => 0x83,
                    '\u{201e}' => 0x84,
                    '\u{2026}' => 0x85,
                    '\u{2020}' => 0x86,
                    '\u{2021}' => 0x87,
                    '\u{2c6}' => 0x88,
                    '\u{2030}' => 0x89,
                    '\u{160}' => 0x8A,
                    '\u{2039}' => 0x8B,
                    '\u{152}' => 0x8C,
                    '\u{17d}' => 0x8E,
                    '\u{2018}' => 0x91,
                    '\u{2019}' => 0x92,
                    '\u{201c}' => 0x93,
                    '\u{201d}' => 0x94,
                    '\u{2022}' => 0x95,
                    '\u{2013}' => 0x96,
                    '\u{2014}' => 0x97,
                    '\u{2dc}' => 0x98,
                    '\u{2122}' => 0x99,
                    '\u{161}' => 0x9A,
                    '\u{203a}' => 0x9B,
                    '\u{153}' => 0x9C,
                    '\u{17e}' => 0x9E,
                    '\u{178}' => 0x9F,
                    _ => {
                        log::warn!(
                            "The character {:?} is not representable in WinAnsi encoding, replacing it",
                            character
                        );
                        b'?'
                    }
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_the_afm_metrics() {
        assert_eq!(character_width(BuiltinFont::Helvetica, ' '), 278);
        assert_eq!(character_width(BuiltinFont::Helvetica, 'W'), 944);
        assert_eq!(character_width(BuiltinFont::Helvetica, 'i'), 222);
        assert_eq!(character_width(BuiltinFont::HelveticaBold, 'i'), 278);
        assert_eq!(character_width(BuiltinFont::HelveticaBold, '@'), 975);
        // The oblique face shares the regular widths.
        assert_eq!(
            character_width(BuiltinFont::HelveticaOblique, 'm'),
            character_width(BuiltinFont::Helvetica, 'm')
        );
    }

    #[test]
    fn string_width_scales_linearly_with_the_font_size() {
        let narrow = string_width("viridis", BuiltinFont::HelveticaBold, 6.0);
        let wide = string_width("viridis", BuiltinFont::HelveticaBold, 12.0);
        assert!((wide - 2.0 * narrow).abs() < 1e-4);
    }

    #[test]
    fn accented_letters_measure_like_their_base_letter() {
        assert_eq!(
            string_width("Müller", BuiltinFont::Helvetica, 10.0),
            string_width("Muller", BuiltinFont::Helvetica, 10.0)
        );
    }

    #[test]
    fn win_ansi_encoding_covers_latin_1_and_the_specials() {
        assert_eq!(encode_win_ansi("Cassida"), b"Cassida".to_vec());
        assert_eq!(encode_win_ansi("ä"), vec![0xE4]);
        assert_eq!(encode_win_ansi("–"), vec![0x96]);
        // Unmappable characters degrade to a question mark.
        assert_eq!(encode_win_ansi("甲"), vec![b'?']);
    }
}
