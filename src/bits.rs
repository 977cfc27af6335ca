//! Bit-field primitives over a 32-bit instruction word.
//!
//! Fields are addressed the way instruction manuals draw them: by the
//! position of their most significant bit (`hi`, 31 = MSB) and a width.
//! A field with `hi = 15, width = 16` is the low half-word.

use bitvec::prelude::*;
use std::ops::Range;

/// Bit indices (in MSB-first order) covered by the field ending at `hi`.
#[inline]
fn span(hi: u8, width: u8) -> Range<usize> {
    debug_assert!(width >= 1 && width <= 32, "field width {width} out of range");
    debug_assert!(hi < 32 && width <= hi + 1, "field [{hi}; {width}] exceeds the word");
    let start = 31 - hi as usize;
    start..start + width as usize
}

/// All-ones mask for a field `width` bits wide.
#[inline]
pub fn mask(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Writes `value` into the `width` bits ending at `hi`. Other bits are
/// left untouched; bits of `value` above `width` are discarded.
pub fn set_field(word: u32, hi: u8, width: u8, value: u32) -> u32 {
    debug_assert!(value <= mask(width), "{value:#x} does not fit in {width} bits");
    let mut word = word;
    word.view_bits_mut::<Msb0>()[span(hi, width)].store_be(value & mask(width));
    word
}

/// Writes a literal such as `"100011"` into the bits ending at `hi`; the
/// literal's length is the field width.
pub fn set_field_literal(word: u32, hi: u8, literal: &str) -> u32 {
    let mut word = word;
    let bits = &mut word.view_bits_mut::<Msb0>()[span(hi, literal.len() as u8)];
    for (i, c) in literal.bytes().enumerate() {
        debug_assert!(c == b'0' || c == b'1', "literal {literal:?} is not binary");
        bits.set(i, c == b'1');
    }
    word
}

/// Reads the unsigned value stored in the `width` bits ending at `hi`.
pub fn get_field(word: u32, hi: u8, width: u8) -> u32 {
    word.view_bits::<Msb0>()[span(hi, width)].load_be::<u32>()
}

/// Checks `word` against a `0`/`1`/`x` pattern whose first character sits
/// at bit `hi`. `x` positions match anything.
pub fn match_field(word: u32, hi: u8, pattern: &str) -> bool {
    let bits = &word.view_bits::<Msb0>()[span(hi, pattern.len() as u8)];
    pattern.bytes().zip(bits.iter().by_vals()).all(|(p, b)| match p {
        b'x' => true,
        b'0' => !b,
        b'1' => b,
        _ => false,
    })
}

/// Sign-extends the low `width` bits of `value`.
#[inline]
pub fn sign_extend(value: u32, width: u8) -> i32 {
    let s = 32 - width as u32;
    ((value << s) as i32) >> s
}
