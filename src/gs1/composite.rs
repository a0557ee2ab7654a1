//! 2D component of GS1 Composite symbols (ISO/IEC 24723).
//!
//! The element string is turned into a bit string (encodation method, then
//! general field compaction, then padding to one of the sizes the selected
//! component supports) and the bit string into PDF417 family codewords.

use core::ops::Range;

use awint_core::{Bits, InlAwi};
use log::debug;

use crate::bitfield::BitString;
use crate::ecc;
use crate::error::{Error, Result};
use crate::high_level::{Pdf417Encoder, M_CC_IDENTIFIER};
use crate::tables::{CcaVariant, Variant, CCA_BIT_SIZES, CCB_BIT_SIZES};
use crate::FNC1;

use super::general_field::{encode_general_field, GeneralFieldMode};

type U80 = InlAwi<80, { Bits::unstable_raw_digits(80) }>;

/// Longest element string accepted by [encode_composite].
pub const MAX_INPUT_LEN: usize = 2990;
/// Longest bit string a CC-C component can carry.
pub const MAX_BITS: usize = 11805;

/// Letters of the AI 90 compressed form (Table 3).
const AI90_LETTERS: &[u8] = b"BDHIJKLNPQRSTVWZ";

/// Which 2D component to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    #[default]
    CcA,
    CcB,
    /// Only available above a GS1-128 linear component.
    CcC,
}

impl CompositeMode {
    /// Next larger component, `None` when no fallback exists.
    fn escalate(self, linear_width: Option<usize>) -> Option<Self> {
        match self {
            CompositeMode::CcA => Some(CompositeMode::CcB),
            CompositeMode::CcB if linear_width.is_some() => Some(CompositeMode::CcC),
            _ => None,
        }
    }
}

/// Options of the 2D component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeOptions {
    /// Smallest component to try, larger ones are used when the data does not fit.
    pub mode: CompositeMode,
    /// Number of data columns of CC-A and CC-B components (2, 3 or 4),
    /// given by the type of linear component.
    pub cc_width: u8,
    /// Width in modules of the GS1-128 linear component, enables CC-C.
    pub linear_width: Option<usize>,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeOptions {
    pub const fn new() -> Self {
        Self { mode: CompositeMode::CcA, cc_width: 4, linear_width: None }
    }

    pub const fn set_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn set_cc_width(mut self, cc_width: u8) -> Self {
        self.cc_width = cc_width;
        self
    }

    pub const fn set_linear_width(mut self, linear_width: usize) -> Self {
        self.linear_width = Some(linear_width);
        self
    }

    fn validate(&self) -> Result<()> {
        if !(2..=4).contains(&self.cc_width) {
            return Err(Error::InvalidOption("composite width must be 2, 3 or 4"));
        }
        match self.linear_width {
            Some(width) if width < 70 => Err(Error::InvalidOption("linear component too narrow for CC-C")),
            None if self.mode == CompositeMode::CcC => {
                Err(Error::InvalidOption("CC-C requires a GS1-128 linear component"))
            }
            _ => Ok(()),
        }
    }
}

/// Encoded 2D component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeSymbol {
    pub kind: CompositeMode,
    pub columns: usize,
    pub rows: usize,
    /// PDF417 error correction level, CC-C only.
    pub ecc_level: Option<u8>,
    /// Padded bit string.
    pub bits: BitString,
    /// Data and check codewords, row by row.
    pub codewords: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Target {
    bits: usize,
    columns: usize,
    ecc_level: Option<u8>,
}

/// Compressed data field written ahead of the general field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Encodation {
    /// First input byte of the general field.
    read: usize,
    /// Encode an FNC1 before the general field.
    separator: bool,
    /// Input bytes left out of the general field (AI 21 or AI 8004).
    crop: Range<usize>,
    /// Alpha encodation of AI 90 needs a terminating FNC1 if nothing follows.
    alpha_pad: bool,
    mode: GeneralFieldMode,
}

impl Encodation {
    fn general(read: usize) -> Self {
        Self { read, separator: false, crop: 0..0, alpha_pad: false, mode: GeneralFieldMode::Numeric }
    }
}

/// Encodes the reduced element string `data` (AIs without brackets, FNC1 as
/// [FNC1]) as a 2D component, falling back to larger components when the
/// data does not fit the requested one.
pub fn encode_composite(data: &[u8], options: &CompositeOptions) -> Result<CompositeSymbol> {
    if data.len() > MAX_INPUT_LEN {
        return Err(Error::CapacityExceeded { needed: data.len(), capacity: MAX_INPUT_LEN });
    }
    options.validate()?;

    let mut kind = options.mode;
    loop {
        match compact(data, kind, options) {
            Ok((bits, target)) => return build(kind, bits, target),
            Err(err @ Error::CapacityExceeded { .. }) => match kind.escalate(options.linear_width) {
                Some(next) => {
                    debug!("{kind:?} too small ({err}), trying {next:?}");
                    kind = next;
                }
                None => return Err(err),
            },
            Err(err) => return Err(err),
        }
    }
}

/// Padded size for a bit string of `length` bits.
fn target_size(kind: CompositeMode, length: usize, options: &CompositeOptions) -> Option<Target> {
    let sizes = match kind {
        CompositeMode::CcA => CCA_BIT_SIZES[options.cc_width as usize - 2],
        CompositeMode::CcB => CCB_BIT_SIZES[options.cc_width as usize - 2],
        CompositeMode::CcC => return ccc_target_size(length, options.linear_width?),
    };
    sizes.iter()
        .map(|&s| s as usize)
        .find(|&s| length <= s)
        .map(|bits| Target { bits, columns: options.cc_width as usize, ecc_level: None })
}

fn capacity(kind: CompositeMode, options: &CompositeOptions) -> usize {
    let sizes = match kind {
        CompositeMode::CcA => CCA_BIT_SIZES[options.cc_width as usize - 2],
        CompositeMode::CcB => CCB_BIT_SIZES[options.cc_width as usize - 2],
        CompositeMode::CcC => return MAX_BITS,
    };
    sizes.last().map_or(0, |&s| s as usize)
}

/// CC-C size: the error correction level follows the recommended minimum
/// for the data length, the width follows the linear component and grows
/// when the symbol would exceed 30 rows.
fn ccc_target_size(length: usize, linear_width: usize) -> Option<Target> {
    let bytes = length.div_ceil(8);
    let mut used = (bytes / 6) * 5 + bytes % 6;

    let level = if used <= 40 {
        2
    } else if used <= 160 {
        3
    } else if used <= 320 {
        4
    } else if used <= 833 {
        5
    } else if used <= 865 {
        4
    } else {
        return None;
    };
    let ecc_count = ecc::ecc_count(level);
    // length descriptor, CC identifier and byte latch
    used += ecc_count + 3;

    let mut columns = ((linear_width - 53) / 17).min(30);
    let mut rows = used.div_ceil(columns);
    while rows > 30 && columns < 30 {
        columns += 1;
        rows = used.div_ceil(columns);
    }
    if rows > 30 {
        return None;
    }
    let rows = rows.max(3);

    let codewords = columns * rows - ecc_count - 3;
    let bytes = 6 * (codewords / 5) + codewords % 5;
    Some(Target { bits: 8 * bytes, columns, ecc_level: Some(level) })
}

/// Builds the padded bit string of `data` for a `kind` component.
fn compact(data: &[u8], kind: CompositeMode, options: &CompositeOptions) -> Result<(BitString, Target)> {
    let mut bits = BitString::with_capacity(13 * data.len() + 500);
    let encodation = encodation_method(data, &mut bits);

    let mut general = Vec::with_capacity(data.len() + 1);
    if encodation.separator {
        general.push(FNC1);
    }
    general.extend(data.iter().enumerate()
        .skip(encodation.read)
        .filter(|(i, _)| !encodation.crop.contains(i))
        .map(|(_, &c)| c));
    let alpha_pad = encodation.alpha_pad && general.is_empty();

    let outcome = encode_general_field(&general, encodation.mode, &mut bits)?;

    let too_long = |needed: usize| Error::CapacityExceeded { needed, capacity: capacity(kind, options) };
    let target = target_size(kind, bits.len(), options).ok_or_else(|| too_long(bits.len()))?;

    if let Some(digit) = outcome.last_digit {
        let digit = (digit - b'0') as u32;
        let remainder = target.bits - bits.len();
        if (4..=6).contains(&remainder) {
            bits.push(digit + 1, 4);
            bits.push(0, (remainder - 4) as u8);
        } else {
            // may push the symbol to the next size
            bits.push(11 * digit + 18, 7);
        }
    }

    if bits.len() > MAX_BITS {
        return Err(Error::CapacityExceeded { needed: bits.len(), capacity: MAX_BITS });
    }
    let target = target_size(kind, bits.len(), options).ok_or_else(|| too_long(bits.len()))?;

    if bits.len() < target.bits {
        if alpha_pad {
            bits.push_str("11111");
        }
        if outcome.mode == GeneralFieldMode::Numeric {
            bits.push_str("0000");
        }
        while bits.len() < target.bits {
            bits.push_str("00100");
        }
        bits.truncate(target.bits);
    }

    Ok((bits, target))
}

/// Writes the encodation method field and any compressed data.
fn encodation_method(data: &[u8], bits: &mut BitString) -> Encodation {
    let compressed = match data {
        [b'1', b'0' | b'1' | b'7', ..] => date_and_lot(data, bits),
        [b'9', b'0', ..] => ai90(data, bits),
        _ => None,
    };
    compressed.unwrap_or_else(|| {
        bits.push_str("0");
        Encodation::general(0)
    })
}

/// Encodation method "10": production or expiration date, lot number.
fn date_and_lot(data: &[u8], bits: &mut BitString) -> Option<Encodation> {
    if data[1] == b'0' {
        // lot number without date
        bits.push_str("1011");
        return Some(Encodation::general(2));
    }

    let date = data.get(2..8).filter(|d| d.iter().all(u8::is_ascii_digit))?;
    let pair = |i: usize| ((date[i] - b'0') * 10 + (date[i + 1] - b'0')) as u32;
    let (year, month, day) = (pair(0), pair(2), pair(4));
    if month == 0 {
        return None;
    }

    bits.push_str("10");
    bits.push(year * 384 + (month - 1) * 32 + day, 16);
    bits.push((data[1] == b'7') as u32, 1);

    let mut encodation = Encodation::general(8);
    if data[8..].starts_with(b"10") {
        encodation.read = 10;
    } else if data.len() > 8 {
        // an FNC1 already present in the input separates the next AI
        encodation.separator = data[8] != FNC1;
    } else {
        // the FNC1 is still required: alphanumeric latch then FNC1, which
        // leaves the general field in numeric mode
        bits.push_str("000001111");
    }
    Some(encodation)
}

/// Encodation method "11": AI 90 starting with up to 3 digits then an
/// uppercase letter.
fn ai90(data: &[u8], bits: &mut BitString) -> Option<Encodation> {
    let end = data[2..].iter().position(|&c| c == FNC1).map_or(data.len(), |p| p + 2);
    let ninety = &data[2..end];

    let letter = ninety.iter().take(4).position(u8::is_ascii_uppercase)?;
    if !ninety[..letter].iter().all(u8::is_ascii_digit) || (letter > 0 && ninety[0] == b'0') {
        return None;
    }

    let alpha = ninety.iter().filter(|c| c.is_ascii_uppercase()).count() - 1;
    let numeric = ninety.iter().filter(|c| c.is_ascii_digit()).count() - letter;
    let other = ninety.len() - (alpha + 1) - (numeric + letter);

    bits.push_str("11");
    let mut encodation = Encodation::general(letter + 3);
    if other == 0 && alpha > numeric {
        bits.push_str("11");
        encodation.alpha_pad = true;
    } else if other == 0 && alpha == 0 {
        bits.push_str("10");
    } else {
        bits.push_str("0");
        encodation.mode = GeneralFieldMode::Alphanumeric;
    }

    let next = data.get(end + 1..).filter(|_| data.get(end) == Some(&FNC1)).unwrap_or_default();
    if next.starts_with(b"21") {
        bits.push_str("10");
        encodation.crop = end + 1..end + 3;
    } else if next.starts_with(b"8004") {
        bits.push_str("11");
        encodation.crop = end + 1..end + 5;
    } else {
        bits.push_str("0");
    }

    let value = ninety[..letter].iter().fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
    let code = ninety[letter];
    match AI90_LETTERS.iter().position(|&l| l == code) {
        Some(index) if value < 31 => {
            bits.push(value, 5);
            bits.push(index as u32, 4);
        }
        _ => {
            bits.push(31, 5);
            bits.push(value, 10);
            bits.push((code - b'A') as u32, 5);
        }
    }

    if encodation.alpha_pad {
        // alpha encodation of the rest of the AI 90 field
        while let Some(&c) = data.get(encodation.read) {
            encodation.read += 1;
            match c {
                b'A'..=b'Z' => bits.push((c - b'A') as u32, 5),
                b'0'..=b'9' => bits.push(c as u32 + 4, 6),
                FNC1 => {
                    bits.push(31, 5);
                    break;
                }
                _ => {}
            }
        }
    }

    Some(encodation)
}

/// Converts groups of 69 bits to base 928, `bits / 10 + 1` codewords per
/// group, most significant first.
fn encode928(bits: &[bool]) -> Option<Vec<u16>> {
    let mut one = U80::zero();
    one.uone_();

    let mut codewords = Vec::with_capacity(bits.len() / 10 + 7);
    for group in bits.chunks(69) {
        let mut value = U80::zero();
        for &bit in group {
            value.shl_(1)?;
            if bit {
                value.add_(&one)?;
            }
        }

        let count = group.len() / 10 + 1;
        let start = codewords.len();
        codewords.resize(start + count, 0);
        for n in (0..count).rev() {
            codewords[start + n] = value.digit_udivide_inplace_(928)? as u16;
        }
        debug_assert!(value.is_zero());
    }
    Some(codewords)
}

fn build(kind: CompositeMode, bits: BitString, target: Target) -> Result<CompositeSymbol> {
    let columns = target.columns;
    let (rows, codewords) = match kind {
        CompositeMode::CcA => {
            let mut codewords = encode928(bits.as_slice())
                .ok_or(Error::InternalInvariantViolation("bit group does not fit base 928 conversion"))?;
            let variant = CcaVariant::find(columns as u8, codewords.len())
                .ok_or(Error::InternalInvariantViolation("no CC-A variant for codeword count"))?;
            debug!("CC-A {}x{}, {} data codewords, {} check codewords", columns, variant.rows, variant.data, variant.ecc);

            let ecc_count = variant.ecc as usize;
            codewords.resize(codewords.len() + ecc_count, 0);
            ecc::generate_micro_ecc(&mut codewords, ecc_count);
            (variant.rows as usize, codewords)
        }
        CompositeMode::CcB => {
            let encoder = Pdf417Encoder::new(true)
                .append_codeword(M_CC_IDENTIFIER)
                .append_bytes(&bits.to_bytes());
            let variant = Variant::with_capacity(columns as u8, encoder.count())
                .ok_or(Error::InternalInvariantViolation("no CC-B variant for codeword count"))?;
            debug!("CC-B {}x{}, {} data codewords", columns, variant.rows, encoder.count());
            (variant.rows as usize, encoder.seal_micro(variant))
        }
        CompositeMode::CcC => {
            let level = target.ecc_level
                .ok_or(Error::InternalInvariantViolation("CC-C size without error correction level"))?;
            let codewords = Pdf417Encoder::new(false)
                .append_codeword(M_CC_IDENTIFIER)
                .append_bytes(&bits.to_bytes())
                .seal(level, columns);
            debug!("CC-C {}x{}, ECC level {}", columns, codewords.len() / columns, level);
            (codewords.len() / columns, codewords)
        }
    };

    Ok(CompositeSymbol { kind, columns, rows, ecc_level: target.ecc_level, bits, codewords })
}
