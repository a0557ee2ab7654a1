//! Adaptive compaction of Ultracode data.
//!
//! Each position of the input is scored in the three compaction modes over
//! a fixed look-ahead window, then runs of positions that chose the same
//! mode are encoded as one segment.

use log::trace;

use crate::error::{Error, Result};
use crate::FNC1;

use super::fragment::{self, find_fragment, fragment_len};
use super::UltraOptions;

/// Number of characters simulated when scoring a position.
pub const LOOKAHEAD: usize = 12;
/// Highest ECI that can be written after the start codeword.
pub const MAX_ECI: u32 = 898;

/// Leaves the current mode (back to 8-bit or the symbol mode).
const UNLATCH: u16 = 282;
const LATCH_ASCII: u16 = 267;
const FNC1_EIGHT_BIT: u16 = 268;
const FNC1_ASCII: u16 = 272;
/// C43 latches, subset 1 then subset 2.
const LATCH_C43_FROM_EIGHT_BIT: [u16; 2] = [260, 266];
const LATCH_C43_FROM_ASCII: [u16; 2] = [278, 280];
const TEMPORARY_LATCH_BASE: [u16; 2] = [256, 262];
const TEMPORARY_LATCH_FROM_ASCII: u16 = 274;

const START_ASCII: u16 = 272;
const START_GS1: u16 = 273;
const START_EIGHT_BIT: u16 = 257;
const START_HTTP: u16 = 281;
const START_HTTPS: u16 = 282;
const FNC3_ASCII: u16 = 271;
const FNC3_EIGHT_BIT: u16 = 269;
const MACRO_06_ASCII: u16 = 273;
const MACRO_06_EIGHT_BIT: u16 = 271;

const C43_SHIFT: u16 = 41;
/// Latch to the other C43 subset, doubles as padding.
const C43_LATCH: u16 = 42;

const C43_SET1: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 .,%";
const C43_SET2: &[u8] = b"abcdefghijklmnopqrstuvwxyz:/?#[]@=_~!.,-";
const C43_SET3: &[u8] = b"{}`()\"+'<>|$;&\\^*";
/// Characters that pair up in ASCII mode: digits, decimal point, delimiter.
const ULTRA_DIGITS: &[u8] = b"0123456789,/";

const MACRO_06_HEADER: &[u8] = b"[)>\x1E06\x1D";
const MACRO_06_TRAILER: &[u8] = b"\x1E\x04";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    EightBit,
    Ascii,
    C43,
}

impl Mode {
    fn symbol(self) -> char {
        match self {
            Mode::EightBit => '8',
            Mode::Ascii => 'a',
            Mode::C43 => 'c',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subset {
    One,
    Two,
    /// Extended punctuation and fragments, only reached through a shift.
    Three,
}

/// Codewords produced by one encoder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub codewords: Vec<u16>,
    /// Number of input bytes covered by `codewords`.
    pub consumed: usize,
    /// Mode the decoder is left in.
    pub mode: Mode,
}

impl Segment {
    fn empty(mode: Mode) -> Self {
        Self { codewords: Vec::new(), consumed: 0, mode }
    }

    /// Compares `consumed / codewords` ratios, an empty segment scores 0.
    fn beats(&self, other: &Segment) -> bool {
        if self.codewords.is_empty() {
            return false;
        }
        if other.codewords.is_empty() {
            return self.consumed > 0;
        }
        self.consumed * other.codewords.len() > other.consumed * self.codewords.len()
    }
}

fn c43_value(set: &[u8], c: u8) -> Result<u16> {
    set.iter()
        .position(|&x| x == c)
        .map(|i| i as u16)
        .ok_or(Error::InternalInvariantViolation("character missing from its C43 subset"))
}

/// Latch macro replacing a leading URL scheme, with the number of bytes it
/// stands for.
fn url_macro(index: usize) -> Option<(u16, usize)> {
    let index = match index {
        fragment::HTTP_WWW => fragment::HTTP,
        fragment::HTTPS_WWW => fragment::HTTPS,
        index => index,
    };
    let codeword = match index {
        fragment::MAILTO => 276,
        fragment::TEL => 277,
        fragment::FILE => 278,
        fragment::HTTP => 279,
        fragment::HTTPS => 280,
        fragment::FTP => 281,
        _ => return None,
    };
    Some((codeword, fragment_len(index)))
}

/// Encoders over the data that follows the start codeword.
pub struct Compactor<'a> {
    source: &'a [u8],
    /// Mode implied by the start codeword.
    symbol_mode: Mode,
    gs1: bool,
}

impl<'a> Compactor<'a> {
    pub fn new(source: &'a [u8], symbol_mode: Mode, gs1: bool) -> Self {
        Self { source, symbol_mode, gs1 }
    }

    fn subset_at(&self, position: usize) -> Option<Subset> {
        let c = self.source[position];
        if find_fragment(self.source, position).is_some_and(|f| f != fragment::FILE)
            || C43_SET3.contains(&c) {
            Some(Subset::Three)
        } else if C43_SET2.contains(&c) {
            Some(Subset::Two)
        } else if C43_SET1.contains(&c) {
            Some(Subset::One)
        } else {
            None
        }
    }

    /// One codeword per byte, at least one byte.
    pub fn eight_bit(&self, position: usize, current: Mode, end: usize) -> Segment {
        let mut codewords = Vec::with_capacity(LOOKAHEAD + 1);
        if current != Mode::EightBit {
            codewords.push(UNLATCH);
        }

        let end = end.min(self.source.len()).max(position + 1);
        codewords.extend(self.source[position..end].iter().map(|&c| match c {
            FNC1 if self.gs1 => FNC1_EIGHT_BIT,
            c => c as u16,
        }));

        Segment { codewords, consumed: end - position, mode: Mode::EightBit }
    }

    /// 7-bit bytes, with digit pairs compressed to one codeword.
    pub fn ascii(&self, position: usize, current: Mode, end: usize) -> Segment {
        let mut codewords = Vec::with_capacity(LOOKAHEAD + 2);
        match current {
            Mode::EightBit => codewords.push(LATCH_ASCII),
            Mode::C43 => {
                codewords.push(UNLATCH);
                if self.symbol_mode == Mode::EightBit {
                    codewords.push(LATCH_ASCII);
                }
            }
            Mode::Ascii => {}
        }

        let end = end.min(self.source.len());
        let digit = |i: usize| ULTRA_DIGITS.iter().position(|&d| d == self.source[i]);
        let mut i = position;
        while i < end && self.source[i] < 0x80 {
            if i + 1 < end {
                let pair = match (digit(i), digit(i + 1)) {
                    (Some(a @ 0..=9), Some(b @ 0..=9)) => Some(10 * a + b + 128),
                    (Some(a @ 0..=9), Some(10)) => Some(a + 228),
                    (Some(10), Some(b @ 0..=9)) => Some(b + 238),
                    (Some(a @ 0..=10), Some(11)) => Some(a + 248),
                    (Some(11), Some(b @ 0..=10)) => Some(b + 259),
                    _ => None,
                };
                if let Some(pair) = pair {
                    codewords.push(pair as u16);
                    i += 2;
                    continue;
                }
            }

            codewords.push(match self.source[i] {
                FNC1 if self.gs1 => FNC1_ASCII,
                c => c as u16,
            });
            i += 1;
        }

        Segment { codewords, consumed: i - position, mode: Mode::Ascii }
    }

    /// Three subset values per two codewords. Returns an empty segment when
    /// the first byte has no C43 representation.
    pub fn c43(&self, position: usize, current: Mode, end: usize) -> Result<Segment> {
        let Some(first) = self.subset_at(position) else {
            return Ok(Segment::empty(current));
        };
        // subset the decoder is latched to, a latch to subset 2 also
        // covers a leading shift
        let mut latched = if first == Subset::One { Subset::One } else { Subset::Two };
        let latch_index = (latched == Subset::Two) as usize;

        let mut codewords = Vec::with_capacity(LOOKAHEAD + 1);
        let mut i = position;
        match current {
            Mode::EightBit => match find_fragment(self.source, i).and_then(url_macro) {
                Some((codeword, len)) => {
                    codewords.push(codeword);
                    i += len;
                    latched = Subset::Two;
                }
                None => codewords.push(LATCH_C43_FROM_EIGHT_BIT[latch_index]),
            },
            Mode::Ascii => codewords.push(LATCH_C43_FROM_ASCII[latch_index]),
            Mode::C43 => {}
        }

        let end = end.min(self.source.len());
        let mut values = Vec::with_capacity(2 * LOOKAHEAD);
        while i < end {
            let Some(mut subset) = self.subset_at(i) else { break };
            let c = self.source[i];
            // period and comma belong to both subsets
            if subset == Subset::Two && latched == Subset::One && matches!(c, b'.' | b',') {
                subset = Subset::One;
            }
            if subset != Subset::Three && subset != latched {
                values.push(C43_LATCH);
                latched = subset;
            }

            match subset {
                Subset::One => {
                    values.push(c43_value(C43_SET1, c)?);
                    i += 1;
                }
                Subset::Two => {
                    values.push(c43_value(C43_SET2, c)?);
                    i += 1;
                }
                Subset::Three => {
                    values.push(C43_SHIFT);
                    match find_fragment(self.source, i).filter(|&f| f != fragment::FILE) {
                        Some(f) if f <= fragment::TEL => {
                            values.push(f as u16);
                            i += fragment_len(f);
                        }
                        Some(f) => {
                            values.push(f as u16 + 17);
                            i += fragment_len(f);
                        }
                        None => {
                            values.push(19 + c43_value(C43_SET3, c)?);
                            i += 1;
                        }
                    }
                }
            }
        }

        while values.len() % 3 != 0 {
            values.push(C43_LATCH);
        }
        for triple in values.chunks_exact(3) {
            let value = 43 * 43 * triple[0] as u32 + 43 * triple[1] as u32 + triple[2] as u32;
            codewords.push((value / 282) as u16);
            codewords.push((value % 282) as u16);
        }

        Ok(Segment { codewords, consumed: i - position, mode: Mode::C43 })
    }

    /// Replaces the leading C43 latch of a short segment by a temporary
    /// latch, which leaves the decoder in `current` afterwards.
    fn temporary_latch(segment: &mut Segment, current: Mode) {
        let len = segment.codewords.len();
        if !(5..=11).contains(&len) {
            return;
        }
        let offset = (len as u16 - 5) / 2;
        let first = &mut segment.codewords[0];
        *first = match (current, *first) {
            (Mode::EightBit, cw) if cw == LATCH_C43_FROM_EIGHT_BIT[0] => TEMPORARY_LATCH_BASE[0] + offset,
            (Mode::EightBit, cw) if cw == LATCH_C43_FROM_EIGHT_BIT[1] => TEMPORARY_LATCH_BASE[1] + offset,
            (Mode::Ascii, cw) if cw == LATCH_C43_FROM_ASCII[0] => TEMPORARY_LATCH_FROM_ASCII + offset,
            _ => return,
        };
        segment.mode = current;
    }

    /// Chooses a mode for every position.
    fn mode_trace(&self) -> Result<Vec<Mode>> {
        let mut modes = Vec::with_capacity(self.source.len());
        let mut current = self.symbol_mode;

        for position in 0..self.source.len() {
            let end = position + LOOKAHEAD;
            let eight_bit = self.eight_bit(position, current, end);
            let ascii = self.ascii(position, current, end);
            let c43 = self.c43(position, current, end)?;

            current = if c43.beats(&ascii) && c43.beats(&eight_bit) {
                Mode::C43
            } else if eight_bit.beats(&ascii) && eight_bit.beats(&c43) {
                Mode::EightBit
            } else {
                Mode::Ascii
            };
            modes.push(current);
        }

        trace!("mode trace: {}", modes.iter().map(|m| m.symbol()).collect::<String>());
        Ok(modes)
    }

    /// Encodes the whole input, one segment per run of equal modes.
    pub fn compact(&self) -> Result<Vec<u16>> {
        let modes = self.mode_trace()?;

        let mut codewords = Vec::with_capacity(2 * self.source.len());
        let mut current = self.symbol_mode;
        let mut position = 0;
        while position < self.source.len() {
            let mode = modes[position];
            let block_end = position + modes[position..].iter().take_while(|&&m| m == mode).count();

            let mut segment = match mode {
                Mode::EightBit => self.eight_bit(position, current, block_end),
                Mode::Ascii => self.ascii(position, current, block_end),
                Mode::C43 => {
                    // a fragment ran over the previous block, restart from
                    // a known subset
                    if current == Mode::C43 {
                        codewords.push(UNLATCH);
                        current = self.symbol_mode;
                    }
                    let mut segment = self.c43(position, current, block_end)?;
                    Self::temporary_latch(&mut segment, current);
                    segment
                }
            };
            if segment.consumed == 0 {
                segment = self.eight_bit(position, current, position + 1);
            }

            trace!("{:?} segment at {}: {:?}", mode, position, segment.codewords);
            codewords.extend_from_slice(&segment.codewords);
            current = segment.mode;
            position += segment.consumed;
        }

        Ok(codewords)
    }
}

/// Start codeword(s), followed by the compacted data.
pub fn generate_codewords(data: &[u8], options: &UltraOptions) -> Result<Vec<u16>> {
    if options.eci > MAX_ECI {
        return Err(Error::EciOutOfRange { eci: options.eci, max: MAX_ECI });
    }

    let mut symbol_mode = if data.iter().any(|&c| c >= 0x80) { Mode::EightBit } else { Mode::Ascii };
    let mut codewords = Vec::with_capacity(2 * data.len() + 3);
    let mut skip = 0;

    if options.reader_init {
        codewords.extend_from_slice(match symbol_mode {
            Mode::Ascii => &[START_ASCII, FNC3_ASCII],
            _ => &[START_EIGHT_BIT, FNC3_EIGHT_BIT],
        });
    } else {
        let eci = options.eci;
        match symbol_mode {
            Mode::Ascii if options.gs1 => codewords.push(START_GS1),
            Mode::Ascii => codewords.push(START_ASCII),
            // ISO/IEC 8859 parts, there is no part 12
            _ if (3..=18).contains(&eci) && eci != 14 => {
                let start = START_EIGHT_BIT + (eci - 3) as u16;
                codewords.push(if start > 267 { start - 1 } else { start });
            }
            _ if eci > 18 => codewords.extend_from_slice(&[273 + (eci / 256) as u16, (eci % 256) as u16]),
            _ => codewords.push(START_EIGHT_BIT),
        }

        if matches!(codewords[0], START_EIGHT_BIT | START_ASCII) {
            match find_fragment(data, 0) {
                Some(fragment::HTTP | fragment::HTTP_WWW) => {
                    codewords[0] = START_HTTP;
                    skip = fragment_len(fragment::HTTP);
                    symbol_mode = Mode::EightBit;
                }
                Some(fragment::HTTPS | fragment::HTTPS_WWW) => {
                    codewords[0] = START_HTTPS;
                    skip = fragment_len(fragment::HTTPS);
                    symbol_mode = Mode::EightBit;
                }
                _ => {}
            }
        }
    }

    let source = if data.len() >= MACRO_06_HEADER.len() + MACRO_06_TRAILER.len()
        && data.starts_with(MACRO_06_HEADER)
        && data.ends_with(MACRO_06_TRAILER)
    {
        codewords.push(match symbol_mode {
            Mode::EightBit => MACRO_06_EIGHT_BIT,
            _ => MACRO_06_ASCII,
        });
        &data[MACRO_06_HEADER.len()..data.len() - MACRO_06_TRAILER.len()]
    } else {
        &data[skip..]
    };

    let compacted = Compactor::new(source, symbol_mode, options.gs1).compact()?;
    codewords.extend(compacted);
    Ok(codewords)
}
