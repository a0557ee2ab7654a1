//! General purpose data compaction of GS1 element strings (ISO/IEC 24723
//! section 5.4, shared with GS1 DataBar Expanded).
//!
//! The compactor is a three state machine. Each state owns an ordered list of
//! rules and the first rule whose predicate holds at the cursor is applied.

use crate::bitfield::BitString;
use crate::error::{Error, Result};
use crate::FNC1;

const ALPHANUMERIC_PUNCTUATION: &[u8] = b"*,-./";
const ISO_PUNCTUATION: &[u8] = b"!\"%&'()*+,-./:;<=>?_ ";

/// Compaction state of the general field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneralFieldMode {
    #[default]
    Numeric,
    Alphanumeric,
    IsoIec,
}

/// Result of a general field compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralFieldOutcome {
    /// State at the end of the field.
    pub mode: GeneralFieldMode,
    /// Trailing digit left unencoded in numeric mode, as an ASCII digit.
    pub last_digit: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Numeric,
    Alphanumeric,
    IsoIec,
}

fn classify(c: u8) -> Option<CharClass> {
    match c {
        FNC1 | b'0'..=b'9' => Some(CharClass::Numeric),
        b'A'..=b'Z' => Some(CharClass::Alphanumeric),
        _ if ALPHANUMERIC_PUNCTUATION.contains(&c) => Some(CharClass::Alphanumeric),
        b'a'..=b'z' => Some(CharClass::IsoIec),
        _ if ISO_PUNCTUATION.contains(&c) => Some(CharClass::IsoIec),
        _ => None,
    }
}

struct Cursor<'a> {
    field: &'a [u8],
    position: usize,
}

impl Cursor<'_> {
    fn current(&self) -> u8 {
        self.field[self.position]
    }

    fn remaining(&self) -> usize {
        self.field.len() - self.position
    }

    fn class_at(&self, i: usize) -> Option<CharClass> {
        self.field.get(i).copied().and_then(classify)
    }

    /// The next `count` characters (cursor included) all belong to `accept`.
    fn next_all(&self, count: usize, accept: &[CharClass]) -> bool {
        self.remaining() >= count
            && (self.position..self.position + count)
                .all(|i| self.class_at(i).is_some_and(|c| accept.contains(&c)))
    }

    /// Between `min` and `max` characters remain and all are of `class`.
    fn ends_with_run(&self, min: usize, max: usize, class: CharClass) -> bool {
        (min..=max).contains(&self.remaining())
            && (self.position..self.field.len()).all(|i| self.class_at(i) == Some(class))
    }

    /// None of the next `count` characters (or up to the end) are of `class`.
    fn none_of(&self, count: usize, class: CharClass) -> bool {
        (self.position..self.field.len().min(self.position + count))
            .all(|i| self.class_at(i) != Some(class))
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    /// Two numeric characters in one 7-bit value.
    Pair,
    /// Leave the final digit to the caller.
    Defer,
    /// FNC1 outside numeric mode, also a latch to numeric.
    Separator,
    Latch { to: GeneralFieldMode, value: u32, width: u8 },
    /// Encode the character in the current state.
    Emit,
}

struct Rule {
    applies: fn(&Cursor<'_>) -> bool,
    action: Action,
}

const NUMERIC_RULES: &[Rule] = &[
    Rule {
        // FNC1 FNC1 would be 128, out of range
        applies: |c| c.next_all(2, &[CharClass::Numeric]) && !c.field[c.position..].starts_with(&[FNC1, FNC1]),
        action: Action::Pair,
    },
    Rule {
        applies: |c| c.remaining() == 1 && c.current().is_ascii_digit(),
        action: Action::Defer,
    },
    Rule {
        applies: |_| true,
        action: Action::Latch { to: GeneralFieldMode::Alphanumeric, value: 0b0000, width: 4 },
    },
];

const ALPHANUMERIC_RULES: &[Rule] = &[
    Rule {
        applies: |c| c.current() == FNC1,
        action: Action::Separator,
    },
    Rule {
        applies: |c| c.class_at(c.position) == Some(CharClass::IsoIec),
        action: Action::Latch { to: GeneralFieldMode::IsoIec, value: 0b00100, width: 5 },
    },
    Rule {
        applies: |c| c.next_all(6, &[CharClass::Numeric]),
        action: Action::Latch { to: GeneralFieldMode::Numeric, value: 0b000, width: 3 },
    },
    Rule {
        applies: |c| c.ends_with_run(4, 5, CharClass::Numeric),
        action: Action::Latch { to: GeneralFieldMode::Numeric, value: 0b000, width: 3 },
    },
    Rule {
        applies: |_| true,
        action: Action::Emit,
    },
];

const ISO_IEC_RULES: &[Rule] = &[
    Rule {
        applies: |c| c.current() == FNC1,
        action: Action::Separator,
    },
    Rule {
        applies: |c| c.none_of(10, CharClass::IsoIec) && c.next_all(4, &[CharClass::Numeric]),
        action: Action::Latch { to: GeneralFieldMode::Numeric, value: 0b000, width: 3 },
    },
    Rule {
        applies: |c| c.none_of(10, CharClass::IsoIec)
            && c.next_all(5, &[CharClass::Alphanumeric, CharClass::Numeric]),
        action: Action::Latch { to: GeneralFieldMode::Alphanumeric, value: 0b00100, width: 5 },
    },
    Rule {
        applies: |_| true,
        action: Action::Emit,
    },
];

fn digit_value(c: u8) -> u32 {
    if c == FNC1 { 10 } else { (c - b'0') as u32 }
}

fn alphanumeric_value(c: u8) -> Option<(u32, u8)> {
    match c {
        b'0'..=b'9' => Some((c as u32 - 43, 5)),
        b'A'..=b'Z' => Some((c as u32 - 33, 6)),
        _ => ALPHANUMERIC_PUNCTUATION.iter().position(|&p| p == c).map(|p| (p as u32 + 58, 6)),
    }
}

fn iso_value(c: u8) -> Option<(u32, u8)> {
    match c {
        b'0'..=b'9' => Some((c as u32 - 43, 5)),
        b'A'..=b'Z' => Some((c as u32 - 1, 7)),
        b'a'..=b'z' => Some((c as u32 - 7, 7)),
        _ => ISO_PUNCTUATION.iter().position(|&p| p == c).map(|p| (p as u32 + 232, 8)),
    }
}

/// Compacts `field` starting in `mode`, appending to `bits`. FNC1 separators
/// are represented by [FNC1]. A single digit left at the end in numeric mode
/// is not encoded but returned, its encoding depends on the space left in
/// the symbol.
pub fn encode_general_field(
    field: &[u8],
    mode: GeneralFieldMode,
    bits: &mut BitString,
) -> Result<GeneralFieldOutcome> {
    let mut cursor = Cursor { field, position: 0 };
    let mut mode = mode;
    let mut last_digit = None;

    while cursor.position < field.len() {
        let c = cursor.current();
        if classify(c).is_none() {
            return Err(Error::InvalidCharacter { position: cursor.position, byte: c });
        }

        let rules = match mode {
            GeneralFieldMode::Numeric => NUMERIC_RULES,
            GeneralFieldMode::Alphanumeric => ALPHANUMERIC_RULES,
            GeneralFieldMode::IsoIec => ISO_IEC_RULES,
        };
        let action = rules.iter()
            .find(|rule| (rule.applies)(&cursor))
            .map(|rule| rule.action)
            .ok_or(Error::InternalInvariantViolation("no general field rule applies"))?;

        match action {
            Action::Pair => {
                let d1 = digit_value(c);
                let d2 = digit_value(field[cursor.position + 1]);
                bits.push(11 * d1 + d2 + 8, 7);
                cursor.position += 2;
            }
            Action::Defer => {
                last_digit = Some(c);
                cursor.position += 1;
            }
            Action::Separator => {
                bits.push(0b01111, 5);
                mode = GeneralFieldMode::Numeric;
                cursor.position += 1;
            }
            Action::Latch { to, value, width } => {
                bits.push(value, width);
                mode = to;
            }
            Action::Emit => {
                let encoded = match mode {
                    GeneralFieldMode::Alphanumeric => alphanumeric_value(c),
                    GeneralFieldMode::IsoIec => iso_value(c),
                    GeneralFieldMode::Numeric => None,
                };
                let (value, width) = encoded
                    .ok_or(Error::InternalInvariantViolation("character outside the active general field alphabet"))?;
                bits.push(value, width);
                cursor.position += 1;
            }
        }
    }

    Ok(GeneralFieldOutcome { mode, last_digit })
}
