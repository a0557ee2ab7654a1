//! Final Ultracode codeword stream: housekeeping codewords, check
//! codewords, data and padding.

use log::debug;

use crate::ecc::encode_rs;
use crate::error::{Error, Result};
use crate::field::{FieldContext, GeneratorPolynomial};

/// Highest Ultracode error correction level.
pub const MAX_ECC_LEVEL: u8 = 5;
/// Data, check and count codewords of the largest symbol.
pub const MAX_CODEWORDS: usize = 282;

/// Separates the check codewords from the data region.
const SEPARATOR: u16 = 283;
const PAD: u16 = 284;

/// Ultracode codewords ready for placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UltraSymbol {
    pub rows: usize,
    pub columns: usize,
    pub ecc_level: u8,
    /// Start codeword followed by the compacted data.
    pub data_codewords: Vec<u16>,
    pub ecc_codewords: Vec<u16>,
    /// Complete stream, in placement order.
    pub codewords: Vec<u16>,
}

/// Number of misdecode protection codewords (P).
#[inline]
const fn misdecode_count(ecc_level: u8) -> usize {
    if ecc_level == 0 { 0 } else { 3 }
}

/// Number of check codewords (Q) for `data_len` codewords.
pub const fn ecc_count(data_len: usize, ecc_level: u8) -> usize {
    ecc_level as usize * data_len.div_ceil(25) + misdecode_count(ecc_level) + 2
}

fn rows_for(total: usize) -> usize {
    match total {
        0..=33 => 2,
        34..=81 => 3,
        82..=157 => 4,
        _ => 5,
    }
}

/// Builds the codeword stream of `data` (start codeword first).
pub fn assemble(data: &[u16], ecc_level: u8) -> Result<UltraSymbol> {
    if ecc_level > MAX_ECC_LEVEL {
        return Err(Error::InvalidOption("Ultracode ECC level must be between 0 and 5"));
    }
    let Some((&start, body)) = data.split_first() else {
        return Err(Error::InternalInvariantViolation("missing start codeword"));
    };

    let q = ecc_count(data.len(), ecc_level);
    let total = data.len() + q;
    if total > MAX_CODEWORDS {
        return Err(Error::CapacityExceeded { needed: total, capacity: MAX_CODEWORDS });
    }

    let rows = rows_for(total);
    let columns = total.div_ceil(rows);
    let pads = rows * columns - total;

    let mcc = (data.len() + 2) as u16;
    let acc = (q - misdecode_count(ecc_level)) as u16;

    let field = FieldContext::gf283();
    let generator = GeneratorPolynomial::new(field, q);
    let mut message = Vec::with_capacity(data.len() + 2);
    message.extend_from_slice(&[start, mcc, acc]);
    message.extend_from_slice(body);
    let ecc_codewords = encode_rs(field, &generator, &message);

    debug!("Ultracode {}x{}, {} data codewords, {} check codewords, {} pads", rows, columns, data.len(), q, pads);

    let mut codewords = Vec::with_capacity(total + 5 + pads);
    codewords.extend_from_slice(&[start, mcc]);
    codewords.extend_from_slice(&ecc_codewords);
    codewords.extend_from_slice(&[mcc + q as u16, SEPARATOR, acc]);
    codewords.extend_from_slice(body);
    codewords.resize(codewords.len() + pads, PAD);
    codewords.push(q as u16);

    Ok(UltraSymbol {
        rows,
        columns,
        ecc_level,
        data_codewords: data.to_vec(),
        ecc_codewords,
        codewords,
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{assemble, ecc_count};
    use crate::error::Error;

    const DIGITS: [u16; 6] = [272, 140, 162, 184, 206, 218];

    #[test_case(6, 0, 2)]
    #[test_case(6, 2, 7)]
    #[test_case(25, 1, 6)]
    #[test_case(26, 1, 7)]
    #[test_case(200, 5, 45)]
    fn test_ecc_count(data_len: usize, level: u8, expected: usize) {
        assert_eq!(ecc_count(data_len, level), expected);
    }

    #[test]
    fn test_assemble_default_level() {
        let symbol = assemble(&DIGITS, 2).unwrap();
        assert_eq!((symbol.rows, symbol.columns), (2, 7));
        assert_eq!(symbol.ecc_codewords, [170, 181, 122, 145, 178, 70, 229]);
        assert_eq!(symbol.codewords, [
            272, 8,
            170, 181, 122, 145, 178, 70, 229,
            15, 283, 4,
            140, 162, 184, 206, 218,
            284,
            7
        ]);
    }

    #[test]
    fn test_assemble_level_0() {
        let symbol = assemble(&DIGITS, 0).unwrap();
        assert_eq!((symbol.rows, symbol.columns), (2, 4));
        // no misdecode protection, ACC equals Q
        assert_eq!(symbol.codewords, [272, 8, 236, 183, 10, 283, 2, 140, 162, 184, 206, 218, 2]);
    }

    #[test]
    fn test_assemble_largest() {
        let mut data = vec![257];
        data.extend(std::iter::repeat(233).take(240));
        let symbol = assemble(&data, 2).unwrap();
        assert_eq!((symbol.rows, symbol.columns), (5, 54));
        assert_eq!(symbol.codewords.len(), 275);
        assert_eq!(symbol.codewords[..3], [257, 243, 175]);
        assert_eq!(symbol.codewords[269..], [233, 284, 284, 284, 284, 25]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut data = vec![257];
        data.extend(std::iter::repeat(233).take(260));
        let err = assemble(&data, 2).unwrap_err();
        assert_eq!(err, Error::CapacityExceeded { needed: 288, capacity: 282 });
        assert_eq!(err.code(), 5);
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(assemble(&DIGITS, 6), Err(Error::InvalidOption(_))));
        assert!(matches!(assemble(&[], 2), Err(Error::InternalInvariantViolation(_))));
    }
}
