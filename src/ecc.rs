use once_cell::sync::Lazy;

use crate::field::{FieldContext, GeneratorPolynomial};

/// Highest PDF417 error correction level.
pub const MAX_LEVEL: u8 = 8;

/// Low order coefficients of the PDF417 divisor polynomials for levels 0 to 8,
/// concatenated. Level `l` starts at [coefficient_offset] `(l)`.
static PDF417_COEFFICIENTS: Lazy<Vec<u16>> = Lazy::new(|| {
    let field = FieldContext::gf929();
    let mut table = Vec::with_capacity(coefficient_offset(MAX_LEVEL) + ecc_count(MAX_LEVEL));
    for level in 0..=MAX_LEVEL {
        let count = ecc_count(level);
        table.extend_from_slice(&GeneratorPolynomial::new(field, count).coefficients()[..count]);
    }
    table
});

/// Number of check codewords used by a PDF417 error correction level.
pub const fn ecc_count(level: u8) -> usize {
    assert!(level < 9, "ECC level must be between 0 and 8 inclusive");
    1 << (level as usize + 1)
}

/// Position of the first coefficient of `level` in the concatenated table.
pub const fn coefficient_offset(level: u8) -> usize {
    ecc_count(level) - 2
}

/// Computes the check codewords of `data` by polynomial division (simulated
/// with a shift register). The result holds `generator.ecc_length()` values,
/// highest order first, ready to be appended after the data.
pub fn encode_rs(field: &FieldContext, generator: &GeneratorPolynomial, data: &[u16]) -> Vec<u16> {
    let k = generator.ecc_length();
    let mut ecc = vec![0u16; k];
    divide(field, &generator.coefficients()[..k], data, &mut ecc);
    ecc
}

fn divide(field: &FieldContext, factors: &[u16], data: &[u16], ecc: &mut [u16]) {
    let k = factors.len();
    debug_assert_eq!(ecc.len(), k);

    let mut acc = vec![0u16; k];
    for &cw in data {
        let t = field.add(cw % field.modulus(), acc[k - 1]);

        for j in (1..k).rev() {
            acc[j] = field.sub(acc[j - 1], field.mul(t, factors[j]));
        }
        acc[0] = field.neg(field.mul(t, factors[0]));
    }

    for (e, &a) in ecc.iter_mut().zip(acc.iter().rev()) {
        *e = field.neg(a);
    }
}

/// Fills the last [ecc_count] `(level)` slots of `codewords` with the PDF417
/// check codewords of the preceding ones.
pub fn generate_ecc(codewords: &mut [u16], level: u8) {
    assert!(level <= MAX_LEVEL, "ECC level must be between 0 and 8 inclusive");

    let offset = coefficient_offset(level);
    let factors = &PDF417_COEFFICIENTS[offset..offset + ecc_count(level)];

    assert!(codewords.len() >= factors.len());
    let (data, ecc) = codewords.split_at_mut(codewords.len() - factors.len());
    divide(FieldContext::gf929(), factors, data, ecc);
}

/// Same as [generate_ecc] with a variant specific number of check codewords
/// (MicroPDF417 and the CC-A/CC-B composite components).
pub fn generate_micro_ecc(codewords: &mut [u16], count: usize) {
    assert!(codewords.len() >= count);

    let field = FieldContext::gf929();
    let generator = GeneratorPolynomial::new(field, count);
    let (data, ecc) = codewords.split_at_mut(codewords.len() - count);
    divide(field, &generator.coefficients()[..count], data, ecc);
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{encode_rs, generate_ecc, generate_micro_ecc, coefficient_offset, PDF417_COEFFICIENTS};
    use crate::field::{FieldContext, GeneratorPolynomial};

    const INPUT_DATA: [u16; 16] = [16, 902, 1, 278, 827, 900, 295, 902, 2, 326, 823, 544, 900, 149, 900, 900];

    #[test]
    fn test_ecc_l0() {
        let expected: [u16; 2] = [156, 765];
        let mut data = [0u16; INPUT_DATA.len() + 2];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, 0);
        assert_eq!(data[INPUT_DATA.len()..], expected);
    }

    #[test]
    fn test_ecc_l1() {
        let expected: [u16; 4] = [168, 875, 63, 355];
        let mut data = [0u16; INPUT_DATA.len() + 4];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, 1);
        assert_eq!(data[INPUT_DATA.len()..], expected);
    }

    #[test]
    fn test_ecc_l2() {
        let expected: [u16; 8] = [628, 715, 393, 299, 863, 601, 169, 708];
        let mut data = [0u16; INPUT_DATA.len() + 8];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, 2);
        assert_eq!(data[INPUT_DATA.len()..], expected);
    }

    #[test]
    fn test_ecc_l3() {
        let expected: [u16; 16] = [232, 176, 793, 616, 476, 406, 855, 445, 84, 518, 522, 721, 607, 2, 42, 578];
        let mut data = [0u16; INPUT_DATA.len() + 16];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, 3);
        assert_eq!(data[INPUT_DATA.len()..], expected);
    }

    #[test]
    fn test_ecc_l4() {
        let expected: [u16; 32] = [281, 156, 276, 668, 44, 252, 877, 30, 549, 856, 773, 639, 420, 330, 693, 329, 283, 723, 480, 482, 102, 925, 535, 892, 374, 472, 837, 331, 343, 608, 390, 364];
        let mut data = [0u16; INPUT_DATA.len() + 32];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, 4);
        assert_eq!(data[INPUT_DATA.len()..], expected);
    }

    #[test]
    fn test_micro_ecc_seven() {
        let mut data: [u16; 24] = [
            900,
            19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29,
            902, 142, 142,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110,
            0, 0, 0, 0, 0, 0, 0
        ];
        generate_micro_ecc(&mut data, 7);
        assert_eq!(data[17..], [383, 745, 811, 163, 659, 400, 129]);
    }

    #[test]
    fn test_offsets_index_table() {
        assert_eq!(coefficient_offset(0), 0);
        assert_eq!(coefficient_offset(1), 2);
        assert_eq!(coefficient_offset(8), 510);
        assert_eq!(PDF417_COEFFICIENTS.len(), 1022);
        assert_eq!(&PDF417_COEFFICIENTS[..2], &[27, 917]);
    }

    #[test_case(283, 3; "ultracode minimum")]
    #[test_case(283, 101; "ultracode maximum")]
    #[test_case(929, 2; "pdf417 level 0")]
    #[test_case(929, 64; "pdf417 level 5")]
    fn test_check_codeword_count_and_range(modulus: u16, k: usize) {
        let field = FieldContext::new(modulus, 3);
        let generator = GeneratorPolynomial::new(&field, k);
        let data: Vec<u16> = (0..40u16).map(|i| (i * 37 + 11) % modulus).collect();

        let ecc = encode_rs(&field, &generator, &data);
        assert_eq!(ecc.len(), k);
        assert!(ecc.iter().all(|&e| e < modulus));
    }

    #[test]
    fn test_codeword_divisible_by_generator() {
        for field in [FieldContext::gf283(), FieldContext::gf929()] {
            let generator = GeneratorPolynomial::new(field, 6);
            let data = [5, 17, 200, 3, 0, 99, 250, 1];
            let ecc = encode_rs(field, &generator, &data);

            for i in 1..=6 {
                let x = field.power(i);
                let value = data.iter().chain(ecc.iter())
                    .fold(0, |acc, &cw| field.add(field.mul(acc, x), cw));
                assert_eq!(value, 0, "codeword does not vanish at root {i}");
            }
        }
    }

    #[test]
    fn test_encode_rs_matches_in_place() {
        let generator = GeneratorPolynomial::new(FieldContext::gf929(), 8);
        let ecc = encode_rs(FieldContext::gf929(), &generator, &INPUT_DATA);
        assert_eq!(ecc, [628, 715, 393, 299, 863, 601, 169, 708]);
    }
}
