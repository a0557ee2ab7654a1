use crate::ecc;
use crate::tables::Variant;

/// Latch to text compaction, doubles as the padding codeword.
pub const M_LATCH_TEXT: u16 = 900;
/// Latch to byte compaction when the number of bytes is not a multiple of 6.
pub const M_LATCH_BYTE: u16 = 901;
/// Shift to byte compaction for a single byte.
pub const M_SHIFT_BYTE: u16 = 913;
/// Identifies a CC-B or CC-C composite component.
pub const M_CC_IDENTIFIER: u16 = 920;
/// Latch to byte compaction when the number of bytes is a multiple of 6.
pub const M_LATCH_BYTE_M6: u16 = 924;

/// Padding codeword
pub const CW_PADDING: u16 = M_LATCH_TEXT;

/// Use a Pdf417Encoder to byte compact data segments into a codeword
/// sequence, then seal it with padding and check codewords.
#[derive(Debug, Clone)]
pub struct Pdf417Encoder {
    storage: Vec<u16>,
    micro: bool,
    byte_mode: bool,
}

impl Pdf417Encoder {
    /// Create an empty Pdf417Encoder. Set `micro` to true to encode according
    /// to the MicroPDF417 specification (also used by CC-B components).
    pub fn new(micro: bool) -> Self {
        if micro {
            // Default mode is byte compactation
            Self { storage: Vec::new(), micro, byte_mode: true }
        } else {
            // Reserve the first codeword (used for length).
            Self { storage: vec![0], micro, byte_mode: false }
        }
    }

    /// Returns the number of codewords already used
    pub fn count(&self) -> usize {
        self.storage.len()
    }

    pub fn codewords(&self) -> &[u16] {
        &self.storage
    }

    /// Appends a bytes segment.
    pub fn append_bytes(mut self, bytes: &[u8]) -> Self {
        let mut k = 0;

        if bytes.len() > 1 {
            // even if we are in byte mode, it is safer to always emit a LATCH_BYTE
            self.storage.push(if bytes.len() % 6 == 0 { M_LATCH_BYTE_M6 } else { M_LATCH_BYTE });
            self.byte_mode = true;

            while bytes.len() - k >= 6 {
                // pack six bytes
                let mut s: u64 = 0;
                for n in 0..6 {
                    s = (s << 8) + bytes[k + n] as u64;
                }
                // append five codewords
                let mut group = [0u16; 5];
                for n in 0..5 {
                    let (q, r) = (s / 900, s % 900);
                    group[4 - n] = r as u16;
                    s = q;
                }
                self.storage.extend_from_slice(&group);
                k += 6;
            }
        } else if !bytes.is_empty() {
            if self.byte_mode {
                self.storage.push(M_LATCH_BYTE);
            } else {
                self.storage.push(M_SHIFT_BYTE);
            }
        }

        // remaining
        self.storage.extend(bytes[k..].iter().map(|&b| b as u16));
        self
    }

    /// Append a single codeword.
    pub fn append_codeword(mut self, codeword: u16) -> Self {
        self.storage.push(codeword);
        self
    }

    /// Append a slice of codewords.
    pub fn append_raw(mut self, codewords: &[u16]) -> Self {
        self.storage.extend_from_slice(codewords);
        self
    }

    /// Seals the data segments into a PDF417 codeword sequence of `columns`
    /// data columns and at least 3 rows. The length descriptor, padding and
    /// check codewords for ECC `level` are generated by this function.
    pub fn seal(mut self, level: u8, columns: usize) -> Vec<u16> {
        assert!(!self.micro, "use seal_micro for MicroPDF417");
        assert!(columns > 0, "at least one column is required");

        let ecc_count = ecc::ecc_count(level);
        let rows = (self.storage.len() + ecc_count).div_ceil(columns).max(3);
        let total = rows * columns - ecc_count;

        self.storage.resize(total, CW_PADDING);
        self.storage[0] = total as u16;
        self.storage.resize(total + ecc_count, 0);
        ecc::generate_ecc(&mut self.storage, level);

        self.storage
    }

    /// Seals the data segments into the MicroPDF417 `variant`: pads up to the
    /// variant capacity and appends its check codewords.
    pub fn seal_micro(mut self, variant: &Variant) -> Vec<u16> {
        assert!(self.micro, "use seal for PDF417");
        let capacity = variant.capacity as usize;
        assert!(self.storage.len() <= capacity, "data does not fit the selected variant");

        self.storage.resize(capacity, CW_PADDING);
        self.storage.resize(variant.total(), 0);
        ecc::generate_micro_ecc(&mut self.storage, variant.ecc_count());

        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::{Pdf417Encoder, M_CC_IDENTIFIER};
    use crate::tables::Variant;

    #[test]
    fn test_encode_bytes_multiple() {
        let ec = Pdf417Encoder::new(false).append_bytes(b"alcool");
        assert_eq!(ec.codewords(), &[0, 924, 163, 238, 432, 766, 244]);
    }

    #[test]
    fn test_encode_bytes_not_multiple() {
        let ec = Pdf417Encoder::new(false).append_bytes(b"encode bin");
        assert_eq!(ec.count(), 11);
        assert_eq!(ec.codewords(), &[0, 901, 169, 883, 224, 680, 517, 32, 98, 105, 110]);
    }

    #[test]
    fn test_encode_single_byte() {
        let ec = Pdf417Encoder::new(false).append_bytes(b"A");
        assert_eq!(ec.codewords(), &[0, 913, 65]);

        let ec = Pdf417Encoder::new(true).append_bytes(b"A");
        assert_eq!(ec.codewords(), &[901, 65]);
    }

    #[test]
    fn test_multiple_segments() {
        let ec = Pdf417Encoder::new(false)
            .append_codeword(M_CC_IDENTIFIER)
            .append_raw(&[902, 142])
            .append_bytes(b"encode bin");
        assert_eq!(ec.codewords(), &[
            0,
            920,
            902, 142,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110
        ]);
    }

    #[test]
    fn test_seal_exact_fit() {
        let codewords = Pdf417Encoder::new(false)
            .append_codeword(M_CC_IDENTIFIER)
            .append_bytes(b"encode bin")
            .seal(1, 4);

        assert_eq!(&codewords, &[
            12,
            920,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110,
            // ecc
            366, 423, 505, 620
        ]);
    }

    #[test]
    fn test_seal_with_padding() {
        let codewords = Pdf417Encoder::new(false)
            .append_codeword(M_CC_IDENTIFIER)
            .append_bytes(b"encode bin")
            .seal(0, 5);

        assert_eq!(codewords.len(), 15);
        assert_eq!(&codewords, &[
            13,
            920,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110,
            900,
            // ecc
            570, 252
        ]);
    }

    #[test]
    fn test_seal_micro() {
        let ec = Pdf417Encoder::new(true)
            .append_codeword(M_CC_IDENTIFIER)
            .append_bytes(b"encode bin");
        let variant = Variant::with_capacity(2, ec.count()).unwrap();
        assert_eq!((variant.columns, variant.rows), (2, 11));

        let codewords = ec.seal_micro(variant);
        assert_eq!(&codewords, &[
            920,
            901, 169, 883, 224, 680, 517, 32, 98, 105, 110,
            900, 900,
            // ecc
            628, 797, 603, 568, 608, 926, 895, 539, 481
        ]);
    }
}
