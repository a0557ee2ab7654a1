use core::{fmt, iter};

/// Up to 24 bits packed together with their count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitfield(u32);

impl Bitfield {
    pub const fn new(bits: u32, count: u8) -> Self {
        debug_assert!(count <= 24, "count is too big");
        debug_assert!(count == 24 || bits < (1 << count), "value does not fit in count bits");

        Self((bits << 8) | count as u32)
    }

    #[inline]
    pub const fn size(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0 >> 8
    }

    #[inline]
    pub const fn as_pair(&self) -> (u32, u32) {
        (self.0 >> 8, self.0 & 0xFF)
    }
}

impl iter::IntoIterator for Bitfield {
    type Item = bool;
    type IntoIter = Bits;

    fn into_iter(self) -> Self::IntoIter {
        let (value, count) = self.as_pair();
        Bits { value, count }
    }
}

/// Most significant bit first iterator over a [Bitfield].
pub struct Bits {
    value: u32,
    count: u32,
}

impl iter::Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.count > 0 {
            self.count -= 1;
            Some((self.value >> self.count) & 1 != 0)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.count as usize;
        (count, Some(count))
    }
}

impl iter::ExactSizeIterator for Bits {}
impl iter::FusedIterator for Bits {}

/// Growable sequence of bits produced by the GS1 compactors.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { bits: Vec::with_capacity(capacity) }
    }

    /// Appends the `count` low bits of `value`, most significant first.
    pub fn push(&mut self, value: u32, count: u8) {
        self.bits.extend(Bitfield::new(value, count));
    }

    /// Appends a literal made of `'0'` and `'1'` characters.
    pub fn push_str(&mut self, literal: &str) {
        self.bits.extend(literal.bytes().map(|b| b == b'1'));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.bits.truncate(len);
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Packs the bits in bytes, most significant bit first. A trailing
    /// partial byte is dropped.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.chunks_exact(8)
            .map(|byte| byte.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
            .collect()
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({}: {self})", self.bits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{BitString, Bitfield};

    #[test]
    fn test_bitfield_msb_first() {
        let bits: Vec<bool> = Bitfield::new(0b1011, 4).into_iter().collect();
        assert_eq!(bits, [true, false, true, true]);
    }

    #[test]
    fn test_bitfield_leading_zeroes() {
        let field = Bitfield::new(5, 7);
        assert_eq!(field.size(), 7);
        assert_eq!(field.bits(), 5);
        assert_eq!(field.into_iter().len(), 7);
    }

    #[test]
    fn test_bit_string_push_and_display() {
        let mut bits = BitString::new();
        bits.push(0, 4);
        bits.push(15, 5);
        bits.push_str("001");
        assert_eq!(bits.len(), 12);
        assert_eq!(bits.to_string(), "000001111001");
    }

    #[test]
    fn test_bit_string_to_bytes() {
        let mut bits = BitString::new();
        bits.push(0xA5, 8);
        bits.push(0x3C, 8);
        bits.push(1, 3);
        assert_eq!(bits.to_bytes(), [0xA5, 0x3C]);
    }
}
