//! Geometry tables of the PDF417 family components used by GS1 Composite
//! symbols.

/// A MicroPDF417 symbol size. CC-B components reuse these sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub columns: u8,
    pub rows: u8,
    /// Number of data codewords (everything but the check codewords).
    pub capacity: u8,
}

impl Variant {
    const fn new(columns: u8, rows: u8, capacity: u8) -> Self {
        Self { columns, rows, capacity }
    }

    #[inline]
    pub const fn total(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    #[inline]
    pub const fn ecc_count(&self) -> usize {
        self.total() - self.capacity as usize
    }

    /// Smallest variant with `columns` data columns that can hold `count`
    /// data codewords.
    pub fn with_capacity(columns: u8, count: usize) -> Option<&'static Variant> {
        M_PDF417_VARIANTS.iter()
            .find(|v| v.columns == columns && v.capacity as usize >= count)
    }
}

pub const M_PDF417_VARIANTS_COUNT: usize = 34;

/// MicroPDF417 variants, ordered by columns then rows.
pub static M_PDF417_VARIANTS: [Variant; M_PDF417_VARIANTS_COUNT] = [
    Variant::new(1, 11, 4), Variant::new(1, 14, 7), Variant::new(1, 17, 10),
    Variant::new(1, 20, 12), Variant::new(1, 24, 16), Variant::new(1, 28, 20),

    Variant::new(2, 8, 8), Variant::new(2, 11, 13), Variant::new(2, 14, 19),
    Variant::new(2, 17, 24), Variant::new(2, 20, 29), Variant::new(2, 23, 33),
    Variant::new(2, 26, 37),

    Variant::new(3, 6, 6), Variant::new(3, 8, 10), Variant::new(3, 10, 14),
    Variant::new(3, 12, 18), Variant::new(3, 15, 24), Variant::new(3, 20, 34),
    Variant::new(3, 26, 46), Variant::new(3, 32, 58), Variant::new(3, 38, 70),
    Variant::new(3, 44, 82),

    Variant::new(4, 4, 8), Variant::new(4, 6, 12), Variant::new(4, 8, 18),
    Variant::new(4, 10, 24), Variant::new(4, 12, 30), Variant::new(4, 15, 39),
    Variant::new(4, 20, 54), Variant::new(4, 26, 72), Variant::new(4, 32, 90),
    Variant::new(4, 38, 108), Variant::new(4, 44, 126),
];

/// CC-A symbol size, selected by the number of base 928 data codewords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcaVariant {
    pub columns: u8,
    pub data: u8,
    pub rows: u8,
    pub ecc: u8,
}

impl CcaVariant {
    const fn new(columns: u8, data: u8, rows: u8, ecc: u8) -> Self {
        Self { columns, data, rows, ecc }
    }

    pub fn find(columns: u8, data: usize) -> Option<&'static CcaVariant> {
        CCA_VARIANTS.iter().find(|v| v.columns == columns && v.data as usize == data)
    }
}

pub static CCA_VARIANTS: [CcaVariant; 17] = [
    CcaVariant::new(2, 6, 5, 4), CcaVariant::new(2, 8, 6, 4), CcaVariant::new(2, 9, 7, 5),
    CcaVariant::new(2, 11, 8, 5), CcaVariant::new(2, 12, 9, 6), CcaVariant::new(2, 14, 10, 6),
    CcaVariant::new(2, 17, 12, 7),

    CcaVariant::new(3, 8, 4, 4), CcaVariant::new(3, 10, 5, 5), CcaVariant::new(3, 12, 6, 6),
    CcaVariant::new(3, 14, 7, 7), CcaVariant::new(3, 17, 8, 7),

    CcaVariant::new(4, 8, 3, 4), CcaVariant::new(4, 11, 4, 5), CcaVariant::new(4, 14, 5, 6),
    CcaVariant::new(4, 17, 6, 7), CcaVariant::new(4, 20, 7, 8),
];

/// Bit string sizes a CC-A component can be padded to, per width (2, 3, 4).
pub const CCA_BIT_SIZES: [&[u16]; 3] = [
    &[59, 78, 88, 108, 118, 138, 167],
    &[78, 98, 118, 138, 167],
    &[78, 108, 138, 167, 197],
];

/// Bit string sizes a CC-B component can be padded to, per width (2, 3, 4).
pub const CCB_BIT_SIZES: [&[u16]; 3] = [
    &[56, 104, 160, 208, 256, 296, 336],
    &[32, 72, 112, 152, 208, 304, 416, 536, 648, 768],
    &[56, 96, 152, 208, 264, 352, 496, 672, 840, 1016, 1184],
];
