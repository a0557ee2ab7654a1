//! Ultracode codeword generation: start codeword selection, adaptive
//! compaction and the GF(283) Reed-Solomon protected stream.

pub mod assemble;
pub mod compact;
pub mod fragment;

use crate::error::Result;

pub use assemble::{assemble, UltraSymbol, MAX_ECC_LEVEL};
pub use compact::{generate_codewords, Mode, MAX_ECI};

/// Options of an Ultracode symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltraOptions {
    /// Extended Channel Interpretation, 0 for the default character set.
    pub eci: u32,
    /// Error correction level, 0 to 5.
    pub ecc_level: u8,
    /// Marks the symbol as a reader programming symbol (FNC3).
    pub reader_init: bool,
    /// GS1 data, FNC1 separators are encoded as such.
    pub gs1: bool,
}

impl Default for UltraOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl UltraOptions {
    pub const fn new() -> Self {
        Self { eci: 0, ecc_level: 2, reader_init: false, gs1: false }
    }

    pub const fn set_eci(mut self, eci: u32) -> Self {
        self.eci = eci;
        self
    }

    pub const fn set_ecc_level(mut self, ecc_level: u8) -> Self {
        self.ecc_level = ecc_level;
        self
    }

    pub const fn set_reader_init(mut self, reader_init: bool) -> Self {
        self.reader_init = reader_init;
        self
    }

    pub const fn set_gs1(mut self, gs1: bool) -> Self {
        self.gs1 = gs1;
        self
    }
}

/// Compacts `data` and assembles the complete Ultracode codeword stream.
pub fn encode_ultracode(data: &[u8], options: &UltraOptions) -> Result<UltraSymbol> {
    if options.ecc_level > MAX_ECC_LEVEL {
        return Err(crate::Error::InvalidOption("Ultracode ECC level must be between 0 and 5"));
    }
    let codewords = generate_codewords(data, options)?;
    assemble(&codewords, options.ecc_level)
}
