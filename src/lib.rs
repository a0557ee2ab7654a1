//! Data compaction and Reed-Solomon error correction for Ultracode and for
//! the 2D component of GS1 Composite symbols (CC-A, CC-B and CC-C).
//!
//! The crate stops at codewords: placing them in rows and drawing the
//! modules is left to the caller.
//!
//! ```
//! use symcompact::ultra::{encode_ultracode, UltraOptions};
//! use symcompact::gs1::{encode_composite, CompositeOptions};
//!
//! let symbol = encode_ultracode(b"1234567890", &UltraOptions::new()).unwrap();
//! assert_eq!(symbol.data_codewords, [272, 140, 162, 184, 206, 218]);
//!
//! let component = encode_composite(b"2112345678", &CompositeOptions::new()).unwrap();
//! assert_eq!((component.columns, component.rows), (4, 3));
//! ```

pub mod bitfield;
pub mod ecc;
mod error;
pub mod field;
pub mod gs1;
pub mod high_level;
pub mod tables;
pub mod ultra;

pub use error::{Error, Result};

/// GS1 field separator, as found in reduced element strings.
pub const FNC1: u8 = 0x1D;
