//! GS1 Composite 2D components (CC-A, CC-B, CC-C).

pub mod composite;
pub mod general_field;

pub use composite::{encode_composite, CompositeMode, CompositeOptions, CompositeSymbol};
pub use general_field::{encode_general_field, GeneralFieldMode, GeneralFieldOutcome};
