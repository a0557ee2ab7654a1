use thiserror::Error;

/// Errors returned by the compaction and error correction routines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A byte does not belong to any alphabet of the active compaction scheme.
    #[error("invalid character 0x{byte:02X} at position {position}")]
    InvalidCharacter { position: usize, byte: u8 },
    #[error("ECI value {eci} out of range (maximum {max})")]
    EciOutOfRange { eci: u32, max: u32 },
    /// Data, check and housekeeping codewords (or bits) do not fit the
    /// largest symbol of the selected configuration.
    #[error("data too long for selected configuration ({needed} > {capacity})")]
    CapacityExceeded { needed: usize, capacity: usize },
    #[error("invalid option: {0}")]
    InvalidOption(&'static str),
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(&'static str),
}

impl Error {
    /// Numeric error code reported to command line front ends.
    pub const fn code(&self) -> i32 {
        match self {
            Error::CapacityExceeded { .. } => 5,
            Error::InvalidCharacter { .. } => 6,
            Error::EciOutOfRange { .. } | Error::InvalidOption(_) => 8,
            Error::InternalInvariantViolation(_) => 9,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::CapacityExceeded { needed: 300, capacity: 282 }.code(), 5);
        assert_eq!(Error::InvalidCharacter { position: 0, byte: 0x80 }.code(), 6);
        assert_eq!(Error::EciOutOfRange { eci: 899, max: 898 }.code(), 8);
        assert_eq!(Error::InternalInvariantViolation("subset").code(), 9);
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidCharacter { position: 3, byte: 0x7F };
        assert_eq!(err.to_string(), "invalid character 0x7F at position 3");
        let err = Error::EciOutOfRange { eci: 1000, max: 898 };
        assert_eq!(err.to_string(), "ECI value 1000 out of range (maximum 898)");
    }
}
