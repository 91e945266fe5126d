//! Error types for bitstream operations.

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-level reading and fixture writing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read {requested} bits but only {available} bits available")]
    UnexpectedEof {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Invalid bit count for the operation.
    #[error("invalid bit count {bits}, maximum allowed is {max_bits}")]
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: u8,
        /// Maximum allowed bits for this operation.
        max_bits: u8,
    },

    /// Value exceeds the range representable by the specified number of bits.
    #[error("value {value} cannot be represented in {bits} bits")]
    ValueOutOfRange {
        /// The value that was out of range.
        value: u64,
        /// Number of bits available.
        bits: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unexpected_eof() {
        let err = BitError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bits"), "should mention requested bits");
        assert!(msg.contains("3 bits"), "should mention available bits");
        assert!(msg.contains("read"), "should mention read operation");
    }

    #[test]
    fn error_display_invalid_bit_count() {
        let err = BitError::InvalidBitCount {
            bits: 128,
            max_bits: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("128"), "should mention invalid count");
        assert!(msg.contains("64"), "should mention maximum");
    }

    #[test]
    fn error_display_value_out_of_range() {
        let err = BitError::ValueOutOfRange {
            value: 256,
            bits: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("256"), "should mention the value");
        assert!(msg.contains("8 bits"), "should mention bit count");
    }

    #[test]
    fn error_equality() {
        let err1 = BitError::UnexpectedEof {
            requested: 8,
            available: 3,
        };
        let err2 = err1.clone();
        let err3 = BitError::UnexpectedEof {
            requested: 8,
            available: 4,
        };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<BitError>();
    }
}
