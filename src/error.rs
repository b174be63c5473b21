//! Error handling for srtlib
//!
//! Allocation and argument failures are reported through [`SrtError`]. Absent
//! elements (popping an empty vector, looking up a missing key) are not errors:
//! those operations return `None` or `false`.

use thiserror::Error;

/// Main error type for the srtlib library
#[derive(Error, Debug)]
pub enum SrtError {
    /// I/O related errors (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument or malformed data
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Memory allocation failures
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl SrtError {
    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::OutOfMemory { .. } => true,
            Self::InvalidData { .. } => false,
            Self::OutOfBounds { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidData { .. } => "data",
            Self::OutOfBounds { .. } => "bounds",
            Self::OutOfMemory { .. } => "memory",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SrtError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(SrtError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SrtError::invalid_data("test message");
        assert_eq!(err.category(), "data");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_bounds_checking() {
        assert!(check_bounds(5, 10).is_ok());
        assert!(check_bounds(10, 10).is_err());
        assert!(check_bounds(15, 10).is_err());
        assert!(check_bounds(0, 0).is_err());
    }

    #[test]
    fn test_categories() {
        assert_eq!(SrtError::out_of_bounds(3, 1).category(), "bounds");
        assert_eq!(SrtError::out_of_memory(64).category(), "memory");
        assert!(SrtError::out_of_memory(64).is_recoverable());
        assert_eq!(SrtError::configuration("bad").category(), "config");

        let io: SrtError = std::io::Error::new(std::io::ErrorKind::NotFound, "x").into();
        assert_eq!(io.category(), "io");
        assert!(io.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let bounds = SrtError::out_of_bounds(10, 5);
        let shown = format!("{}", bounds);
        assert!(shown.contains("Out of bounds"));
        assert!(shown.contains("10"));
        assert!(shown.contains('5'));

        let oom = SrtError::out_of_memory(4096);
        assert!(format!("{}", oom).contains("4096"));
    }
}
