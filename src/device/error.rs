//! Errors raised while acquiring the device handle.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device node could not be opened.
    #[error("Failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The node's metadata could not be read.
    #[error("Failed to stat '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is not a character device.
    #[error("{} is not a character device", .0.display())]
    NotCharDevice(PathBuf),

    /// Character devices are only supported on unix targets.
    #[error("Character devices are not supported on this platform")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::NotCharDevice(PathBuf::from("/tmp/file"));
        assert_eq!(err.to_string(), "/tmp/file is not a character device");

        let err = DeviceError::Open {
            path: PathBuf::from("/dev/serial0"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Failed to open '/dev/serial0'"));
    }
}
