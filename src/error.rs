use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ADB server returned FAIL: {0}")]
    ServerFail(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unexpected response from ADB server: {raw:?}")]
    UnexpectedResponse { raw: String },

    #[error("Failed to connect device: {0}")]
    ConnectFailed(String),

    #[error("No such device: {0}")]
    NoSuchDevice(String),

    #[error("Connection refused: is the ADB server running? (try 'adb start-server')")]
    ConnectionRefused,
}

pub type AdbResult<T> = Result<T, AdbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdbError::ServerFail("device not found".into());
        assert_eq!(
            err.to_string(),
            "ADB server returned FAIL: device not found"
        );

        let err = AdbError::ConnectionRefused;
        assert!(err.to_string().contains("ADB server running"));

        let err = AdbError::NoSuchDevice("No such device 1.2.3.4:5555".into());
        assert!(err.to_string().contains("1.2.3.4:5555"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken");
        let adb_err: AdbError = io_err.into();
        assert!(matches!(adb_err, AdbError::Io(_)));
        assert!(adb_err.to_string().contains("broken"));
    }

    #[test]
    fn test_unexpected_response_includes_raw_bytes() {
        let err = AdbError::UnexpectedResponse {
            raw: "WHAT0000".into(),
        };
        assert!(err.to_string().contains("WHAT0000"));
    }
}
