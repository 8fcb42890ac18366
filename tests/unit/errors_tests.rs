/*!
 * Tests for error classification
 */

use datxlate::errors::{AppError, BackendError, FileError};
use std::path::PathBuf;

#[test]
fn test_isNetworkRelated_withTransientErrors_shouldReturnTrue() {
    let transient = [
        BackendError::Timeout("deadline elapsed".to_string()),
        BackendError::ConnectionError("refused".to_string()),
        BackendError::Interrupted("body closed early".to_string()),
        BackendError::RequestFailed("SSL handshake failed".to_string()),
        BackendError::RequestFailed("network unreachable".to_string()),
    ];
    for error in transient {
        assert!(error.is_network_related(), "expected transient: {}", error);
    }
}

#[test]
fn test_isNetworkRelated_withPermanentErrors_shouldReturnFalse() {
    let permanent = [
        BackendError::ParseError("unexpected token".to_string()),
        BackendError::ApiError {
            status_code: 403,
            message: "forbidden".to_string(),
        },
        BackendError::RateLimitExceeded("slow down".to_string()),
    ];
    for error in permanent {
        assert!(!error.is_network_related(), "expected permanent: {}", error);
    }
}

#[test]
fn test_appError_shouldWrapLowerLevelErrors() {
    let error: AppError = FileError::LineOutOfRange {
        line_num: 9,
        line_count: 3,
    }
    .into();
    assert!(error.to_string().contains("Line 9 is out of range"));

    let error: AppError = BackendError::Timeout("x".to_string()).into();
    assert!(matches!(error, AppError::Backend(_)));

    let error = AppError::NoInputFiles(PathBuf::from("data"));
    assert!(error.to_string().contains("No matching input files"));
}
