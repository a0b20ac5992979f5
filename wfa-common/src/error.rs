use windows::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_BAD_PATHNAME, ERROR_BUSY, ERROR_FILE_NOT_FOUND,
    ERROR_INVALID_NAME, ERROR_NO_UNICODE_TRANSLATION, ERROR_PATH_NOT_FOUND, ERROR_PIPE_BUSY,
    ERROR_SEM_TIMEOUT, ERROR_SHARING_VIOLATION, ERROR_TIMEOUT, WIN32_ERROR,
};
use windows::core::Error;

// Query strategies surface native errors untouched, so callers match on the
// Win32 identity instead of a re-typed taxonomy.

fn _matches(error: &Error, codes: &[WIN32_ERROR]) -> bool {
    codes.iter().any(|code| error.code() == code.to_hresult())
}

pub fn is_not_found(error: &Error) -> bool {
    _matches(error, &[ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND])
}

pub fn is_access_denied(error: &Error) -> bool {
    _matches(error, &[ERROR_ACCESS_DENIED])
}

pub fn is_timeout(error: &Error) -> bool {
    _matches(error, &[ERROR_SEM_TIMEOUT, ERROR_TIMEOUT])
}

pub fn is_sharing_violation(error: &Error) -> bool {
    _matches(error, &[ERROR_SHARING_VIOLATION])
}

pub fn is_busy(error: &Error) -> bool {
    _matches(error, &[ERROR_BUSY, ERROR_PIPE_BUSY])
}

pub fn is_invalid_path_syntax(error: &Error) -> bool {
    _matches(error, &[ERROR_INVALID_NAME, ERROR_BAD_PATHNAME])
}

pub fn is_encoding_failure(error: &Error) -> bool {
    _matches(error, &[ERROR_NO_UNICODE_TRANSLATION])
}

// Paths with an interior NUL cannot be converted to a NUL-terminated UTF-16
// buffer; the failure keeps the native no-unicode-translation identity.
pub fn encoding_error() -> Error {
    Error::from_hresult(ERROR_NO_UNICODE_TRANSLATION.to_hresult())
}

#[cfg(test)]
mod tests {
    use windows::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_BUSY, ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND,
        ERROR_PIPE_BUSY, ERROR_SHARING_VIOLATION,
    };
    use windows::core::Error;

    use super::{
        encoding_error, is_busy, is_encoding_failure, is_not_found, is_sharing_violation,
    };

    #[test]
    fn not_found_covers_both_native_codes() {
        let file = Error::from_hresult(ERROR_FILE_NOT_FOUND.to_hresult());
        let path = Error::from_hresult(ERROR_PATH_NOT_FOUND.to_hresult());
        assert!(is_not_found(&file));
        assert!(is_not_found(&path));
        assert!(!is_busy(&file));
    }

    #[test]
    fn busy_and_sharing_violation_stay_distinct() {
        let busy = Error::from_hresult(ERROR_BUSY.to_hresult());
        let pipe_busy = Error::from_hresult(ERROR_PIPE_BUSY.to_hresult());
        let sharing = Error::from_hresult(ERROR_SHARING_VIOLATION.to_hresult());
        assert!(is_busy(&busy));
        assert!(is_busy(&pipe_busy));
        assert!(is_sharing_violation(&sharing));
        assert!(!is_busy(&sharing));
        assert!(!is_sharing_violation(&busy));
    }

    #[test]
    fn encoding_error_keeps_its_identity() {
        let error = encoding_error();
        assert!(is_encoding_failure(&error));
        assert!(!is_not_found(&error));
        assert!(!is_encoding_failure(&Error::from_hresult(
            ERROR_ACCESS_DENIED.to_hresult()
        )));
    }
}
